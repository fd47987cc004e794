//! Fretboard CLI binary

use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

mod cli;
use cli::{ChordsCommand, Cli, Commands, IdentifyCommand, OutputFormat, ScalesCommand, TargetArgs};

use fretboard::marks::{self, absolute_to_relative_frets, absolute_to_relative_marks};
use fretboard::{
    find_chords, find_scales, identify_chords, ChordFinderOptions, Diagram, FretError, Instrument, InternalNote,
    Library, ReverseChordFinderOptions, ScaleFinderOptions, Tuning,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Fret(#[from] FretError),
    #[error("Error reading '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error writing YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let library = load_library(cli.library.as_deref())?;

    match cli.command {
        Commands::Chords(cmd) => chords(&library, cmd),
        Commands::Scales(cmd) => scales(&library, cmd),
        Commands::Identify(cmd) => identify(&library, cmd),
        Commands::List => {
            list(&library);
            Ok(())
        }
    }
}

/// Built-in catalog, with the user's catalog merged over it.
fn load_library(path: Option<&Path>) -> Result<Library, CliError> {
    let mut library = Library::builtin()?;
    if let Some(path) = path {
        info!("Loading library from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        library.merge(Library::from_yaml(&content)?)?;
    }
    Ok(library)
}

fn resolve_target<'a>(library: &'a Library, target: &TargetArgs) -> Result<(&'a Instrument, &'a Tuning), FretError> {
    let instrument = library.instrument(&target.instrument)?;
    let tuning = match &target.tuning {
        Some(name) => instrument.tuning(name)?,
        None => instrument.default_tuning().ok_or_else(|| FretError::UnknownName {
            kind: "tuning",
            name: format!("(any tuning of {})", instrument.name()),
        })?,
    };
    debug!("Using {} tuned to {}", instrument.name(), tuning.name());
    Ok((instrument, tuning))
}

fn chords(library: &Library, cmd: ChordsCommand) -> Result<(), CliError> {
    let (instrument, tuning) = resolve_target(library, &cmd.target)?;
    let root = cmd.root.parse::<InternalNote>()?;
    let quality = library.chord_quality(&cmd.quality)?;
    let options = ChordFinderOptions::new(instrument, tuning, root, quality)?
        .with_limits(cmd.limits.limits())
        .with_open_strings(!cmd.limits.no_open)
        .with_muted_strings(cmd.muted)
        .with_rootless_chords(cmd.rootless)
        .with_partial_chords(cmd.partial);
    let results = find_chords(&options)?;
    info!("Found {} chords", results.len());
    let limit = cmd.output.limit.unwrap_or(usize::MAX);

    match cmd.output.format {
        OutputFormat::Text => {
            println!(
                "{} on {} ({})",
                quality.chord_name(root, cmd.output.note_names()),
                instrument.name(),
                tuning.name()
            );
            for result in results.iter().take(limit) {
                let (_, base_line) = absolute_to_relative_frets(result.frets(), options.num_frets());
                println!("{}{}", result.shape(), base_line_label(base_line));
            }
        }
        OutputFormat::Yaml => {
            let mut diagrams = results.diagrams(&cmd.output.style());
            diagrams.truncate(limit);
            print_yaml(&diagrams)?;
        }
    }
    Ok(())
}

fn scales(library: &Library, cmd: ScalesCommand) -> Result<(), CliError> {
    let (instrument, tuning) = resolve_target(library, &cmd.target)?;
    let root = cmd.root.parse::<InternalNote>()?;
    let scale = library.scale(&cmd.scale)?;

    let options = ScaleFinderOptions::new(instrument, tuning, root, scale)?
        .with_limits(cmd.limits.limits())
        .with_open_strings(!cmd.limits.no_open)
        .with_strict_intervals(cmd.strict);
    let results = find_scales(&options)?;
    info!("Found {} scale shapes", results.len());
    let limit = cmd.output.limit.unwrap_or(usize::MAX);

    match cmd.output.format {
        OutputFormat::Text => {
            println!(
                "{} on {} ({})",
                scale.scale_name(root, cmd.output.note_names()),
                instrument.name(),
                tuning.name()
            );
            for result in results.iter().take(limit) {
                let (_, base_line) = absolute_to_relative_marks(result.marks(), options.num_frets());
                let marks: Vec<String> = result
                    .marks()
                    .iter()
                    .map(|m| format!("{}:{}", m.string, m.fret))
                    .collect();
                println!("{}{}", marks.join(" "), base_line_label(base_line));
            }
        }
        OutputFormat::Yaml => {
            let mut diagrams = results.diagrams(&cmd.output.style());
            diagrams.truncate(limit);
            print_yaml(&diagrams)?;
        }
    }
    Ok(())
}

fn identify(library: &Library, cmd: IdentifyCommand) -> Result<(), CliError> {
    let (instrument, tuning) = resolve_target(library, &cmd.target)?;
    let frets = marks::parse_frets(&cmd.fretting)?;
    let qualities = if cmd.quality.is_empty() {
        library.chord_qualities().to_vec()
    } else {
        cmd.quality
            .iter()
            .map(|name| library.chord_quality(name).cloned())
            .collect::<Result<Vec<_>, _>>()?
    };

    let options = ReverseChordFinderOptions::new(instrument, tuning, frets, qualities)?;
    let results = identify_chords(&options)?;
    if results.is_empty() {
        eprintln!("No chord matches {}", cmd.fretting);
        return Ok(());
    }
    let limit = cmd.output.limit.unwrap_or(usize::MAX);

    match cmd.output.format {
        OutputFormat::Text => {
            for result in results.iter().take(limit) {
                println!("{}", result.name(cmd.output.note_names()));
            }
        }
        OutputFormat::Yaml => {
            let mut diagrams = results.diagrams(&cmd.output.style());
            diagrams.truncate(limit);
            print_yaml(&diagrams)?;
        }
    }
    Ok(())
}

fn list(library: &Library) {
    println!("Instruments:");
    for instrument in library.instruments() {
        println!("  {} ({} strings)", instrument.name(), instrument.num_strings());
        for tuning in instrument.tunings() {
            let notes: Vec<String> = tuning.notes().iter().map(|n| n.to_string()).collect();
            println!("    {}: {}", tuning.name(), notes.join(" "));
        }
    }

    println!("Chord qualities:");
    for quality in library.chord_qualities() {
        println!(
            "  {} [{}] {:?}",
            quality.name(),
            quality.abbreviation(),
            quality.intervals()
        );
    }

    println!("Scales:");
    for scale in library.scales() {
        println!("  {} {:?}", scale.name(), scale.intervals());
    }
}

fn base_line_label(base_line: i32) -> String {
    if base_line > 0 {
        format!("  (fret {})", base_line)
    } else {
        String::new()
    }
}

fn print_yaml(diagrams: &[Diagram]) -> Result<(), CliError> {
    print!("{}", serde_yaml::to_string(diagrams)?);
    Ok(())
}
