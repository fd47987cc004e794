//! Command line interface for the fretboard shape finder.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fretboard::options::{FretLimits, DEFAULT_MAX_FRET};
use fretboard::{BarreTypeOption, DiagramStyle, MarkTextOption, NoteNamePreference};
use std::path::PathBuf;

/// Find chord and scale shapes on fretted instruments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML catalog merged over the built-in instruments, qualities and scales
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find every fretting of a chord
    Chords(ChordsCommand),

    /// Find every run of a scale across the strings
    Scales(ScalesCommand),

    /// Name the chords a fretting plays
    Identify(IdentifyCommand),

    /// List the instruments, tunings, chord qualities and scales in the library
    List,
}

/// Which instrument and tuning to search on
#[derive(Args, Debug)]
pub struct TargetArgs {
    #[arg(short, long, default_value = "Ukulele")]
    pub instrument: String,

    /// Tuning name (defaults to the instrument's first tuning)
    #[arg(short, long)]
    pub tuning: Option<String>,
}

#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Height of a diagram in frets [default: 5, or the reach if larger]
    #[arg(long)]
    pub num_frets: Option<i32>,

    /// Highest fret the search may use
    #[arg(long, default_value_t = DEFAULT_MAX_FRET)]
    pub max_fret: i32,

    /// Widest fretted span a shape may have [default: 4, or the diagram height if smaller]
    #[arg(long)]
    pub max_reach: Option<i32>,

    /// Never use open strings
    #[arg(long)]
    pub no_open: bool,
}

impl LimitArgs {
    /// Limits with only the flags that were given applied. An explicit
    /// `--num-frets` wins over `--max-reach` when the two disagree.
    pub fn limits(&self) -> FretLimits {
        let mut limits = FretLimits::default();
        if let Some(max_reach) = self.max_reach {
            limits.set_max_reach(max_reach);
        }
        if let Some(num_frets) = self.num_frets {
            limits.set_num_frets(num_frets);
        }
        limits.set_max_fret(self.max_fret);
        limits
    }
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print at most this many results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Reverse the string order in diagrams (left-handed)
    #[arg(long)]
    pub mirror: bool,

    #[arg(long, value_enum, default_value_t = BarreArg::Off)]
    pub barre: BarreArg,

    #[arg(long, value_enum, default_value_t = MarkTextArg::Off)]
    pub mark_text: MarkTextArg,

    /// Label each sounded string with its note below the diagram
    #[arg(long)]
    pub bottom_marks: bool,

    /// Spell black-key notes with flats
    #[arg(long)]
    pub flats: bool,
}

impl OutputArgs {
    pub fn style(&self) -> DiagramStyle {
        DiagramStyle {
            mirror: self.mirror,
            show_bottom_marks: self.bottom_marks,
            barre_type: self.barre.into(),
            mark_text: self.mark_text.into(),
            note_names: self.note_names(),
            ..DiagramStyle::default()
        }
    }

    pub fn note_names(&self) -> NoteNamePreference {
        if self.flats {
            NoteNamePreference::PreferFlats
        } else {
            NoteNamePreference::PreferSharps
        }
    }
}

/// Find every fretting of a chord
#[derive(Parser, Debug)]
pub struct ChordsCommand {
    /// Root note, e.g. C, F#, Bb
    pub root: String,

    /// Chord quality name or abbreviation, e.g. Major, m7, dim
    #[arg(default_value = "Major")]
    pub quality: String,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Allow muted strings
    #[arg(long)]
    pub muted: bool,

    /// Allow chords without the root
    #[arg(long)]
    pub rootless: bool,

    /// Allow chords missing some of their notes
    #[arg(long)]
    pub partial: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Find every run of a scale across the strings
#[derive(Parser, Debug)]
pub struct ScalesCommand {
    /// Root note, e.g. A, Eb
    pub root: String,

    /// Scale name, e.g. Major, "Minor Pentatonic"
    #[arg(default_value = "Major")]
    pub scale: String,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Each note must be exactly one scale step above the previous one
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Name the chords a fretting plays
#[derive(Parser, Debug)]
pub struct IdentifyCommand {
    /// Fretting from the first string, e.g. 0,0,0,3 or x32010
    pub fretting: String,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Only consider these qualities (name or abbreviation, repeatable)
    #[arg(short, long)]
    pub quality: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One shape per line
    Text,
    /// Diagram descriptions
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BarreArg {
    #[value(name = "none")]
    Off,
    Partial,
    Full,
}

impl From<BarreArg> for BarreTypeOption {
    fn from(arg: BarreArg) -> Self {
        match arg {
            BarreArg::Off => BarreTypeOption::None,
            BarreArg::Partial => BarreTypeOption::Partial,
            BarreArg::Full => BarreTypeOption::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkTextArg {
    #[value(name = "none")]
    Off,
    Note,
    Interval,
}

impl From<MarkTextArg> for MarkTextOption {
    fn from(arg: MarkTextArg) -> Self {
        match arg {
            MarkTextArg::Off => MarkTextOption::None,
            MarkTextArg::Note => MarkTextOption::ShowNote,
            MarkTextArg::Interval => MarkTextOption::ShowInterval,
        }
    }
}
