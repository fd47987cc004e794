//! # Scale Finder
//!
//! Finds every way to play a scale run across the strings.
//!
//! Unlike chords, a scale shape can put zero, one or several marks on a
//! string. The degrees must be played in order: along a string the frets
//! climb, and the run moves from string 1 towards the last string.
//!
//! ## Algorithm
//! 1. Build the degree sequence from the root and the scale's intervals.
//! 2. Seed the search with every position on every string that plays the
//!    first degree.
//! 3. From each seed, on the current string try every fret above the last one
//!    used there (or from the starting fret on a fresh string) that plays the
//!    next degree, and stay on the string after a match. Independently, move
//!    on to the next string still looking for the same degree.
//! 4. Once every degree is placed, the marks go to the result set, which
//!    validates reach and bounds before inserting in canonical order.
//!
//! ## Strict intervals
//! Without strict intervals any octave of the next degree is accepted. With
//! strict intervals the distance in semitones from the previously placed
//! note must equal the scale's step exactly, so the run really climbs through
//! the scale. The previous note is the last one *placed*, however many strings
//! were skipped since.
//!
//! ## Example
//! ```rust
//! use fretboard::{find_scales, InternalNote, Library, ScaleFinderOptions};
//!
//! let library = Library::builtin()?;
//! let ukulele = library.instrument("Ukulele")?;
//! let options = ScaleFinderOptions::new(
//!     ukulele,
//!     ukulele.tuning("Standard")?,
//!     InternalNote::C,
//!     library.scale("Major Pentatonic")?,
//! )?
//! .with_strict_intervals(true);
//!
//! let results = find_scales(&options)?;
//! assert!(!results.is_empty());
//! assert!(results.iter().all(|r| r.marks().len() == 5));
//! # Ok::<(), fretboard::FretError>(())
//! ```

use crate::cancel::CancellationToken;
use crate::diagram::{diagram_string, mark_kind, mark_text, Diagram, DiagramMark, DiagramStyle, ToDiagram};
use crate::error::FretError;
use crate::instrument::Tuning;
use crate::marks::{self, MarkPosition};
use crate::note::{FullNote, InternalNote};
use crate::options::ScaleFinderOptions;
use crate::results::{CanonicalOrder, ResultSet};
use log::{debug, trace};
use std::cmp::Ordering;

/// One scale shape: marks in the order the degrees are played
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScaleFinderResult {
    marks: Vec<MarkPosition>,
}

impl ScaleFinderResult {
    pub fn new(marks: Vec<MarkPosition>) -> Self {
        Self { marks }
    }

    pub fn marks(&self) -> &[MarkPosition] {
        &self.marks
    }

    pub fn reach(&self) -> i32 {
        marks::reach(self.marks.iter().map(|m| m.fret))
    }

    /// Octave-aware note of every mark, in order.
    pub fn notes(&self, tuning: &Tuning) -> Vec<FullNote> {
        self.marks
            .iter()
            .map(|m| tuning.full_note_at(m.string - 1, m.fret))
            .collect()
    }
}

impl CanonicalOrder for ScaleFinderResult {
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        marks::compare_scales(&self.marks, &other.marks)
    }
}

impl ToDiagram for ScaleFinderResult {
    type Options = ScaleFinderOptions;

    fn to_diagram(&self, options: &ScaleFinderOptions, style: &DiagramStyle) -> Diagram {
        let num_strings = options.num_strings();
        let root = options.root();
        let (relative, base_line) = marks::absolute_to_relative_marks(&self.marks, options.num_frets());

        let mut diagram_marks: Vec<DiagramMark> = self
            .marks
            .iter()
            .zip(relative)
            .map(|(absolute, relative)| {
                let note = options.tuning().note_at(absolute.string - 1, absolute.fret);
                DiagramMark {
                    string: diagram_string(absolute.string - 1, num_strings, style.mirror),
                    fret: relative.fret,
                    kind: mark_kind(absolute.fret, note, root, style),
                    text: mark_text(note, root, style),
                }
            })
            .collect();
        diagram_marks.sort_by_key(|m| (m.string, m.fret));

        Diagram {
            title: style
                .show_title
                .then(|| options.scale().scale_name(root, style.note_names)),
            num_strings,
            num_frets: options.num_frets(),
            base_line,
            marks: diagram_marks,
            bottom_marks: Vec::new(),
            barre: None,
        }
    }
}

/// Scale search results in canonical order
pub type ScaleFinderResultSet = ResultSet<ScaleFinderOptions, ScaleFinderResult>;

impl ResultSet<ScaleFinderOptions, ScaleFinderResult> {
    /// Validate and insert a shape. Returns whether it was kept.
    pub(crate) fn add_result(&mut self, marks: Vec<MarkPosition>) -> bool {
        if !marks::validate_scale(&marks, self.options()) {
            trace!("Rejected scale shape {:?}", marks);
            return false;
        }
        self.insert(ScaleFinderResult::new(marks));
        true
    }

    /// Diagram descriptions for every result, in order.
    pub fn diagrams(&self, style: &DiagramStyle) -> Vec<Diagram> {
        self.iter().map(|r| r.to_diagram(self.options(), style)).collect()
    }
}

/// A position that plays the first degree
#[derive(Debug, Clone, Copy)]
struct StartingNote {
    string: usize,
    fret: i32,
    note: FullNote,
}

struct ScaleSearch<'a> {
    options: &'a ScaleFinderOptions,
    cancel: Option<&'a CancellationToken>,
    targets: Vec<InternalNote>,
    /// Marks placed so far, in degree order
    path: Vec<MarkPosition>,
}

impl<'a> ScaleSearch<'a> {
    fn new(options: &'a ScaleFinderOptions, cancel: Option<&'a CancellationToken>) -> Self {
        let targets = options.scale().notes(options.root());
        Self {
            options,
            cancel,
            path: Vec::with_capacity(targets.len()),
            targets,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.map_or(false, CancellationToken::is_cancelled)
    }

    /// Every position on every string that plays the first degree.
    fn starting_notes(&self) -> Vec<StartingNote> {
        let options = self.options;
        let tuning = options.tuning();
        let first = self.targets[0];
        let mut starts = Vec::new();
        for string in 0..options.num_strings() {
            let open = tuning.open_note(string);
            // First fret at or above the starting fret that plays the degree,
            // then every octave above it
            let offset = (open.note.interval_to(first) - options.starting_fret()).rem_euclid(12);
            let mut fret = options.starting_fret() + offset;
            while fret <= options.max_fret() {
                starts.push(StartingNote {
                    string,
                    fret,
                    note: open.shift(fret),
                });
                fret += 12;
            }
        }
        starts
    }

    fn search(
        &mut self,
        string: usize,
        last_fret: Option<i32>,
        next_note: usize,
        previous: FullNote,
        results: &mut ScaleFinderResultSet,
    ) {
        if self.is_cancelled() {
            return;
        }
        if marks::reach(self.path.iter().map(|m| m.fret)) > self.options.max_reach() {
            return;
        }
        if next_note == self.targets.len() {
            results.add_result(self.path.clone());
            return;
        }
        if string >= self.options.num_strings() {
            return;
        }

        let options = self.options;
        let tuning = options.tuning();
        let target = self.targets[next_note];
        let start = last_fret.map_or(options.starting_fret(), |fret| fret + 1);
        for fret in start..=options.max_fret() {
            let note = tuning.full_note_at(string, fret);
            if note.note != target {
                continue;
            }
            if options.strict_intervals() && previous.distance_to(note) != options.scale().step(next_note) {
                continue;
            }
            self.path.push(MarkPosition::new(string + 1, fret));
            self.search(string, Some(fret), next_note + 1, note, results);
            self.path.pop();
        }

        self.search(string + 1, None, next_note, previous, results);
    }
}

/// Find every scale shape matching the options.
pub fn find_scales(options: &ScaleFinderOptions) -> Result<ScaleFinderResultSet, FretError> {
    run(options, None)
}

/// Like [`find_scales`], stopping early once `cancel` is raised. A cancelled
/// search returns the shapes found so far.
pub fn find_scales_with_cancel(
    options: &ScaleFinderOptions,
    cancel: &CancellationToken,
) -> Result<ScaleFinderResultSet, FretError> {
    run(options, Some(cancel))
}

fn run(
    options: &ScaleFinderOptions,
    cancel: Option<&CancellationToken>,
) -> Result<ScaleFinderResultSet, FretError> {
    options.validate()?;

    debug!(
        "Searching for {} on {} ({}), frets {}..={}, strict: {}",
        options.scale().scale_name(options.root(), Default::default()),
        options.instrument_name(),
        options.tuning().name(),
        options.starting_fret(),
        options.max_fret(),
        options.strict_intervals()
    );

    let mut results = ScaleFinderResultSet::new(options.clone());
    let mut search = ScaleSearch::new(options, cancel);
    for start in search.starting_notes() {
        if search.is_cancelled() {
            break;
        }
        search.path.push(MarkPosition::new(start.string + 1, start.fret));
        search.search(start.string, Some(start.fret), 1, start.note, &mut results);
        search.path.pop();
    }

    if search.is_cancelled() {
        debug!("Scale search cancelled with {} results", results.len());
    } else {
        debug!("Scale search found {} results", results.len());
    }
    Ok(results)
}
