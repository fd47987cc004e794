//! # Chord Finder
//!
//! Finds every fretting of a chord on an instrument.
//!
//! ## Algorithm
//! Depth-first over the strings, first to last. On each string the search
//! branches into:
//! 1. the muted string, when muted strings are allowed
//! 2. every fret from the starting fret (0, or 1 without open strings) up to
//!    `max_fret` whose note belongs to the chord
//!
//! Frets that do not sound a chord tone are never explored, which keeps the
//! branching bounded by the number of chord tones per string. Paths whose
//! fretted span already exceeds `max_reach` are abandoned early.
//!
//! When every string has a value the fretting is checked against the
//! rootless/partial policy (see [`accepts`]) and handed to the result set,
//! which validates it again before inserting it in canonical order.
//!
//! ## Example
//! ```rust
//! use fretboard::{find_chords, ChordFinderOptions, InternalNote, Library};
//!
//! let library = Library::builtin()?;
//! let ukulele = library.instrument("Ukulele")?;
//! let options = ChordFinderOptions::new(
//!     ukulele,
//!     ukulele.tuning("Standard")?,
//!     InternalNote::C,
//!     library.chord_quality("major")?,
//! )?
//! .with_max_fret(5);
//!
//! let results = find_chords(&options)?;
//! assert!(results.iter().any(|r| r.frets() == [0, 0, 0, 3]));
//! # Ok::<(), fretboard::FretError>(())
//! ```

use crate::cancel::CancellationToken;
use crate::diagram::{
    diagram_string, mark_kind, mark_text, BottomMark, Diagram, DiagramMark, DiagramStyle, MarkKind,
    ToDiagram,
};
use crate::error::FretError;
use crate::instrument::Tuning;
use crate::marks::{self, MUTED};
use crate::note::InternalNote;
use crate::options::ChordFinderOptions;
use crate::results::{CanonicalOrder, ResultSet};
use log::{debug, trace};
use std::cmp::Ordering;

/// One fretting: a fret per string, [`MUTED`] for strings not played
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordFinderResult {
    frets: Vec<i32>,
}

impl ChordFinderResult {
    pub fn new(frets: Vec<i32>) -> Self {
        Self { frets }
    }

    pub fn frets(&self) -> &[i32] {
        &self.frets
    }

    /// Pitch class sounded by each string, `None` when muted.
    pub fn notes(&self, tuning: &Tuning) -> Vec<Option<InternalNote>> {
        self.frets
            .iter()
            .enumerate()
            .map(|(string, &fret)| (fret != MUTED).then(|| tuning.note_at(string, fret)))
            .collect()
    }

    pub fn reach(&self) -> i32 {
        marks::reach(self.frets.iter().copied())
    }

    /// Frets written compactly, e.g. `x32010`, or space separated once any
    /// fret needs two digits.
    pub fn shape(&self) -> String {
        let wide = self.frets.iter().any(|&f| f > 9);
        let parts: Vec<String> = self
            .frets
            .iter()
            .map(|&f| if f == MUTED { "x".to_string() } else { f.to_string() })
            .collect();
        parts.join(if wide { " " } else { "" })
    }
}

impl CanonicalOrder for ChordFinderResult {
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        marks::compare_chords(&self.frets, &other.frets)
    }
}

impl ToDiagram for ChordFinderResult {
    type Options = ChordFinderOptions;

    fn to_diagram(&self, options: &ChordFinderOptions, style: &DiagramStyle) -> Diagram {
        let title = style
            .show_title
            .then(|| options.quality().chord_name(options.root(), style.note_names));
        fretting_diagram(
            &self.frets,
            options.tuning(),
            options.root(),
            title,
            options.num_frets(),
            style,
        )
    }
}

/// Describe a one-fret-per-string shape as a diagram.
pub(crate) fn fretting_diagram(
    frets: &[i32],
    tuning: &Tuning,
    root: InternalNote,
    title: Option<String>,
    num_frets: i32,
    style: &DiagramStyle,
) -> Diagram {
    let num_strings = frets.len();
    let (relative, base_line) = marks::absolute_to_relative_frets(frets, num_frets);

    let mut diagram_marks = Vec::with_capacity(num_strings);
    let mut bottom_marks = Vec::new();
    for (index, &fret) in frets.iter().enumerate() {
        let string = diagram_string(index, num_strings, style.mirror);
        if fret == MUTED {
            diagram_marks.push(DiagramMark {
                string,
                fret: 0,
                kind: MarkKind::Muted,
                text: None,
            });
            continue;
        }
        let note = tuning.note_at(index, fret);
        diagram_marks.push(DiagramMark {
            string,
            fret: relative[index],
            kind: mark_kind(fret, note, root, style),
            text: mark_text(note, root, style),
        });
        if style.show_bottom_marks {
            bottom_marks.push(BottomMark {
                string,
                text: note.name(style.note_names),
            });
        }
    }
    diagram_marks.sort_by_key(|m| m.string);
    bottom_marks.sort_by_key(|m| m.string);

    Diagram {
        title,
        num_strings,
        num_frets,
        base_line,
        marks: diagram_marks,
        bottom_marks,
        barre: marks::auto_barre_position(&relative, style.barre_type, style.mirror),
    }
}

/// Chord search results in canonical order
pub type ChordFinderResultSet = ResultSet<ChordFinderOptions, ChordFinderResult>;

impl ResultSet<ChordFinderOptions, ChordFinderResult> {
    /// Validate and insert a fretting. Returns whether it was kept.
    pub(crate) fn add_result(&mut self, frets: Vec<i32>) -> bool {
        if !marks::validate_chord(&frets, self.options()) {
            trace!("Rejected chord fretting {:?}", frets);
            return false;
        }
        self.insert(ChordFinderResult::new(frets));
        true
    }

    /// Diagram descriptions for every result, in order.
    pub fn diagrams(&self, style: &DiagramStyle) -> Vec<Diagram> {
        self.iter().map(|r| r.to_diagram(self.options(), style)).collect()
    }
}

/// Acceptance policy for a complete fretting.
///
/// `has_notes[i]` tells whether target pitch class `i` is sounded, and
/// `root_index` is the position of the root among the targets.
/// - all targets present: accept
/// - rootless allowed: accept partial chords, or any chord that only lacks the root
/// - rootless not allowed: accept partial chords that still contain the root
pub fn accepts(
    has_notes: &[bool],
    root_index: Option<usize>,
    allow_rootless: bool,
    allow_partial: bool,
) -> bool {
    if has_notes.iter().all(|&present| present) {
        return true;
    }
    if allow_rootless {
        allow_partial
            || has_notes
                .iter()
                .enumerate()
                .all(|(i, &present)| present || Some(i) == root_index)
    } else {
        allow_partial && root_index.map_or(true, |root| has_notes[root])
    }
}

struct ChordSearch<'a> {
    options: &'a ChordFinderOptions,
    cancel: Option<&'a CancellationToken>,
    targets: Vec<InternalNote>,
    root_index: Option<usize>,
    /// Fret chosen on each string searched so far
    frets: Vec<i32>,
}

impl<'a> ChordSearch<'a> {
    fn new(options: &'a ChordFinderOptions, cancel: Option<&'a CancellationToken>) -> Self {
        let targets = options.quality().pitch_classes(options.root());
        let root_index = targets.iter().position(|&n| n == options.root());
        Self {
            options,
            cancel,
            targets,
            root_index,
            frets: Vec::with_capacity(options.num_strings()),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.map_or(false, CancellationToken::is_cancelled)
    }

    fn search(&mut self, string: usize, results: &mut ChordFinderResultSet) {
        if self.is_cancelled() {
            return;
        }
        if marks::reach(self.frets.iter().copied()) > self.options.max_reach() {
            return;
        }
        if string == self.options.num_strings() {
            self.submit(results);
            return;
        }

        if self.options.allow_muted_strings() {
            self.frets.push(MUTED);
            self.search(string + 1, results);
            self.frets.pop();
        }

        let options = self.options;
        let tuning = options.tuning();
        for fret in options.starting_fret()..=options.max_fret() {
            if self.targets.contains(&tuning.note_at(string, fret)) {
                self.frets.push(fret);
                self.search(string + 1, results);
                self.frets.pop();
            }
        }
    }

    fn submit(&self, results: &mut ChordFinderResultSet) {
        let tuning = self.options.tuning();
        let has_notes: Vec<bool> = self
            .targets
            .iter()
            .map(|&target| {
                self.frets
                    .iter()
                    .enumerate()
                    .any(|(string, &fret)| fret != MUTED && tuning.note_at(string, fret) == target)
            })
            .collect();

        if accepts(
            &has_notes,
            self.root_index,
            self.options.allow_rootless_chords(),
            self.options.allow_partial_chords(),
        ) {
            results.add_result(self.frets.clone());
        }
    }
}

/// Find every chord shape matching the options.
pub fn find_chords(options: &ChordFinderOptions) -> Result<ChordFinderResultSet, FretError> {
    run(options, None)
}

/// Like [`find_chords`], stopping early once `cancel` is raised. A cancelled
/// search returns the shapes found so far.
pub fn find_chords_with_cancel(
    options: &ChordFinderOptions,
    cancel: &CancellationToken,
) -> Result<ChordFinderResultSet, FretError> {
    run(options, Some(cancel))
}

fn run(
    options: &ChordFinderOptions,
    cancel: Option<&CancellationToken>,
) -> Result<ChordFinderResultSet, FretError> {
    options.validate()?;

    debug!(
        "Searching for {} on {} ({}), frets {}..={}",
        options.quality().chord_name(options.root(), Default::default()),
        options.instrument_name(),
        options.tuning().name(),
        options.starting_fret(),
        options.max_fret()
    );

    let mut results = ChordFinderResultSet::new(options.clone());
    let mut search = ChordSearch::new(options, cancel);
    search.search(0, &mut results);

    if search.is_cancelled() {
        debug!("Chord search cancelled with {} results", results.len());
    } else {
        debug!("Chord search found {} results", results.len());
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::MarkTextOption;
    use crate::instrument::Instrument;
    use crate::interval::ChordQuality;
    use crate::marks::{BarrePosition, BarreTypeOption};

    fn ukulele_options(quality: ChordQuality) -> ChordFinderOptions {
        let tuning = Tuning::parse("Standard", "G4 C4 E4 A4").unwrap();
        let instrument = Instrument::new("Ukulele", 4).unwrap();
        ChordFinderOptions::new(&instrument, &tuning, InternalNote::C, &quality).unwrap()
    }

    fn major() -> ChordQuality {
        ChordQuality::new("Major", "", vec![0, 4, 7]).unwrap()
    }

    #[test]
    fn test_accept_policy() {
        // Targets: root, third, fifth
        let all = [true, true, true];
        let no_fifth = [true, true, false];
        let no_root = [false, true, true];
        let root_only = [true, false, false];
        let third_only = [false, true, false];

        assert!(accepts(&all, Some(0), false, false));
        assert!(!accepts(&no_fifth, Some(0), false, false));
        assert!(!accepts(&no_root, Some(0), false, false));

        assert!(accepts(&no_fifth, Some(0), false, true));
        assert!(accepts(&root_only, Some(0), false, true));
        assert!(!accepts(&no_root, Some(0), false, true));

        assert!(accepts(&no_root, Some(0), true, false));
        assert!(!accepts(&no_fifth, Some(0), true, false));
        assert!(!accepts(&third_only, Some(0), true, false));

        assert!(accepts(&third_only, Some(0), true, true));
        assert!(accepts(&no_fifth, None, false, true));
    }

    #[test]
    fn test_finds_open_c() {
        let options = ukulele_options(major()).with_max_fret(5);
        let results = find_chords(&options).unwrap();
        assert!(results.iter().any(|r| r.frets() == [0, 0, 0, 3]));
        assert_eq!(results[0].frets(), &[0, 0, 0, 3]);
    }

    #[test]
    fn test_muted_strings() {
        let options = ukulele_options(major()).with_max_fret(5).with_muted_strings(true);
        let results = find_chords(&options).unwrap();
        assert!(results.iter().any(|r| r.frets() == [-1, 4, 3, 3]));
        assert!(results.iter().any(|r| r.frets() == [0, 0, 0, -1]));
        assert!(!results.iter().any(|r| r.frets() == [-1, 0, 0, 3]));
        assert!(results.iter().all(|r| r.frets().iter().any(|&f| f != MUTED)));
    }

    #[test]
    fn test_no_open_strings() {
        let options = ukulele_options(major()).with_open_strings(false);
        let results = find_chords(&options).unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.frets().iter().all(|&f| f > 0)));
    }

    #[test]
    fn test_cancelled_search_is_empty() {
        let options = ukulele_options(major());
        let token = CancellationToken::new();
        token.cancel();
        let results = find_chords_with_cancel(&options, &token).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_options_fail_fast() {
        let options = ukulele_options(major()).with_open_strings(false).with_max_fret(0);
        assert!(matches!(
            find_chords(&options),
            Err(FretError::InvalidArgument { arg: "max_fret", .. })
        ));
    }

    #[test]
    fn test_shape() {
        assert_eq!(ChordFinderResult::new(vec![-1, 3, 2, 0, 1, 0]).shape(), "x32010");
        assert_eq!(ChordFinderResult::new(vec![10, 10, 12, 12]).shape(), "10 10 12 12");
    }

    #[test]
    fn test_to_diagram() {
        let options = ukulele_options(major());
        let result = ChordFinderResult::new(vec![0, 0, 0, 3]);
        let style = DiagramStyle {
            show_bottom_marks: true,
            mark_text: MarkTextOption::ShowInterval,
            ..DiagramStyle::default()
        };
        let diagram = result.to_diagram(&options, &style);
        assert_eq!(diagram.title.as_deref(), Some("C"));
        assert_eq!(diagram.base_line, 0);
        assert_eq!(diagram.marks.len(), 4);
        assert_eq!(diagram.marks[0].kind, MarkKind::Open);
        assert_eq!(diagram.marks[3].kind, MarkKind::Root);
        assert_eq!(diagram.marks[3].fret, 3);
        assert_eq!(diagram.marks[2].text.as_deref(), Some("3"));
        let bottom: Vec<&str> = diagram.bottom_marks.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(bottom, vec!["G", "C", "E", "C"]);
    }

    #[test]
    fn test_to_diagram_high_shape_with_barre() {
        let options = ukulele_options(major());
        let result = ChordFinderResult::new(vec![5, 4, 3, 3]);
        let style = DiagramStyle {
            barre_type: BarreTypeOption::Partial,
            mirror: true,
            show_title: false,
            ..DiagramStyle::default()
        };
        let diagram = result.to_diagram(&options, &style);
        assert_eq!(diagram.title, None);
        assert_eq!(diagram.base_line, 0);
        assert_eq!(diagram.marks[0].string, 1);
        assert_eq!(diagram.marks[0].fret, 3);
        assert_eq!(
            diagram.barre,
            Some(BarrePosition { fret: 3, start_string: 1, end_string: 2 })
        );

        let high = ChordFinderResult::new(vec![12, 12, 12, 15]);
        let diagram = high.to_diagram(&options, &DiagramStyle::default());
        assert_eq!(diagram.base_line, 12);
        let frets: Vec<i32> = diagram.marks.iter().map(|m| m.fret).collect();
        assert_eq!(frets, vec![1, 1, 1, 4]);
    }
}
