//! # Reverse Chord Finder
//!
//! Names the chords a fretting plays.
//!
//! Every root (12) is paired with every candidate quality, and a pair matches
//! when its pitch-class set equals the set of pitch classes the fretting
//! sounds. Octaves and doublings are ignored, the same way the forward chord
//! finder compares notes.
//!
//! ## Example
//! ```rust
//! use fretboard::{identify_chords, InternalNote, Library, NoteNamePreference, ReverseChordFinderOptions};
//!
//! let library = Library::builtin()?;
//! let ukulele = library.instrument("Ukulele")?;
//! let options = ReverseChordFinderOptions::new(
//!     ukulele,
//!     ukulele.tuning("Standard")?,
//!     vec![0, 0, 0, 3],
//!     library.chord_qualities().to_vec(),
//! )?;
//!
//! let results = identify_chords(&options)?;
//! assert_eq!(results[0].root(), InternalNote::C);
//! assert_eq!(results[0].name(NoteNamePreference::PreferSharps), "C");
//! # Ok::<(), fretboard::FretError>(())
//! ```

use crate::cancel::CancellationToken;
use crate::chord_finder::fretting_diagram;
use crate::diagram::{Diagram, DiagramStyle, ToDiagram};
use crate::error::FretError;
use crate::instrument::{Instrument, Tuning};
use crate::interval::ChordQuality;
use crate::marks::MUTED;
use crate::note::{InternalNote, NoteNamePreference};
use crate::options::{DEFAULT_NUM_FRETS, MAX_FRET_LIMIT};
use crate::results::{CanonicalOrder, ResultSet};
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// An observed fretting plus the chord qualities to test it against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseChordFinderOptions {
    instrument: String,
    tuning: Tuning,
    frets: Vec<i32>,
    qualities: Vec<ChordQuality>,
    num_frets: i32,
}

impl ReverseChordFinderOptions {
    pub fn new(
        instrument: &Instrument,
        tuning: &Tuning,
        frets: Vec<i32>,
        qualities: Vec<ChordQuality>,
    ) -> Result<Self, FretError> {
        instrument.check_tuning(tuning)?;
        if frets.len() != tuning.num_strings() {
            return Err(FretError::InvalidArgument {
                arg: "frets",
                message: format!(
                    "expected {} frets, got {}",
                    tuning.num_strings(),
                    frets.len()
                ),
            });
        }
        if let Some(&bad) = frets.iter().find(|&&f| f < MUTED) {
            return Err(FretError::InvalidArgument {
                arg: "frets",
                message: format!("fret {} is below {} (muted)", bad, MUTED),
            });
        }
        if let Some(&bad) = frets.iter().find(|&&f| f > MAX_FRET_LIMIT) {
            return Err(FretError::InvalidArgument {
                arg: "frets",
                message: format!("fret {} is above {}", bad, MAX_FRET_LIMIT),
            });
        }
        Ok(Self {
            instrument: instrument.name().to_string(),
            tuning: tuning.clone(),
            frets,
            qualities,
            num_frets: DEFAULT_NUM_FRETS,
        })
    }

    /// Diagram height used by [`ToDiagram`].
    pub fn with_num_frets(mut self, num_frets: i32) -> Self {
        self.num_frets = num_frets.max(1);
        self
    }

    pub fn instrument_name(&self) -> &str {
        &self.instrument
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn frets(&self) -> &[i32] {
        &self.frets
    }

    pub fn qualities(&self) -> &[ChordQuality] {
        &self.qualities
    }

    pub fn num_frets(&self) -> i32 {
        self.num_frets
    }

    /// Pitch classes the fretting sounds.
    pub fn sounded_notes(&self) -> BTreeSet<InternalNote> {
        self.frets
            .iter()
            .enumerate()
            .filter(|&(_, &fret)| fret != MUTED)
            .map(|(string, &fret)| self.tuning.note_at(string, fret))
            .collect()
    }
}

/// A (root, quality) pair that matches the fretting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseChordFinderResult {
    root: InternalNote,
    quality: ChordQuality,
    /// Position of the quality in the candidate list, used for ordering
    quality_index: usize,
}

impl ReverseChordFinderResult {
    pub fn root(&self) -> InternalNote {
        self.root
    }

    pub fn quality(&self) -> &ChordQuality {
        &self.quality
    }

    /// Chord symbol, e.g. `Am7`.
    pub fn name(&self, preference: NoteNamePreference) -> String {
        self.quality.chord_name(self.root, preference)
    }
}

impl CanonicalOrder for ReverseChordFinderResult {
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.root
            .cmp(&other.root)
            .then(self.quality_index.cmp(&other.quality_index))
    }
}

impl ToDiagram for ReverseChordFinderResult {
    type Options = ReverseChordFinderOptions;

    fn to_diagram(&self, options: &ReverseChordFinderOptions, style: &DiagramStyle) -> Diagram {
        let title = style.show_title.then(|| self.name(style.note_names));
        fretting_diagram(
            options.frets(),
            options.tuning(),
            self.root,
            title,
            options.num_frets(),
            style,
        )
    }
}

/// Matching chords in canonical order (by root, then candidate order)
pub type ReverseChordFinderResultSet = ResultSet<ReverseChordFinderOptions, ReverseChordFinderResult>;

impl ResultSet<ReverseChordFinderOptions, ReverseChordFinderResult> {
    /// Diagram descriptions for every match, in order.
    pub fn diagrams(&self, style: &DiagramStyle) -> Vec<Diagram> {
        self.iter().map(|r| r.to_diagram(self.options(), style)).collect()
    }
}

/// Name every (root, quality) pair whose notes are exactly the fretting's notes.
pub fn identify_chords(
    options: &ReverseChordFinderOptions,
) -> Result<ReverseChordFinderResultSet, FretError> {
    run(options, None)
}

/// Like [`identify_chords`], stopping early once `cancel` is raised.
pub fn identify_chords_with_cancel(
    options: &ReverseChordFinderOptions,
    cancel: &CancellationToken,
) -> Result<ReverseChordFinderResultSet, FretError> {
    run(options, Some(cancel))
}

fn run(
    options: &ReverseChordFinderOptions,
    cancel: Option<&CancellationToken>,
) -> Result<ReverseChordFinderResultSet, FretError> {
    let sounded = options.sounded_notes();
    debug!(
        "Identifying {:?} on {} ({}) against {} qualities",
        options.frets(),
        options.instrument_name(),
        options.tuning().name(),
        options.qualities().len()
    );

    let mut results = ReverseChordFinderResultSet::new(options.clone());
    'roots: for root in InternalNote::ALL {
        for (quality_index, quality) in options.qualities().iter().enumerate() {
            if cancel.map_or(false, CancellationToken::is_cancelled) {
                debug!("Chord identification cancelled with {} results", results.len());
                break 'roots;
            }
            let target: BTreeSet<InternalNote> = quality.pitch_classes(root).into_iter().collect();
            if target == sounded {
                results.insert(ReverseChordFinderResult {
                    root,
                    quality: quality.clone(),
                    quality_index,
                });
            }
        }
    }

    debug!("Chord identification found {} results", results.len());
    Ok(results)
}
