//! # Mark Utilities
//!
//! Shared helpers for the shapes the finders produce.
//!
//! Chord shapes are one fret value per string: [`MUTED`] (-1), open (0) or a
//! fretted position (> 0). Scale shapes are lists of [`MarkPosition`]s with any
//! number of marks per string.
//!
//! ## Operations
//! - [`validate_chord`] / [`validate_scale`] - structural and reach checks. A
//!   shape that fails is dropped silently; it is not an error.
//! - [`absolute_to_relative_frets`] / [`absolute_to_relative_marks`] - shift a
//!   shape found high on the neck into a compact diagram with a base line.
//! - [`auto_barre_position`] - detect a barre across adjacent strings.
//! - [`compare_chords`] / [`compare_scales`] - the canonical result order.
//! - [`parse_frets`] - read a fretting written as `x32010` or `0,0,0,3`.
//!
//! ## Reach
//! Reach counts the frets a hand covers: `max - min + 1` over the fretted
//! positions. Open and muted strings need no finger and are ignored. A shape
//! with nothing fretted has a reach of 0.

use crate::error::FretError;
use crate::options::{ChordFinderOptions, ScaleFinderOptions};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Fret value of a string that is not played
pub const MUTED: i32 = -1;

/// Fret value of a string played without fretting
pub const OPEN: i32 = 0;

/// A single mark on the fretboard. Strings are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkPosition {
    pub string: usize,
    pub fret: i32,
}

impl MarkPosition {
    pub fn new(string: usize, fret: i32) -> Self {
        Self { string, fret }
    }
}

/// A barre across `start_string..=end_string` at `fret`. Strings are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarrePosition {
    pub fret: i32,
    pub start_string: usize,
    pub end_string: usize,
}

/// How far an automatically detected barre should extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarreTypeOption {
    /// Never draw a barre
    #[default]
    None,
    /// Cover only the strings between the outermost strings held at the barre fret
    Partial,
    /// Also cover neighbouring strings fretted at or above the barre fret
    Full,
}

/// Lowest and highest fretted position, ignoring open and muted strings.
pub fn fretted_range(frets: impl IntoIterator<Item = i32>) -> Option<(i32, i32)> {
    frets
        .into_iter()
        .filter(|&f| f > OPEN)
        .fold(None, |range, f| match range {
            None => Some((f, f)),
            Some((min, max)) => Some((min.min(f), max.max(f))),
        })
}

/// Number of frets the hand covers.
pub fn reach(frets: impl IntoIterator<Item = i32>) -> i32 {
    match fretted_range(frets) {
        Some((min, max)) => max - min + 1,
        None => 0,
    }
}

/// Check a chord fretting against the options that produced it.
pub fn validate_chord(frets: &[i32], options: &ChordFinderOptions) -> bool {
    if frets.len() != options.num_strings() {
        return false;
    }
    if frets.iter().all(|&f| f == MUTED) {
        return false;
    }
    for &fret in frets {
        if fret < MUTED || fret > options.max_fret() {
            return false;
        }
        if fret == MUTED && !options.allow_muted_strings() {
            return false;
        }
        if fret == OPEN && !options.allow_open_strings() {
            return false;
        }
    }
    reach(frets.iter().copied()) <= options.max_reach()
}

/// Check a scale shape against the options that produced it.
pub fn validate_scale(marks: &[MarkPosition], options: &ScaleFinderOptions) -> bool {
    if marks.is_empty() {
        return false;
    }
    let mut seen = HashSet::with_capacity(marks.len());
    for mark in marks {
        if mark.string == 0 || mark.string > options.num_strings() {
            return false;
        }
        if mark.fret < options.starting_fret() || mark.fret > options.max_fret() {
            return false;
        }
        if !seen.insert(*mark) {
            return false;
        }
    }
    reach(marks.iter().map(|m| m.fret)) <= options.max_reach()
}

/// Base line for a shape: 0 when it fits below the nut within `num_frets`,
/// otherwise its lowest fretted position.
fn base_line(range: Option<(i32, i32)>, num_frets: i32) -> i32 {
    match range {
        Some((min, max)) if max > num_frets => min,
        _ => 0,
    }
}

fn relative_fret(fret: i32, base_line: i32) -> i32 {
    if base_line > 0 && fret > OPEN {
        fret - base_line + 1
    } else {
        fret
    }
}

/// Shift a chord so it fits in a `num_frets`-high diagram.
///
/// Returns the relative frets and the base line. A base line of 0 means the
/// shape is drawn from the nut unchanged; otherwise fretted positions are
/// renumbered so the base line fret becomes fret 1. Open and muted strings
/// keep their values.
///
/// ```rust
/// use fretboard::marks::absolute_to_relative_frets;
///
/// assert_eq!(absolute_to_relative_frets(&[0, 0, 0, 3], 5), (vec![0, 0, 0, 3], 0));
/// assert_eq!(absolute_to_relative_frets(&[7, 7, 8, 10], 5), (vec![1, 1, 2, 4], 7));
/// ```
pub fn absolute_to_relative_frets(frets: &[i32], num_frets: i32) -> (Vec<i32>, i32) {
    let base = base_line(fretted_range(frets.iter().copied()), num_frets);
    let relative = frets.iter().map(|&f| relative_fret(f, base)).collect();
    (relative, base)
}

/// Shift a scale shape so it fits in a `num_frets`-high diagram.
pub fn absolute_to_relative_marks(
    marks: &[MarkPosition],
    num_frets: i32,
) -> (Vec<MarkPosition>, i32) {
    let base = base_line(fretted_range(marks.iter().map(|m| m.fret)), num_frets);
    let relative = marks
        .iter()
        .map(|m| MarkPosition::new(m.string, relative_fret(m.fret, base)))
        .collect();
    (relative, base)
}

/// Detect a barre at the lowest fretted position.
///
/// At least two strings must be held at that fret, and no string between
/// them may be open or muted. With `mirror` the string numbers are reported
/// for a left-handed (reversed) diagram.
pub fn auto_barre_position(
    frets: &[i32],
    barre_type: BarreTypeOption,
    mirror: bool,
) -> Option<BarrePosition> {
    if barre_type == BarreTypeOption::None {
        return None;
    }
    let (fret, _) = fretted_range(frets.iter().copied())?;

    let first = frets.iter().position(|&f| f == fret)?;
    let last = frets.iter().rposition(|&f| f == fret)?;
    if first == last {
        return None;
    }
    if frets[first..=last].iter().any(|&f| f < fret) {
        return None;
    }

    let (mut start, mut end) = (first, last);
    if barre_type == BarreTypeOption::Full {
        while start > 0 && frets[start - 1] >= fret {
            start -= 1;
        }
        while end + 1 < frets.len() && frets[end + 1] >= fret {
            end += 1;
        }
    }

    let (start_string, end_string) = if mirror {
        (frets.len() - end, frets.len() - start)
    } else {
        (start + 1, end + 1)
    };

    Some(BarrePosition {
        fret,
        start_string,
        end_string,
    })
}

/// Canonical order of chord shapes.
///
/// Shapes lower on the neck come first: by lowest fretted position, then by
/// highest fretted position, then string by string with muted before open
/// before fretted. Distinct shapes never compare equal.
pub fn compare_chords(a: &[i32], b: &[i32]) -> Ordering {
    let range_a = fretted_range(a.iter().copied()).unwrap_or((0, 0));
    let range_b = fretted_range(b.iter().copied()).unwrap_or((0, 0));
    range_a
        .0
        .cmp(&range_b.0)
        .then(range_a.1.cmp(&range_b.1))
        .then_with(|| a.cmp(b))
}

/// Canonical order of scale shapes: by lowest then highest fretted position,
/// then mark by mark, a shorter prefix first.
pub fn compare_scales(a: &[MarkPosition], b: &[MarkPosition]) -> Ordering {
    let range_a = fretted_range(a.iter().map(|m| m.fret)).unwrap_or((0, 0));
    let range_b = fretted_range(b.iter().map(|m| m.fret)).unwrap_or((0, 0));
    range_a
        .0
        .cmp(&range_b.0)
        .then(range_a.1.cmp(&range_b.1))
        .then_with(|| a.cmp(b))
}

/// Parse a fretting, first string first.
///
/// Either compact, one character per string (`x32010`), or separated by
/// commas or whitespace when frets need two digits (`x 10 12 12 x`).
/// `x` marks a muted string.
///
/// ```rust
/// use fretboard::marks::parse_frets;
///
/// assert_eq!(parse_frets("x32010")?, vec![-1, 3, 2, 0, 1, 0]);
/// assert_eq!(parse_frets("0, 0, 0, 10")?, vec![0, 0, 0, 10]);
/// assert!(parse_frets("0,0,q,3").is_err());
/// # Ok::<(), fretboard::FretError>(())
/// ```
pub fn parse_frets(fretting: &str) -> Result<Vec<i32>, FretError> {
    let fretting = fretting.trim();
    let separated = fretting.contains(|c: char| c == ',' || c.is_whitespace());
    let tokens: Vec<&str> = if separated {
        fretting
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        fretting
            .char_indices()
            .map(|(i, c)| &fretting[i..i + c.len_utf8()])
            .collect()
    };
    if tokens.is_empty() {
        return Err(FretError::InvalidArgument {
            arg: "fretting",
            message: "no frets given".to_string(),
        });
    }

    tokens
        .into_iter()
        .map(|token| {
            if token.eq_ignore_ascii_case("x") {
                return Ok(MUTED);
            }
            match token.parse::<i32>() {
                Ok(fret) if fret >= OPEN => Ok(fret),
                _ => Err(FretError::InvalidArgument {
                    arg: "fretting",
                    message: format!("'{}' is not a fret number or x", token),
                }),
            }
        })
        .collect()
}
