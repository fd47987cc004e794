//! # Interval Model
//!
//! Named interval sets: chord qualities and scales.
//!
//! A [`NamedInterval`] is an ordered list of semitone offsets above a root,
//! e.g. a major triad is `[0, 4, 7]`. Together with a root pitch class it
//! defines what a search is looking for:
//! - chords use the de-duplicated pitch-class *set* ([`NamedInterval::pitch_classes`])
//! - scales use the ordered degree *sequence* ([`NamedInterval::notes`])
//!
//! Offsets must start at 0 and never decrease. They may exceed 11, which is
//! how extended chords (a 9th is 14) and multi-octave scales are written.

use crate::error::FretError;
use crate::note::{InternalNote, NoteNamePreference};

/// An ordered, validated list of semitone offsets with a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedInterval {
    name: String,
    intervals: Vec<i32>,
}

impl NamedInterval {
    pub fn new(name: impl Into<String>, intervals: Vec<i32>) -> Result<Self, FretError> {
        let name = name.into();
        match intervals.first() {
            None => {
                return Err(FretError::InvalidArgument {
                    arg: "intervals",
                    message: format!("'{}' has no intervals", name),
                })
            }
            Some(&first) if first != 0 => {
                return Err(FretError::InvalidArgument {
                    arg: "intervals",
                    message: format!("'{}' must start at 0, starts at {}", name, first),
                })
            }
            Some(_) => {}
        }
        if intervals.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(FretError::InvalidArgument {
                arg: "intervals",
                message: format!("'{}' intervals must not decrease: {:?}", name, intervals),
            });
        }
        Ok(Self { name, intervals })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intervals(&self) -> &[i32] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// One pitch class per offset, in offset order.
    pub fn notes(&self, root: InternalNote) -> Vec<InternalNote> {
        self.intervals.iter().map(|&i| root.shift(i)).collect()
    }

    /// Distinct pitch classes, in order of first appearance. The root, when
    /// present, is always first.
    pub fn pitch_classes(&self, root: InternalNote) -> Vec<InternalNote> {
        let mut classes: Vec<InternalNote> = Vec::with_capacity(self.intervals.len());
        for note in self.notes(root) {
            if !classes.contains(&note) {
                classes.push(note);
            }
        }
        classes
    }
}

/// A chord quality such as major (`[0, 4, 7]`) or dominant seventh (`[0, 4, 7, 10]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordQuality {
    interval: NamedInterval,
    abbreviation: String,
}

impl ChordQuality {
    pub fn new(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        intervals: Vec<i32>,
    ) -> Result<Self, FretError> {
        Ok(Self {
            interval: NamedInterval::new(name, intervals)?,
            abbreviation: abbreviation.into(),
        })
    }

    pub fn name(&self) -> &str {
        self.interval.name()
    }

    /// Suffix used in chord symbols, e.g. `m7`. Empty for major.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn intervals(&self) -> &[i32] {
        self.interval.intervals()
    }

    pub fn pitch_classes(&self, root: InternalNote) -> Vec<InternalNote> {
        self.interval.pitch_classes(root)
    }

    /// Chord symbol for this quality on `root`, e.g. `Ebm7`.
    pub fn chord_name(&self, root: InternalNote, preference: NoteNamePreference) -> String {
        format!("{}{}", root.name(preference), self.abbreviation)
    }
}

/// A scale such as major (`[0, 2, 4, 5, 7, 9, 11]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    interval: NamedInterval,
}

impl Scale {
    pub fn new(name: impl Into<String>, intervals: Vec<i32>) -> Result<Self, FretError> {
        Ok(Self {
            interval: NamedInterval::new(name, intervals)?,
        })
    }

    pub fn name(&self) -> &str {
        self.interval.name()
    }

    pub fn intervals(&self) -> &[i32] {
        self.interval.intervals()
    }

    pub fn len(&self) -> usize {
        self.interval.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interval.is_empty()
    }

    /// Degree sequence starting at `root`.
    pub fn notes(&self, root: InternalNote) -> Vec<InternalNote> {
        self.interval.notes(root)
    }

    /// Semitones from degree `degree - 1` up to `degree`.
    pub fn step(&self, degree: usize) -> i32 {
        let intervals = self.interval.intervals();
        intervals[degree] - intervals[degree - 1]
    }

    /// Scale name on `root`, e.g. `A Natural Minor`.
    pub fn scale_name(&self, root: InternalNote, preference: NoteNamePreference) -> String {
        format!("{} {}", root.name(preference), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_interval_lists() {
        assert!(NamedInterval::new("empty", vec![]).is_err());
        assert!(NamedInterval::new("rootless", vec![4, 7]).is_err());
        assert!(NamedInterval::new("backwards", vec![0, 7, 4]).is_err());
        assert!(NamedInterval::new("unison", vec![0, 0, 7]).is_ok());
    }

    #[test]
    fn test_pitch_classes_dedup_and_root_first() {
        let add9 = NamedInterval::new("add9", vec![0, 4, 7, 12, 14]).unwrap();
        assert_eq!(
            add9.pitch_classes(InternalNote::C),
            vec![InternalNote::C, InternalNote::E, InternalNote::G, InternalNote::D]
        );
    }

    #[test]
    fn test_chord_name() {
        let minor7 = ChordQuality::new("Minor 7th", "m7", vec![0, 3, 7, 10]).unwrap();
        assert_eq!(minor7.chord_name(InternalNote::Ds, NoteNamePreference::PreferFlats), "Ebm7");
        let major = ChordQuality::new("Major", "", vec![0, 4, 7]).unwrap();
        assert_eq!(major.chord_name(InternalNote::G, NoteNamePreference::PreferSharps), "G");
    }

    #[test]
    fn test_scale_notes_and_steps() {
        let major = Scale::new("Major", vec![0, 2, 4, 5, 7, 9, 11]).unwrap();
        let notes = major.notes(InternalNote::G);
        assert_eq!(notes.len(), 7);
        assert_eq!(notes[6], InternalNote::Fs);
        assert_eq!(major.step(3), 1);
        assert_eq!(major.step(1), 2);
    }
}
