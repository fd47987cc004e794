//! Instruments and their tunings.

use crate::error::FretError;
use crate::note::{FullNote, InternalNote};

/// Open-string notes for an instrument, string 1 first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    name: String,
    notes: Vec<FullNote>,
}

impl Tuning {
    pub fn new(name: impl Into<String>, notes: Vec<FullNote>) -> Result<Self, FretError> {
        let name = name.into();
        if notes.is_empty() {
            return Err(FretError::InvalidArgument {
                arg: "notes",
                message: format!("tuning '{}' has no strings", name),
            });
        }
        Ok(Self { name, notes })
    }

    /// Parse a whitespace- or comma-separated note list such as `G4 C4 E4 A4`.
    pub fn parse(name: impl Into<String>, notes: &str) -> Result<Self, FretError> {
        let notes = notes
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<FullNote>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, notes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_strings(&self) -> usize {
        self.notes.len()
    }

    pub fn notes(&self) -> &[FullNote] {
        &self.notes
    }

    /// Open note of a string (0-based index).
    pub fn open_note(&self, string: usize) -> FullNote {
        self.notes[string]
    }

    /// Pitch class sounded by `string` at `fret`.
    pub fn note_at(&self, string: usize, fret: i32) -> InternalNote {
        self.notes[string].note.shift(fret)
    }

    pub fn full_note_at(&self, string: usize, fret: i32) -> FullNote {
        self.notes[string].shift(fret)
    }
}

/// A fretted instrument with a fixed string count and its known tunings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    name: String,
    num_strings: usize,
    tunings: Vec<Tuning>,
}

impl Instrument {
    pub fn new(name: impl Into<String>, num_strings: usize) -> Result<Self, FretError> {
        let name = name.into();
        if num_strings == 0 {
            return Err(FretError::InvalidArgument {
                arg: "num_strings",
                message: format!("instrument '{}' has no strings", name),
            });
        }
        Ok(Self {
            name,
            num_strings,
            tunings: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_strings(&self) -> usize {
        self.num_strings
    }

    pub fn tunings(&self) -> &[Tuning] {
        &self.tunings
    }

    /// Fails with `TuningMismatch` if the tuning has the wrong string count.
    pub fn check_tuning(&self, tuning: &Tuning) -> Result<(), FretError> {
        if tuning.num_strings() != self.num_strings {
            return Err(FretError::TuningMismatch {
                instrument: self.name.clone(),
                tuning: tuning.name().to_string(),
                expected: self.num_strings,
                got: tuning.num_strings(),
            });
        }
        Ok(())
    }

    /// Add a tuning, replacing any existing one with the same name.
    pub fn add_tuning(&mut self, tuning: Tuning) -> Result<(), FretError> {
        self.check_tuning(&tuning)?;
        match self
            .tunings
            .iter_mut()
            .find(|t| t.name().eq_ignore_ascii_case(tuning.name()))
        {
            Some(existing) => *existing = tuning,
            None => self.tunings.push(tuning),
        }
        Ok(())
    }

    pub fn tuning(&self, name: &str) -> Result<&Tuning, FretError> {
        self.tunings
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| FretError::UnknownName {
                kind: "tuning",
                name: format!("{} ({})", name, self.name),
            })
    }

    /// The first tuning registered for this instrument.
    pub fn default_tuning(&self) -> Option<&Tuning> {
        self.tunings.first()
    }
}
