//! # Library Module
//!
//! The catalog of instruments, tunings, chord qualities and scales that
//! searches are configured from.
//!
//! ## Format
//! Catalogs are YAML documents. Every section is optional:
//!
//! ```yaml
//! instruments:
//!   - name: Ukulele
//!     strings: 4
//!     tunings:
//!       - name: Standard
//!         notes: G4 C4 E4 A4
//! chord-qualities:
//!   - name: Minor 7th
//!     abbreviation: m7
//!     intervals: [0, 3, 7, 10]
//! scales:
//!   - name: Minor Pentatonic
//!     intervals: [0, 3, 5, 7, 10]
//! ```
//!
//! ## Layering
//! [`Library::builtin()`] loads the catalog embedded in the crate. A user
//! catalog can then be layered on top with [`Library::merge()`]: entries whose
//! names match (ignoring case) replace the inherited ones, new entries are
//! appended.
//!
//! ## Example
//! ```rust
//! use fretboard::Library;
//!
//! let mut library = Library::builtin()?;
//! let user = Library::from_yaml(r#"
//! chord-qualities:
//!   - name: Seventh Sus4
//!     abbreviation: 7sus4
//!     intervals: [0, 5, 7, 10]
//! "#)?;
//! library.merge(user)?;
//!
//! assert!(library.chord_quality("7sus4").is_ok());
//! assert_eq!(library.instrument("ukulele")?.num_strings(), 4);
//! # Ok::<(), fretboard::FretError>(())
//! ```

use crate::error::FretError;
use crate::instrument::{Instrument, Tuning};
use crate::interval::{ChordQuality, Scale};
use log::debug;
use serde::Deserialize;

const BUILTIN_LIBRARY: &str = include_str!("library.yaml");

/// Raw catalog for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", default)]
struct RawLibrary {
    instruments: Vec<RawInstrument>,
    chord_qualities: Vec<RawChordQuality>,
    scales: Vec<RawScale>,
}

#[derive(Deserialize, Debug)]
struct RawInstrument {
    name: String,
    strings: usize,
    #[serde(default)]
    tunings: Vec<RawTuning>,
}

#[derive(Deserialize, Debug)]
struct RawTuning {
    name: String,
    notes: String,
}

#[derive(Deserialize, Debug)]
struct RawChordQuality {
    name: String,
    #[serde(default)]
    abbreviation: String,
    intervals: Vec<i32>,
}

#[derive(Deserialize, Debug)]
struct RawScale {
    name: String,
    intervals: Vec<i32>,
}

/// Instruments, chord qualities and scales available to searches
#[derive(Debug, Clone, Default)]
pub struct Library {
    instruments: Vec<Instrument>,
    chord_qualities: Vec<ChordQuality>,
    scales: Vec<Scale>,
}

impl Library {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, FretError> {
        Self::from_yaml(BUILTIN_LIBRARY)
    }

    /// Parse and validate a YAML catalog.
    pub fn from_yaml(content: &str) -> Result<Self, FretError> {
        let raw: RawLibrary =
            serde_yaml::from_str(content).map_err(|e| FretError::Library(e.to_string()))?;

        let mut library = Library::default();

        for raw_instrument in raw.instruments {
            let mut instrument = Instrument::new(&raw_instrument.name, raw_instrument.strings)
                .map_err(library_error)?;
            for raw_tuning in raw_instrument.tunings {
                let tuning = Tuning::parse(&raw_tuning.name, &raw_tuning.notes).map_err(library_error)?;
                instrument.add_tuning(tuning).map_err(library_error)?;
            }
            library.add_instrument(instrument).map_err(library_error)?;
        }

        for raw_quality in raw.chord_qualities {
            let quality = ChordQuality::new(
                raw_quality.name,
                raw_quality.abbreviation,
                raw_quality.intervals,
            )
            .map_err(library_error)?;
            library.add_chord_quality(quality);
        }

        for raw_scale in raw.scales {
            let scale = Scale::new(raw_scale.name, raw_scale.intervals).map_err(library_error)?;
            library.add_scale(scale);
        }

        Ok(library)
    }

    /// Layer `other` on top of this library.
    pub fn merge(&mut self, other: Library) -> Result<(), FretError> {
        for instrument in other.instruments {
            self.add_instrument(instrument)?;
        }
        for quality in other.chord_qualities {
            self.add_chord_quality(quality);
        }
        for scale in other.scales {
            self.add_scale(scale);
        }
        Ok(())
    }

    /// Add an instrument. An existing instrument of the same name and string
    /// count absorbs the new tunings; otherwise it is replaced outright.
    pub fn add_instrument(&mut self, instrument: Instrument) -> Result<(), FretError> {
        let existing = self
            .instruments
            .iter_mut()
            .find(|i| i.name().eq_ignore_ascii_case(instrument.name()));
        match existing {
            Some(existing) if existing.num_strings() == instrument.num_strings() => {
                debug!("Merging tunings into instrument '{}'", existing.name());
                for tuning in instrument.tunings() {
                    existing.add_tuning(tuning.clone())?;
                }
            }
            Some(existing) => {
                debug!("Replacing instrument '{}'", existing.name());
                *existing = instrument;
            }
            None => self.instruments.push(instrument),
        }
        Ok(())
    }

    pub fn add_chord_quality(&mut self, quality: ChordQuality) {
        match self
            .chord_qualities
            .iter_mut()
            .find(|q| q.name().eq_ignore_ascii_case(quality.name()))
        {
            Some(existing) => {
                debug!("Replacing chord quality '{}'", existing.name());
                *existing = quality;
            }
            None => self.chord_qualities.push(quality),
        }
    }

    pub fn add_scale(&mut self, scale: Scale) {
        match self
            .scales
            .iter_mut()
            .find(|s| s.name().eq_ignore_ascii_case(scale.name()))
        {
            Some(existing) => {
                debug!("Replacing scale '{}'", existing.name());
                *existing = scale;
            }
            None => self.scales.push(scale),
        }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn chord_qualities(&self) -> &[ChordQuality] {
        &self.chord_qualities
    }

    pub fn scales(&self) -> &[Scale] {
        &self.scales
    }

    pub fn instrument(&self, name: &str) -> Result<&Instrument, FretError> {
        self.instruments
            .iter()
            .find(|i| i.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| unknown("instrument", name))
    }

    /// Look up a tuning by instrument and tuning name.
    pub fn tuning(&self, instrument: &str, tuning: &str) -> Result<&Tuning, FretError> {
        self.instrument(instrument)?.tuning(tuning)
    }

    /// Look up a chord quality by abbreviation (exact, so `M7` and `m7`
    /// stay distinct) or by name (ignoring case).
    pub fn chord_quality(&self, name: &str) -> Result<&ChordQuality, FretError> {
        self.chord_qualities
            .iter()
            .find(|q| q.abbreviation() == name)
            .or_else(|| {
                self.chord_qualities
                    .iter()
                    .find(|q| q.name().eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| unknown("chord quality", name))
    }

    pub fn scale(&self, name: &str) -> Result<&Scale, FretError> {
        self.scales
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| unknown("scale", name))
    }
}

fn library_error(e: FretError) -> FretError {
    FretError::Library(e.to_string())
}

fn unknown(kind: &'static str, name: &str) -> FretError {
    FretError::UnknownName {
        kind,
        name: name.to_string(),
    }
}
