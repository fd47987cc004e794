//! # Note Model
//!
//! Pitch classes, spelled notes and octave-aware notes.
//!
//! ## Types
//! - [`InternalNote`] - One of the 12 pitch classes, semitones above C. All
//!   arithmetic is modulo 12 and equality ignores the octave.
//! - [`Note`] - A user-facing spelling such as `C#` or `Eb`. Several spellings
//!   map onto the same pitch class.
//! - [`FullNote`] - A pitch class plus an octave. Used by the scale finder to
//!   tell a note from the same pitch class one octave higher.
//!
//! ## Naming
//! Pitch classes carry no spelling of their own. [`InternalNote::name`] picks
//! one according to a [`NoteNamePreference`]:
//!
//! ```rust
//! use fretboard::{InternalNote, NoteNamePreference};
//!
//! let note = InternalNote::Cs;
//! assert_eq!(note.name(NoteNamePreference::PreferSharps), "C#");
//! assert_eq!(note.name(NoteNamePreference::PreferFlats), "Db");
//! assert_eq!(note.name(NoteNamePreference::ShowBoth), "C#/Db");
//! ```

use crate::error::FretError;
use std::fmt;
use std::str::FromStr;

/// Number of pitch classes in the chromatic scale
pub const SEMITONES: i32 = 12;

/// Twelve chromatic pitch classes, in semitones above C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InternalNote {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl InternalNote {
    /// All pitch classes in ascending order from C
    pub const ALL: [InternalNote; 12] = [
        InternalNote::C,
        InternalNote::Cs,
        InternalNote::D,
        InternalNote::Ds,
        InternalNote::E,
        InternalNote::F,
        InternalNote::Fs,
        InternalNote::G,
        InternalNote::Gs,
        InternalNote::A,
        InternalNote::As,
        InternalNote::B,
    ];

    /// Pitch class for any semitone count; wraps in both directions.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(SEMITONES) as usize]
    }

    /// Semitones above C (0..=11).
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Move up (or down, for negative values) by the given number of semitones.
    pub fn shift(self, semitones: i32) -> Self {
        Self::from_index(self.index() + semitones)
    }

    /// Ascending distance from `self` to `other`, always in 0..=11.
    pub fn interval_to(self, other: InternalNote) -> i32 {
        (other.index() - self.index()).rem_euclid(SEMITONES)
    }

    fn is_natural(self) -> bool {
        matches!(
            self,
            InternalNote::C
                | InternalNote::D
                | InternalNote::E
                | InternalNote::F
                | InternalNote::G
                | InternalNote::A
                | InternalNote::B
        )
    }

    /// Display name following the given preference.
    pub fn name(self, preference: NoteNamePreference) -> String {
        let sharp = Note::sharp_spelling(self).to_string();
        if self.is_natural() {
            return sharp;
        }
        let flat = Note::flat_spelling(self).to_string();
        match preference {
            NoteNamePreference::PreferSharps => sharp,
            NoteNamePreference::PreferFlats => flat,
            NoteNamePreference::ShowBoth => format!("{}/{}", sharp, flat),
        }
    }
}

impl fmt::Display for InternalNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(NoteNamePreference::PreferSharps))
    }
}

impl FromStr for InternalNote {
    type Err = FretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<Note>()?.to_internal())
    }
}

/// How to spell pitch classes that sit on a black key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteNamePreference {
    #[default]
    PreferSharps,
    PreferFlats,
    ShowBoth,
}

/// Note letters A through G
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    fn semitone(self) -> i32 {
        match self {
            NoteLetter::C => 0,
            NoteLetter::D => 2,
            NoteLetter::E => 4,
            NoteLetter::F => 5,
            NoteLetter::G => 7,
            NoteLetter::A => 9,
            NoteLetter::B => 11,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteLetter::C),
            'D' => Some(NoteLetter::D),
            'E' => Some(NoteLetter::E),
            'F' => Some(NoteLetter::F),
            'G' => Some(NoteLetter::G),
            'A' => Some(NoteLetter::A),
            'B' => Some(NoteLetter::B),
            _ => None,
        }
    }
}

impl fmt::Display for NoteLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Accidentals: natural, sharp or flat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    fn offset(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// A spelled note, e.g. `C#` or `Eb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub letter: NoteLetter,
    pub accidental: Accidental,
}

impl Note {
    pub fn new(letter: NoteLetter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    /// The pitch class this spelling sounds as.
    pub fn to_internal(self) -> InternalNote {
        InternalNote::from_index(self.semitone())
    }

    /// Semitones above C, before wrapping (`Cb` is -1, `B#` is 12).
    fn semitone(self) -> i32 {
        self.letter.semitone() + self.accidental.offset()
    }

    /// Spelling of a pitch class using sharps for the black keys.
    pub fn sharp_spelling(note: InternalNote) -> Note {
        let (letter, accidental) = match note {
            InternalNote::C => (NoteLetter::C, Accidental::Natural),
            InternalNote::Cs => (NoteLetter::C, Accidental::Sharp),
            InternalNote::D => (NoteLetter::D, Accidental::Natural),
            InternalNote::Ds => (NoteLetter::D, Accidental::Sharp),
            InternalNote::E => (NoteLetter::E, Accidental::Natural),
            InternalNote::F => (NoteLetter::F, Accidental::Natural),
            InternalNote::Fs => (NoteLetter::F, Accidental::Sharp),
            InternalNote::G => (NoteLetter::G, Accidental::Natural),
            InternalNote::Gs => (NoteLetter::G, Accidental::Sharp),
            InternalNote::A => (NoteLetter::A, Accidental::Natural),
            InternalNote::As => (NoteLetter::A, Accidental::Sharp),
            InternalNote::B => (NoteLetter::B, Accidental::Natural),
        };
        Note::new(letter, accidental)
    }

    /// Spelling of a pitch class using flats for the black keys.
    pub fn flat_spelling(note: InternalNote) -> Note {
        let (letter, accidental) = match note {
            InternalNote::Cs => (NoteLetter::D, Accidental::Flat),
            InternalNote::Ds => (NoteLetter::E, Accidental::Flat),
            InternalNote::Fs => (NoteLetter::G, Accidental::Flat),
            InternalNote::Gs => (NoteLetter::A, Accidental::Flat),
            InternalNote::As => (NoteLetter::B, Accidental::Flat),
            natural => return Note::sharp_spelling(natural),
        };
        Note::new(letter, accidental)
    }

    /// Parse the spelling at the front of `s`, returning the note and the
    /// unconsumed remainder.
    fn parse_prefix(s: &str) -> Result<(Note, &str), FretError> {
        let mut chars = s.char_indices();
        let letter = chars
            .next()
            .and_then(|(_, c)| NoteLetter::from_char(c))
            .ok_or_else(|| FretError::ParseNote(s.to_string()))?;

        let (accidental, rest) = match chars.next() {
            Some((i, c @ ('#' | '♯' | 's'))) => (Accidental::Sharp, &s[i + c.len_utf8()..]),
            Some((i, c @ ('b' | '♭'))) => (Accidental::Flat, &s[i + c.len_utf8()..]),
            Some((i, _)) => (Accidental::Natural, &s[i..]),
            None => (Accidental::Natural, ""),
        };

        Ok((Note::new(letter, accidental), rest))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.accidental {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        };
        write!(f, "{}{}", self.letter, accidental)
    }
}

impl FromStr for Note {
    type Err = FretError;

    /// Parse spellings like `C`, `F#`, `Bb`, `E♭` or `Fs`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (note, rest) = Note::parse_prefix(trimmed)?;
        if !rest.is_empty() {
            return Err(FretError::ParseNote(s.to_string()));
        }
        Ok(note)
    }
}

/// A pitch class at a specific octave.
///
/// Octave numbering follows scientific pitch notation: `C4` is middle C and
/// `B3` is one semitone below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FullNote {
    pub note: InternalNote,
    pub octave: i32,
}

/// Octave assumed for tuning notes written without one
pub const DEFAULT_OCTAVE: i32 = 4;

impl FullNote {
    pub fn new(note: InternalNote, octave: i32) -> Self {
        Self { note, octave }
    }

    /// Build from an absolute semitone count where 0 is `C0`.
    pub fn from_semitones(semitones: i32) -> Self {
        Self {
            note: InternalNote::from_index(semitones),
            octave: semitones.div_euclid(SEMITONES),
        }
    }

    /// Absolute semitone count where 0 is `C0`.
    pub fn semitones(self) -> i32 {
        self.octave * SEMITONES + self.note.index()
    }

    /// Move by a number of semitones, carrying into the octave.
    pub fn shift(self, semitones: i32) -> Self {
        Self::from_semitones(self.semitones() + semitones)
    }

    /// Signed semitone distance from `self` up to `other`.
    pub fn distance_to(self, other: FullNote) -> i32 {
        other.semitones() - self.semitones()
    }
}

impl PartialOrd for FullNote {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FullNote {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.semitones().cmp(&other.semitones())
    }
}

impl fmt::Display for FullNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

impl FromStr for FullNote {
    type Err = FretError;

    /// Parse `G4`, `Eb3`, `C#-1` or a bare spelling (octave 4).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (note, rest) = Note::parse_prefix(trimmed)?;
        let octave = if rest.is_empty() {
            DEFAULT_OCTAVE
        } else {
            rest.parse::<i32>()
                .map_err(|_| FretError::ParseNote(s.to_string()))?
        };
        // Spellings like Cb4 and B#3 cross the octave boundary
        Ok(FullNote::from_semitones(octave * SEMITONES + note.semitone()))
    }
}
