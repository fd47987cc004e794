//! # Fretboard
//!
//! Chord and scale shape finder for fretted instruments.
//!
//! Given an instrument tuning, the crate enumerates every playable fretting of
//! a chord ([`find_chords`]), every ordered run of a scale across the strings
//! ([`find_scales`]), and names the chords a given fretting plays
//! ([`identify_chords`]). Results come back sorted in a canonical order and
//! can describe themselves as diagrams for a renderer.
//!
//! Instruments, tunings, chord qualities and scales are data: a built-in
//! catalog ships with the crate and user catalogs in YAML merge over it (see
//! [`Library`]).
//!
//! ```rust
//! use fretboard::{find_chords, ChordFinderOptions, InternalNote, Library};
//!
//! let library = Library::builtin()?;
//! let ukulele = library.instrument("Ukulele")?;
//! let options = ChordFinderOptions::new(
//!     ukulele,
//!     ukulele.tuning("Standard")?,
//!     InternalNote::C,
//!     library.chord_quality("Major")?,
//! )?;
//!
//! let results = find_chords(&options)?;
//! assert_eq!(results[0].frets(), &[0, 0, 0, 3]);
//! # Ok::<(), fretboard::FretError>(())
//! ```

pub mod cancel;
pub mod chord_finder;
pub mod diagram;
pub mod error;
pub mod instrument;
pub mod interval;
pub mod library;
pub mod marks;
pub mod note;
pub mod options;
pub mod results;
pub mod reverse_chord_finder;
pub mod scale_finder;

pub use cancel::CancellationToken;
pub use chord_finder::{find_chords, find_chords_with_cancel, ChordFinderResult, ChordFinderResultSet};
pub use diagram::{Diagram, DiagramStyle, MarkTextOption, ToDiagram};
pub use error::FretError;
pub use instrument::{Instrument, Tuning};
pub use interval::{ChordQuality, Scale};
pub use library::Library;
pub use marks::{BarrePosition, BarreTypeOption, MarkPosition};
pub use note::{FullNote, InternalNote, Note, NoteNamePreference};
pub use options::{ChordFinderOptions, ScaleFinderOptions};
pub use results::ResultSet;
pub use reverse_chord_finder::{
    identify_chords, identify_chords_with_cancel, ReverseChordFinderOptions, ReverseChordFinderResult,
    ReverseChordFinderResultSet,
};
pub use scale_finder::{find_scales, find_scales_with_cancel, ScaleFinderResult, ScaleFinderResultSet};
