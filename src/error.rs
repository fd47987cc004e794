//! # Error Types
//!
//! This module defines all error types for the fretboard library.
//!
//! Only programmer errors and configuration problems are reported as errors.
//! A fretting that fails the reach or structure checks is simply left out of
//! the result set, and a cancelled search returns whatever it found so far.
//!
//! ## Error Types
//! - `InvalidArgument` - Bad input caught at a public entry point
//! - `TuningMismatch` - Tuning does not fit the instrument it was paired with
//! - `ParseNote` - Unreadable note spelling
//! - `UnknownName` - Library lookup miss
//! - `Library` - Malformed YAML catalog
//!
//! ## Usage
//! ```rust
//! use fretboard::{FretError, Library};
//!
//! let library = Library::builtin().unwrap();
//! match library.instrument("banjolele") {
//!     Ok(instrument) => println!("{} strings", instrument.num_strings()),
//!     Err(FretError::UnknownName { kind, name }) => {
//!         eprintln!("no {} called {}", kind, name);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FretError {
    /// Invalid input passed to a public entry point.
    ///
    /// Raised before any search state is created.
    ///
    /// # Example
    /// ```
    /// # use fretboard::FretError;
    /// let err = FretError::InvalidArgument {
    ///     arg: "frets",
    ///     message: "expected 4 frets, got 3".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid argument `frets`: expected 4 frets, got 3");
    /// ```
    #[error("Invalid argument `{arg}`: {message}")]
    InvalidArgument { arg: &'static str, message: String },

    /// A tuning was paired with an instrument that has a different number of strings.
    ///
    /// # Example
    /// ```
    /// # use fretboard::FretError;
    /// let err = FretError::TuningMismatch {
    ///     instrument: "Ukulele".to_string(),
    ///     tuning: "Standard".to_string(),
    ///     expected: 4,
    ///     got: 6,
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Tuning 'Standard' has 6 strings but instrument 'Ukulele' has 4"
    /// );
    /// ```
    #[error("Tuning '{tuning}' has {got} strings but instrument '{instrument}' has {expected}")]
    TuningMismatch {
        instrument: String,
        tuning: String,
        expected: usize,
        got: usize,
    },

    /// A note spelling could not be parsed.
    ///
    /// # Example
    /// ```
    /// # use fretboard::FretError;
    /// let err = FretError::ParseNote("H#".to_string());
    /// assert_eq!(err.to_string(), "Invalid note: H#");
    /// ```
    #[error("Invalid note: {0}")]
    ParseNote(String),

    /// A name was not found in the library.
    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },

    /// The YAML catalog could not be parsed or failed validation.
    #[error("Invalid library: {0}")]
    Library(String),
}
