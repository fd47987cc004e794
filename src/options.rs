//! # Finder Options
//!
//! Search parameters for the chord and scale finders.
//!
//! Options are plain values: the tuning, chord quality and scale are stored by
//! value, so a search never looks anything up while it runs. Use
//! [`Library`](crate::Library) to resolve names before building options.
//!
//! ## Fret limits
//! - `num_frets` - height of the diagram a shape must fit in (default 5)
//! - `max_fret` - highest fret the search will try (default 12, at most
//!   [`MAX_FRET_LIMIT`])
//! - `max_reach` - widest span of fretted positions a hand can cover (default 4)
//!
//! `max_reach` never exceeds `num_frets`. Lowering `num_frets` pulls
//! `max_reach` down with it; raising `max_reach` pushes `num_frets` up.
//!
//! ## Example
//! ```rust
//! use fretboard::{ChordFinderOptions, InternalNote, Library};
//!
//! let library = Library::builtin()?;
//! let ukulele = library.instrument("Ukulele")?;
//! let options = ChordFinderOptions::new(
//!     ukulele,
//!     ukulele.tuning("Standard")?,
//!     InternalNote::C,
//!     library.chord_quality("major")?,
//! )?
//! .with_max_fret(7)
//! .with_num_frets(3);
//!
//! assert_eq!(options.num_frets(), 3);
//! assert_eq!(options.max_reach(), 3);
//! # Ok::<(), fretboard::FretError>(())
//! ```

use crate::error::FretError;
use crate::instrument::{Instrument, Tuning};
use crate::interval::{ChordQuality, Scale};
use crate::note::InternalNote;

pub const DEFAULT_NUM_FRETS: i32 = 5;
pub const DEFAULT_MAX_FRET: i32 = 12;
pub const DEFAULT_MAX_REACH: i32 = 4;
/// Highest `max_fret` a search accepts
pub const MAX_FRET_LIMIT: i32 = 36;

/// Fret limits shared by both finders, kept mutually consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FretLimits {
    num_frets: i32,
    max_fret: i32,
    max_reach: i32,
}

impl Default for FretLimits {
    fn default() -> Self {
        Self {
            num_frets: DEFAULT_NUM_FRETS,
            max_fret: DEFAULT_MAX_FRET,
            max_reach: DEFAULT_MAX_REACH,
        }
    }
}

impl FretLimits {
    pub fn num_frets(&self) -> i32 {
        self.num_frets
    }

    pub fn max_fret(&self) -> i32 {
        self.max_fret
    }

    pub fn max_reach(&self) -> i32 {
        self.max_reach
    }

    pub fn set_num_frets(&mut self, num_frets: i32) {
        self.num_frets = num_frets.max(1);
        if self.max_reach > self.num_frets {
            self.max_reach = self.num_frets;
        }
    }

    pub fn set_max_reach(&mut self, max_reach: i32) {
        self.max_reach = max_reach.max(1);
        if self.max_reach > self.num_frets {
            self.num_frets = self.max_reach;
        }
    }

    pub fn set_max_fret(&mut self, max_fret: i32) {
        self.max_fret = max_fret.max(0);
    }
}

/// The instrument a search runs on, checked against its tuning
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    instrument: String,
    tuning: Tuning,
}

impl Target {
    fn new(instrument: &Instrument, tuning: &Tuning) -> Result<Self, FretError> {
        instrument.check_tuning(tuning)?;
        Ok(Self {
            instrument: instrument.name().to_string(),
            tuning: tuning.clone(),
        })
    }
}

fn starting_fret(allow_open_strings: bool) -> i32 {
    if allow_open_strings {
        0
    } else {
        1
    }
}

fn check_fret_range(limits: &FretLimits, allow_open_strings: bool) -> Result<(), FretError> {
    let start = starting_fret(allow_open_strings);
    if limits.max_fret < start {
        return Err(FretError::InvalidArgument {
            arg: "max_fret",
            message: format!(
                "max fret {} leaves nothing to search above fret {}",
                limits.max_fret, start
            ),
        });
    }
    if limits.max_fret > MAX_FRET_LIMIT {
        return Err(FretError::InvalidArgument {
            arg: "max_fret",
            message: format!("max fret {} is above {}", limits.max_fret, MAX_FRET_LIMIT),
        });
    }
    Ok(())
}

/// Parameters for a chord search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordFinderOptions {
    target: Target,
    root: InternalNote,
    quality: ChordQuality,
    limits: FretLimits,
    allow_open_strings: bool,
    allow_muted_strings: bool,
    allow_rootless_chords: bool,
    allow_partial_chords: bool,
}

impl ChordFinderOptions {
    pub fn new(
        instrument: &Instrument,
        tuning: &Tuning,
        root: InternalNote,
        quality: &ChordQuality,
    ) -> Result<Self, FretError> {
        Ok(Self {
            target: Target::new(instrument, tuning)?,
            root,
            quality: quality.clone(),
            limits: FretLimits::default(),
            allow_open_strings: true,
            allow_muted_strings: false,
            allow_rootless_chords: false,
            allow_partial_chords: false,
        })
    }

    /// Switch instrument and tuning; fails with `TuningMismatch` if they disagree.
    pub fn set_target(&mut self, instrument: &Instrument, tuning: &Tuning) -> Result<(), FretError> {
        self.target = Target::new(instrument, tuning)?;
        Ok(())
    }

    pub fn with_root(mut self, root: InternalNote) -> Self {
        self.root = root;
        self
    }

    pub fn with_quality(mut self, quality: &ChordQuality) -> Self {
        self.quality = quality.clone();
        self
    }

    pub fn with_num_frets(mut self, num_frets: i32) -> Self {
        self.limits.set_num_frets(num_frets);
        self
    }

    /// Replace all fret limits at once.
    pub fn with_limits(mut self, limits: FretLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_fret(mut self, max_fret: i32) -> Self {
        self.limits.set_max_fret(max_fret);
        self
    }

    pub fn with_max_reach(mut self, max_reach: i32) -> Self {
        self.limits.set_max_reach(max_reach);
        self
    }

    pub fn with_open_strings(mut self, allow: bool) -> Self {
        self.allow_open_strings = allow;
        self
    }

    pub fn with_muted_strings(mut self, allow: bool) -> Self {
        self.allow_muted_strings = allow;
        self
    }

    pub fn with_rootless_chords(mut self, allow: bool) -> Self {
        self.allow_rootless_chords = allow;
        self
    }

    pub fn with_partial_chords(mut self, allow: bool) -> Self {
        self.allow_partial_chords = allow;
        self
    }

    pub fn instrument_name(&self) -> &str {
        &self.target.instrument
    }

    pub fn tuning(&self) -> &Tuning {
        &self.target.tuning
    }

    pub fn num_strings(&self) -> usize {
        self.target.tuning.num_strings()
    }

    pub fn root(&self) -> InternalNote {
        self.root
    }

    pub fn quality(&self) -> &ChordQuality {
        &self.quality
    }

    pub fn limits(&self) -> &FretLimits {
        &self.limits
    }

    pub fn num_frets(&self) -> i32 {
        self.limits.num_frets()
    }

    pub fn max_fret(&self) -> i32 {
        self.limits.max_fret()
    }

    pub fn max_reach(&self) -> i32 {
        self.limits.max_reach()
    }

    pub fn allow_open_strings(&self) -> bool {
        self.allow_open_strings
    }

    pub fn allow_muted_strings(&self) -> bool {
        self.allow_muted_strings
    }

    pub fn allow_rootless_chords(&self) -> bool {
        self.allow_rootless_chords
    }

    pub fn allow_partial_chords(&self) -> bool {
        self.allow_partial_chords
    }

    /// Lowest fret the search tries on each string.
    pub fn starting_fret(&self) -> i32 {
        starting_fret(self.allow_open_strings)
    }

    /// Entry-point check run before a search builds any state.
    pub fn validate(&self) -> Result<(), FretError> {
        check_fret_range(&self.limits, self.allow_open_strings)
    }
}

/// Parameters for a scale search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleFinderOptions {
    target: Target,
    root: InternalNote,
    scale: Scale,
    limits: FretLimits,
    allow_open_strings: bool,
    strict_intervals: bool,
}

impl ScaleFinderOptions {
    pub fn new(
        instrument: &Instrument,
        tuning: &Tuning,
        root: InternalNote,
        scale: &Scale,
    ) -> Result<Self, FretError> {
        Ok(Self {
            target: Target::new(instrument, tuning)?,
            root,
            scale: scale.clone(),
            limits: FretLimits::default(),
            allow_open_strings: true,
            strict_intervals: false,
        })
    }

    /// Switch instrument and tuning; fails with `TuningMismatch` if they disagree.
    pub fn set_target(&mut self, instrument: &Instrument, tuning: &Tuning) -> Result<(), FretError> {
        self.target = Target::new(instrument, tuning)?;
        Ok(())
    }

    pub fn with_root(mut self, root: InternalNote) -> Self {
        self.root = root;
        self
    }

    pub fn with_scale(mut self, scale: &Scale) -> Self {
        self.scale = scale.clone();
        self
    }

    pub fn with_num_frets(mut self, num_frets: i32) -> Self {
        self.limits.set_num_frets(num_frets);
        self
    }

    /// Replace all fret limits at once.
    pub fn with_limits(mut self, limits: FretLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_fret(mut self, max_fret: i32) -> Self {
        self.limits.set_max_fret(max_fret);
        self
    }

    pub fn with_max_reach(mut self, max_reach: i32) -> Self {
        self.limits.set_max_reach(max_reach);
        self
    }

    pub fn with_open_strings(mut self, allow: bool) -> Self {
        self.allow_open_strings = allow;
        self
    }

    pub fn with_strict_intervals(mut self, strict: bool) -> Self {
        self.strict_intervals = strict;
        self
    }

    pub fn instrument_name(&self) -> &str {
        &self.target.instrument
    }

    pub fn tuning(&self) -> &Tuning {
        &self.target.tuning
    }

    pub fn num_strings(&self) -> usize {
        self.target.tuning.num_strings()
    }

    pub fn root(&self) -> InternalNote {
        self.root
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn limits(&self) -> &FretLimits {
        &self.limits
    }

    pub fn num_frets(&self) -> i32 {
        self.limits.num_frets()
    }

    pub fn max_fret(&self) -> i32 {
        self.limits.max_fret()
    }

    pub fn max_reach(&self) -> i32 {
        self.limits.max_reach()
    }

    pub fn allow_open_strings(&self) -> bool {
        self.allow_open_strings
    }

    pub fn strict_intervals(&self) -> bool {
        self.strict_intervals
    }

    /// Lowest fret the search tries on each string.
    pub fn starting_fret(&self) -> i32 {
        starting_fret(self.allow_open_strings)
    }

    /// Entry-point check run before a search builds any state.
    pub fn validate(&self) -> Result<(), FretError> {
        check_fret_range(&self.limits, self.allow_open_strings)
    }
}
