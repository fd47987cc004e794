//! # Diagram Descriptions
//!
//! What a search result hands to a diagram renderer.
//!
//! A [`Diagram`] is a plain description of a fretboard diagram: its size, the
//! base line (floating fret label), every mark with its kind and optional
//! text, bottom labels and an optional barre. Drawing it is the renderer's
//! job; this crate only decides what goes where.
//!
//! Diagrams serialize with serde so a renderer in another process can consume
//! them:
//!
//! ```rust
//! use fretboard::diagram::{Diagram, DiagramMark, MarkKind};
//!
//! let diagram = Diagram {
//!     title: Some("C".to_string()),
//!     num_strings: 4,
//!     num_frets: 5,
//!     base_line: 0,
//!     marks: vec![DiagramMark { string: 4, fret: 3, kind: MarkKind::Root, text: None }],
//!     bottom_marks: vec![],
//!     barre: None,
//! };
//! let yaml = serde_yaml::to_string(&diagram).unwrap();
//! assert!(yaml.contains("num-strings: 4"));
//! assert!(yaml.contains("kind: root"));
//! ```

use crate::marks::{BarrePosition, BarreTypeOption};
use crate::note::{InternalNote, NoteNamePreference};
use serde::Serialize;

/// What text, if any, to put inside each mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkTextOption {
    #[default]
    None,
    /// The note name, spelled per [`DiagramStyle::note_names`]
    ShowNote,
    /// The interval above the root (`R`, `3`, `b7`, ...)
    ShowInterval,
}

/// Presentation choices passed along with a diagram request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramStyle {
    pub show_title: bool,
    pub highlight_root: bool,
    /// Reverse the string order (left-handed diagrams)
    pub mirror: bool,
    /// Label every sounded string with its note name below the diagram
    pub show_bottom_marks: bool,
    pub barre_type: BarreTypeOption,
    pub mark_text: MarkTextOption,
    pub note_names: NoteNamePreference,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            show_title: true,
            highlight_root: true,
            mirror: false,
            show_bottom_marks: false,
            barre_type: BarreTypeOption::None,
            mark_text: MarkTextOption::None,
            note_names: NoteNamePreference::PreferSharps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Normal,
    Root,
    /// Drawn above the nut
    Open,
    /// Drawn above the nut
    Muted,
}

/// A mark in diagram coordinates: strings from 1, frets relative to the base line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramMark {
    pub string: usize,
    pub fret: i32,
    pub kind: MarkKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A label under a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BottomMark {
    pub string: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Diagram {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub num_strings: usize,
    pub num_frets: i32,
    /// 0 when the diagram starts at the nut, otherwise the fret of its first row
    pub base_line: i32,
    pub marks: Vec<DiagramMark>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bottom_marks: Vec<BottomMark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barre: Option<BarrePosition>,
}

/// Implemented by search results that can describe themselves as a diagram
pub trait ToDiagram {
    type Options;

    fn to_diagram(&self, options: &Self::Options, style: &DiagramStyle) -> Diagram;
}

/// Diagram string number (from 1) for a 0-based string index.
pub(crate) fn diagram_string(index: usize, num_strings: usize, mirror: bool) -> usize {
    if mirror {
        num_strings - index
    } else {
        index + 1
    }
}

/// Kind of a sounded mark at `fret` playing `note`.
pub(crate) fn mark_kind(fret: i32, note: InternalNote, root: InternalNote, style: &DiagramStyle) -> MarkKind {
    if fret == 0 {
        MarkKind::Open
    } else if style.highlight_root && note == root {
        MarkKind::Root
    } else {
        MarkKind::Normal
    }
}

/// Text for a sounded mark according to the style.
pub(crate) fn mark_text(note: InternalNote, root: InternalNote, style: &DiagramStyle) -> Option<String> {
    match style.mark_text {
        MarkTextOption::None => None,
        MarkTextOption::ShowNote => Some(note.name(style.note_names)),
        MarkTextOption::ShowInterval => Some(interval_name(root.interval_to(note)).to_string()),
    }
}

/// Short interval label for a distance in semitones (0..=11).
pub fn interval_name(semitones: i32) -> &'static str {
    match semitones.rem_euclid(12) {
        0 => "R",
        1 => "b2",
        2 => "2",
        3 => "b3",
        4 => "3",
        5 => "4",
        6 => "b5",
        7 => "5",
        8 => "#5",
        9 => "6",
        10 => "b7",
        _ => "7",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_names() {
        assert_eq!(interval_name(0), "R");
        assert_eq!(interval_name(4), "3");
        assert_eq!(interval_name(10), "b7");
        assert_eq!(interval_name(14), "2");
    }

    #[test]
    fn test_diagram_string_mirror() {
        assert_eq!(diagram_string(0, 4, false), 1);
        assert_eq!(diagram_string(0, 4, true), 4);
        assert_eq!(diagram_string(3, 4, true), 1);
    }

    #[test]
    fn test_mark_kind_and_text() {
        let style = DiagramStyle {
            mark_text: MarkTextOption::ShowInterval,
            ..DiagramStyle::default()
        };
        assert_eq!(mark_kind(0, InternalNote::C, InternalNote::C, &style), MarkKind::Open);
        assert_eq!(mark_kind(3, InternalNote::C, InternalNote::C, &style), MarkKind::Root);
        assert_eq!(mark_kind(3, InternalNote::E, InternalNote::C, &style), MarkKind::Normal);
        assert_eq!(mark_text(InternalNote::E, InternalNote::C, &style), Some("3".to_string()));

        let plain = DiagramStyle {
            highlight_root: false,
            mark_text: MarkTextOption::ShowNote,
            note_names: NoteNamePreference::PreferFlats,
            ..DiagramStyle::default()
        };
        assert_eq!(mark_kind(3, InternalNote::C, InternalNote::C, &plain), MarkKind::Normal);
        assert_eq!(mark_text(InternalNote::As, InternalNote::C, &plain), Some("Bb".to_string()));
    }
}
