//! Segment data model.

use core::fmt;

use crate::marker::Marker;

/// Classification of a run of streamed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SegmentKind {
    /// Ordinary answer content.
    Normal,
    /// Reasoning content found between `<think>` and `</think>`.
    Think,
}

impl SegmentKind {
    /// Lowercase name used in transcripts and serialized output.
    pub const fn as_str(self) -> &'static str {
        match self {
            SegmentKind::Normal => "normal",
            SegmentKind::Think => "think",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalized, classified run of text.
///
/// Segments are only created by the segmenter and are handed out by shared
/// reference; once finalized their text never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// What the text is.
    pub kind: SegmentKind,
    /// The text with tag markers removed. Never empty.
    pub text: String,
}

impl Segment {
    /// Creates a normal segment.
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Normal,
            text: text.into(),
        }
    }

    /// Creates a think segment.
    pub fn think(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Think,
            text: text.into(),
        }
    }

    /// Returns true for reasoning segments.
    #[inline]
    pub fn is_think(&self) -> bool {
        self.kind == SegmentKind::Think
    }
}

/// Which region newly scanned text is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Outside any think region.
    #[default]
    Normal,
    /// After a `<think>` whose `</think>` has not been seen yet.
    InsideThink,
}

impl Mode {
    /// The segment kind produced by text scanned in this mode.
    #[inline]
    pub const fn kind(self) -> SegmentKind {
        match self {
            Mode::Normal => SegmentKind::Normal,
            Mode::InsideThink => SegmentKind::Think,
        }
    }

    /// The only marker recognised in this mode.
    ///
    /// Everything else, including the other marker, is literal text.
    #[inline]
    pub const fn closing_marker(self) -> Marker {
        match self {
            Mode::Normal => Marker::Open,
            Mode::InsideThink => Marker::Close,
        }
    }

    /// The mode entered after this mode's marker is found.
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            Mode::Normal => Mode::InsideThink,
            Mode::InsideThink => Mode::Normal,
        }
    }
}

/// The trailing region that has not been finalized yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenSegment<'a> {
    /// Kind the region will have once finalized.
    pub kind: SegmentKind,
    /// Text accumulated so far. Never empty.
    pub text: &'a str,
}

impl OpenSegment<'_> {
    /// Copies the open region into an owned segment.
    pub fn to_segment(&self) -> Segment {
        Segment {
            kind: self.kind,
            text: self.text.to_owned(),
        }
    }
}
