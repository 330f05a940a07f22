//! Render models handed to the presentation layer.
//!
//! [`RenderModel`] borrows from the [`ParserState`](crate::ParserState) it
//! was produced from, so it is only valid until the next `consume`. Callers
//! that keep a model across updates take an owned [`RenderSnapshot`].

use core::fmt;

use crate::segment::{OpenSegment, Segment};

/// Finalized segments plus the open trailing region, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderModel<'a> {
    /// Finalized segments in document order.
    pub finalized: &'a [Segment],
    /// The region still accumulating text. `None` when it is empty.
    pub open: Option<OpenSegment<'a>>,
    /// Whether the stream was still open when the model was produced.
    pub streaming: bool,
}

impl<'a> RenderModel<'a> {
    #[inline]
    pub(crate) fn new(
        finalized: &'a [Segment],
        open: Option<OpenSegment<'a>>,
        streaming: bool,
    ) -> Self {
        Self {
            finalized,
            open,
            streaming,
        }
    }

    /// True when nothing has been produced yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.open.is_none()
    }

    /// Number of finalized segments plus one for an open region.
    #[inline]
    pub fn len(&self) -> usize {
        self.finalized.len() + usize::from(self.open.is_some())
    }

    /// Concatenated text of every segment, markers removed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for segment in self.finalized {
            out.push_str(&segment.text);
        }
        if let Some(open) = &self.open {
            out.push_str(open.text);
        }
        out
    }

    /// Copies the model so it outlives the state it borrows from.
    pub fn to_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            segments: self.finalized.to_vec(),
            open: self.open.as_ref().map(OpenSegment::to_segment),
            streaming: self.streaming,
        }
    }
}

/// An owned copy of a [`RenderModel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderSnapshot {
    /// Finalized segments in document order.
    pub segments: Vec<Segment>,
    /// The region still accumulating text.
    pub open: Option<Segment>,
    /// Whether the stream was still open.
    pub streaming: bool,
}

impl RenderSnapshot {
    /// Borrows the snapshot as a [`RenderModel`].
    pub fn as_model(&self) -> RenderModel<'_> {
        RenderModel {
            finalized: &self.segments,
            open: self.open.as_ref().map(|segment| OpenSegment {
                kind: segment.kind,
                text: &segment.text,
            }),
            streaming: self.streaming,
        }
    }

    /// Concatenated text of every segment, markers removed.
    pub fn text(&self) -> String {
        self.as_model().text()
    }
}

impl From<RenderModel<'_>> for RenderSnapshot {
    fn from(model: RenderModel<'_>) -> Self {
        model.to_snapshot()
    }
}

/// One line per segment: `kind: "text"`, with the open region prefixed by
/// `open` and a trailing `(streaming)` line while the stream is live.
impl fmt::Display for RenderModel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.finalized {
            writeln!(f, "{}: {:?}", segment.kind, segment.text)?;
        }
        if let Some(open) = &self.open {
            writeln!(f, "open {}: {:?}", open.kind, open.text)?;
        }
        if self.streaming {
            writeln!(f, "(streaming)")?;
        }
        Ok(())
    }
}

impl fmt::Display for RenderSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_model(), f)
    }
}
