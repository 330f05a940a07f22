//! Presentation policy for render models.
//!
//! Turns a [`RenderModel`] into display blocks without knowing how text is
//! formatted; formatting (markdown, HTML, terminal styling) is delegated to a
//! [`Formatter`].
//!
//! - A finalized answer segment becomes a [`BlockContent::Answer`].
//! - A think segment becomes a [`BlockContent::Thinking`], collapsed by default and
//!   previewed by the last few lines of its trimmed text. Its body is only
//!   formatted once the reader expands it.
//! - The open segment is presented the same way, marked `live`.
//! - A cursor glyph trails the output only while the stream is open.

use std::collections::BTreeSet;

use crate::config::SegmenterConfig;
use crate::render::RenderModel;
use crate::segment::SegmentKind;

/// Formats segment text for display.
///
/// Any `Fn(&str) -> O` is a formatter; use `str::to_owned` for plain text.
pub trait Formatter {
    /// The displayable output.
    type Output;

    /// Formats one segment's text.
    fn format(&self, text: &str) -> Self::Output;
}

impl<O, F> Formatter for F
where
    F: Fn(&str) -> O,
{
    type Output = O;

    #[inline]
    fn format(&self, text: &str) -> O {
        self(text)
    }
}

/// A collapsible reasoning block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingBlock<O> {
    /// Last lines of the trimmed reasoning text, shown while collapsed.
    pub preview: String,
    /// Formatted full text; present only when expanded.
    pub body: Option<O>,
}

impl<O> ThinkingBlock<O> {
    /// True when the full body is shown.
    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.body.is_some()
    }
}

/// What a block displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent<O> {
    /// Formatted answer text.
    Answer(O),
    /// Reasoning, collapsed or expanded.
    Thinking(ThinkingBlock<O>),
}

/// One displayed segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<O> {
    /// Position in the render model; stable across updates.
    pub index: usize,
    /// True for the open segment, which may still grow.
    pub live: bool,
    /// The content.
    pub content: BlockContent<O>,
}

/// A fully presented message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation<O> {
    /// Blocks in document order, the live block last.
    pub blocks: Vec<Block<O>>,
    /// Cursor glyph to append; `None` once the stream has ended.
    pub cursor: Option<char>,
}

/// Applies the presentation policy and remembers which think blocks the
/// reader expanded.
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    config: SegmenterConfig,
    expanded: BTreeSet<usize>,
}

impl Presenter {
    /// Creates a presenter with default preview length and cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a presenter from an explicit configuration.
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self {
            config,
            expanded: BTreeSet::new(),
        }
    }

    /// Flips the expanded state of the think block at `index`.
    ///
    /// Returns the new state.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.expanded.remove(&index) {
            false
        } else {
            self.expanded.insert(index);
            true
        }
    }

    /// Whether the think block at `index` is expanded.
    #[inline]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Presents `model`, formatting visible text with `formatter`.
    pub fn present<F: Formatter>(
        &self,
        model: &RenderModel<'_>,
        formatter: &F,
    ) -> Presentation<F::Output> {
        let mut blocks = Vec::with_capacity(model.len());

        for (index, segment) in model.finalized.iter().enumerate() {
            blocks.push(self.block(index, false, segment.kind, &segment.text, formatter));
        }
        if let Some(open) = &model.open {
            blocks.push(self.block(model.finalized.len(), true, open.kind, open.text, formatter));
        }

        Presentation {
            blocks,
            cursor: model.streaming.then_some(self.config.cursor_glyph),
        }
    }

    fn block<F: Formatter>(
        &self,
        index: usize,
        live: bool,
        kind: SegmentKind,
        text: &str,
        formatter: &F,
    ) -> Block<F::Output> {
        let content = match kind {
            SegmentKind::Normal => BlockContent::Answer(formatter.format(text)),
            SegmentKind::Think => BlockContent::Thinking(ThinkingBlock {
                preview: think_preview(text, self.config.preview_lines),
                body: self.is_expanded(index).then(|| formatter.format(text)),
            }),
        };
        Block {
            index,
            live,
            content,
        }
    }
}

/// The last `lines` lines of `text` after trimming surrounding whitespace.
pub fn think_preview(text: &str, lines: usize) -> String {
    let trimmed = text.trim();
    let count = trimmed.split('\n').count();
    if count <= lines {
        return trimmed.to_owned();
    }
    trimmed
        .split('\n')
        .skip(count - lines)
        .collect::<Vec<_>>()
        .join("\n")
}
