//! Per-stream parse state.
//!
//! A [`ParserState`] is plain data: one is created per message, mutated only
//! by [`StreamSegmenter::consume`](crate::StreamSegmenter::consume), and
//! dropped with the message. It knows nothing about UI lifecycles, which
//! keeps the state machine testable without a rendering harness.
//!
//! # Invariant
//!
//! ```text
//! concat(finalized) + open accumulator + pending == strip_markers(buffer[..cursor])
//! ```

use tracing::trace;

use crate::error::Error;
use crate::render::RenderModel;
use crate::segment::{Mode, OpenSegment, Segment};

/// Incremental parse state for one streamed message.
#[derive(Debug, Clone, Default)]
pub struct ParserState {
    /// Bytes of the buffer consumed so far.
    cursor: usize,
    /// Region new text is appended to.
    mode: Mode,
    /// Unfinalized answer text. Only non-empty in `Mode::Normal`.
    open_normal: String,
    /// Unfinalized reasoning text. Only non-empty in `Mode::InsideThink`.
    open_think: String,
    /// Consumed bytes that may be the start of the marker searched for.
    pending: String,
    /// Segments in document order.
    finalized: Vec<Segment>,
    /// Set once the terminal flush ran.
    flushed: bool,
    /// Last consumed bytes, compared against each new buffer.
    tail: Vec<u8>,
}

impl ParserState {
    /// Creates an empty state: cursor 0, normal mode, nothing finalized.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the buffer consumed so far.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The region new text is currently appended to.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Finalized segments in document order.
    #[inline]
    pub fn finalized(&self) -> &[Segment] {
        &self.finalized
    }

    /// The unfinalized trailing region, if it has any text.
    pub fn open(&self) -> Option<OpenSegment<'_>> {
        let text = self.accumulator();
        (!text.is_empty()).then(|| OpenSegment {
            kind: self.mode.kind(),
            text,
        })
    }

    /// Bytes held back because they may begin a marker.
    #[inline]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// True once the stream has been flushed.
    #[inline]
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// The current render model without consuming anything.
    #[inline]
    pub fn render(&self, streaming: bool) -> RenderModel<'_> {
        RenderModel::new(&self.finalized, self.open(), streaming)
    }

    /// Checks that `buffer` continues the text consumed so far.
    pub(crate) fn check_continuation(&self, buffer: &str) -> Result<(), Error> {
        let cursor = self.cursor;
        if buffer.len() < cursor {
            return Err(Error::BufferShrank {
                cursor,
                len: buffer.len(),
            });
        }
        if !buffer.is_char_boundary(cursor) {
            return Err(Error::BufferDiverged { cursor });
        }
        let start = cursor - self.tail.len();
        if buffer.as_bytes()[start..cursor] != self.tail[..] {
            return Err(Error::BufferDiverged { cursor });
        }
        if self.flushed && buffer.len() > cursor {
            return Err(Error::ConsumeAfterFlush {
                cursor,
                extra: buffer.len() - cursor,
            });
        }
        Ok(())
    }

    /// Marks `buffer[cursor..]` consumed and returns it.
    pub(crate) fn advance<'b>(&mut self, buffer: &'b str, guard_window: usize) -> &'b str {
        let delta = &buffer[self.cursor..];
        self.cursor = buffer.len();

        let start = buffer.len().saturating_sub(guard_window);
        self.tail.clear();
        self.tail.extend_from_slice(&buffer.as_bytes()[start..]);

        delta
    }

    #[inline]
    fn accumulator(&self) -> &str {
        match self.mode {
            Mode::Normal => &self.open_normal,
            Mode::InsideThink => &self.open_think,
        }
    }

    #[inline]
    pub(crate) fn accumulator_mut(&mut self) -> &mut String {
        match self.mode {
            Mode::Normal => &mut self.open_normal,
            Mode::InsideThink => &mut self.open_think,
        }
    }

    /// Takes the held-back bytes, leaving `pending` empty.
    #[inline]
    pub(crate) fn take_pending(&mut self) -> String {
        core::mem::take(&mut self.pending)
    }

    #[inline]
    pub(crate) fn hold(&mut self, partial: &str) {
        self.pending.push_str(partial);
    }

    /// Finalizes the active accumulator if it holds any text.
    pub(crate) fn finalize_open(&mut self) {
        let kind = self.mode.kind();
        let text = core::mem::take(self.accumulator_mut());
        if text.is_empty() {
            return;
        }
        trace!(kind = %kind, len = text.len(), index = self.finalized.len(), "segment finalized");
        self.finalized.push(Segment { kind, text });
    }

    /// Finalizes the active region and switches to the other mode.
    pub(crate) fn cross_marker(&mut self) {
        self.finalize_open();
        self.mode = self.mode.toggled();
        trace!(mode = ?self.mode, cursor = self.cursor, "marker crossed");
    }

    /// Releases held-back bytes as literal text and finalizes the open region.
    pub(crate) fn flush(&mut self) {
        let pending = self.take_pending();
        self.accumulator_mut().push_str(&pending);
        self.finalize_open();
        self.flushed = true;
    }
}
