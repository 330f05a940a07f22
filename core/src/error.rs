//! Core error types for thinkstream.
//!
//! Malformed tag content in the stream is never an error: the segmenter is
//! total over arbitrary model output. The variants here all describe a
//! caller lifecycle bug, i.e. feeding a [`ParserState`](crate::ParserState)
//! something other than one monotonically growing buffer.

use thiserror::Error;

/// Contract violation reported by [`StreamSegmenter::consume`](crate::StreamSegmenter::consume).
///
/// The state is left untouched when one of these is returned. Recovery is
/// always the same: construct a fresh [`ParserState`](crate::ParserState)
/// for the new message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The buffer is shorter than the text already consumed.
    #[error("buffer shrank: {len} bytes supplied but {cursor} already consumed")]
    BufferShrank {
        /// Bytes consumed so far.
        cursor: usize,
        /// Length of the buffer that was passed in.
        len: usize,
    },

    /// The buffer no longer starts with the text already consumed.
    ///
    /// Detection is best-effort: only the last
    /// [`guard_window`](crate::SegmenterConfig::guard_window) consumed bytes
    /// are compared.
    #[error("buffer diverged from the consumed prefix before byte {cursor}")]
    BufferDiverged {
        /// Bytes consumed so far.
        cursor: usize,
    },

    /// New input arrived after the stream was flushed.
    #[error("{extra} bytes arrived after the stream was flushed at byte {cursor}")]
    ConsumeAfterFlush {
        /// Bytes consumed when the flush happened.
        cursor: usize,
        /// Bytes appended since.
        extra: usize,
    },
}
