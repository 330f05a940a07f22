//! The streaming `<think>` segmenter.
//!
//! The caller owns one growing buffer per message and passes the *whole*
//! buffer on every update. The segmenter consumes only the suffix it has not
//! seen, so each byte is scanned once no matter how often it is called.
//!
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/segmenter.mmd"))]
//!
//! # Example
//!
//! ```ignore
//! use thinkstream_core::{ParserState, StreamSegmenter};
//!
//! let segmenter = StreamSegmenter::new();
//! let mut state = ParserState::new();
//! let mut buffer = String::new();
//!
//! for chunk in ["Sure. <thi", "nk>The user wants", " a plan</think>Step 1"] {
//!     buffer.push_str(chunk);
//!     let model = segmenter.consume(&mut state, &buffer, true)?;
//!     render_live(&model);
//! }
//!
//! // Stream finished: the open "Step 1" region is finalized.
//! let model = segmenter.consume(&mut state, &buffer, false)?;
//! ```

use std::borrow::Cow;

use tracing::{debug, error};

use crate::config::SegmenterConfig;
use crate::error::Error;
use crate::render::RenderModel;
use crate::segment::Segment;
use crate::state::ParserState;

/// Splits a growing buffer into normal and think segments.
///
/// The segmenter holds configuration only; all per-stream data lives in the
/// [`ParserState`] passed to [`consume`](Self::consume). One segmenter can
/// serve any number of streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamSegmenter {
    config: SegmenterConfig,
}

impl StreamSegmenter {
    /// Creates a segmenter with the default configuration.
    #[inline]
    pub const fn new() -> Self {
        Self::with_config(SegmenterConfig::DEFAULT)
    }

    /// Creates a segmenter with a custom configuration.
    #[inline]
    pub const fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[inline]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Advances `state` over the newly appended suffix of `buffer`.
    ///
    /// - With no new bytes the scan is a no-op and the model is unchanged.
    /// - With `is_streaming == false` the open region is flushed, even if no
    ///   new bytes arrived. Later calls with the same buffer are no-ops and
    ///   report the stream as ended whatever `is_streaming` says.
    ///
    /// Unbalanced or stray markers are never errors. An `Err` means the
    /// caller broke the one-buffer-per-state contract; the state is left as
    /// it was and a fresh [`ParserState`] should be used.
    pub fn consume<'s>(
        &self,
        state: &'s mut ParserState,
        buffer: &str,
        is_streaming: bool,
    ) -> Result<RenderModel<'s>, Error> {
        if let Err(err) = state.check_continuation(buffer) {
            error!(%err, "segmenter fed a buffer that does not continue the stream");
            return Err(err);
        }

        if buffer.len() > state.cursor() {
            let delta = state.advance(buffer, self.config.guard_window);
            Self::scan(state, delta);
        }

        if !is_streaming && !state.is_flushed() {
            state.flush();
            debug!(
                segments = state.finalized().len(),
                cursor = state.cursor(),
                "stream flushed"
            );
        }

        Ok(state.render(is_streaming && !state.is_flushed()))
    }

    /// Segments a complete text in one call.
    ///
    /// Equivalent to a single `consume(text, false)` on a fresh state.
    pub fn segment_all(&self, text: &str) -> Vec<Segment> {
        let mut state = ParserState::new();
        let delta = state.advance(text, 0);
        Self::scan(&mut state, delta);
        state.flush();
        state.finalized().to_vec()
    }

    /// Runs the tag scan over held-back bytes followed by `delta`.
    ///
    /// Loops until the input is exhausted so that one delta may contain any
    /// number of transitions. When the current marker is not found, a tail
    /// that could still become the marker goes back to `pending`.
    fn scan(state: &mut ParserState, delta: &str) {
        let held = state.take_pending();
        let input: Cow<'_, str> = if held.is_empty() {
            Cow::Borrowed(delta)
        } else {
            Cow::Owned(held + delta)
        };

        let mut rest: &str = &input;
        loop {
            let marker = state.mode().closing_marker();
            match marker.find(rest) {
                Some(i) => {
                    state.accumulator_mut().push_str(&rest[..i]);
                    state.cross_marker();
                    rest = &rest[i + marker.len()..];
                }
                None => {
                    let split = rest.len() - marker.partial_suffix_len(rest);
                    let (text, partial) = rest.split_at(split);
                    state.accumulator_mut().push_str(text);
                    state.hold(partial);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{Mode, SegmentKind};

    fn feed(chunks: &[&str]) -> (ParserState, String) {
        let segmenter = StreamSegmenter::new();
        let mut state = ParserState::new();
        let mut buffer = String::new();
        for chunk in chunks {
            buffer.push_str(chunk);
            segmenter.consume(&mut state, &buffer, true).unwrap();
        }
        (state, buffer)
    }

    #[test]
    fn test_plain_text_stays_open() {
        let (state, _) = feed(&["hello ", "world"]);
        assert!(state.finalized().is_empty());
        let open = state.open().unwrap();
        assert_eq!(open.kind, SegmentKind::Normal);
        assert_eq!(open.text, "hello world");
    }

    #[test]
    fn test_open_tag_finalizes_normal() {
        let (state, _) = feed(&["intro<think>why"]);
        assert_eq!(state.finalized(), &[Segment::normal("intro")]);
        assert_eq!(state.mode(), Mode::InsideThink);
        assert_eq!(state.open().unwrap().text, "why");
    }

    #[test]
    fn test_many_transitions_in_one_delta() {
        let (state, _) = feed(&["a<think>A</think>normal<think>B"]);
        assert_eq!(
            state.finalized(),
            &[
                Segment::normal("a"),
                Segment::think("A"),
                Segment::normal("normal"),
            ]
        );
        assert_eq!(state.open().unwrap().to_segment(), Segment::think("B"));
    }

    #[test]
    fn test_split_open_tag_is_held_back() {
        let (state, _) = feed(&["abc<th"]);
        assert_eq!(state.open().unwrap().text, "abc");
        assert_eq!(state.pending(), "<th");

        let (state, _) = feed(&["abc<th", "ink>x"]);
        assert_eq!(state.finalized(), &[Segment::normal("abc")]);
        assert_eq!(state.open().unwrap().to_segment(), Segment::think("x"));
        assert!(state.pending().is_empty());
    }

    #[test]
    fn test_held_back_bytes_that_do_not_complete_are_text() {
        let (state, _) = feed(&["a <", "b"]);
        assert_eq!(state.open().unwrap().text, "a <b");
        assert!(state.pending().is_empty());
    }

    #[test]
    fn test_flush_on_stream_end() {
        let segmenter = StreamSegmenter::new();
        let (mut state, buffer) = feed(&["A<think>B"]);
        let model = segmenter.consume(&mut state, &buffer, false).unwrap();
        assert_eq!(
            model.finalized,
            &[Segment::normal("A"), Segment::think("B")]
        );
        assert!(model.open.is_none());
        assert!(!model.streaming);
    }

    #[test]
    fn test_flush_releases_partial_marker() {
        let segmenter = StreamSegmenter::new();
        let (mut state, buffer) = feed(&["A<think>B</thi"]);
        segmenter.consume(&mut state, &buffer, false).unwrap();
        assert_eq!(
            state.finalized(),
            &[Segment::normal("A"), Segment::think("B</thi")]
        );
    }

    #[test]
    fn test_second_flush_is_noop() {
        let segmenter = StreamSegmenter::new();
        let (mut state, buffer) = feed(&["x"]);
        segmenter.consume(&mut state, &buffer, false).unwrap();
        segmenter.consume(&mut state, &buffer, false).unwrap();
        assert_eq!(state.finalized(), &[Segment::normal("x")]);
    }

    #[test]
    fn test_flushed_stream_stays_ended() {
        let segmenter = StreamSegmenter::new();
        let mut state = ParserState::new();
        segmenter.consume(&mut state, "A<think>B", false).unwrap();

        let model = segmenter.consume(&mut state, "A<think>B", true).unwrap();
        assert!(!model.streaming);
        assert_eq!(
            model.finalized,
            &[Segment::normal("A"), Segment::think("B")]
        );
    }

    #[test]
    fn test_growth_after_flush_is_rejected() {
        let segmenter = StreamSegmenter::new();
        let mut state = ParserState::new();
        segmenter.consume(&mut state, "done", false).unwrap();
        let err = segmenter.consume(&mut state, "done!", true).unwrap_err();
        assert_eq!(
            err,
            Error::ConsumeAfterFlush {
                cursor: 4,
                extra: 1
            }
        );
    }

    #[test]
    fn test_violation_leaves_state_untouched() {
        let segmenter = StreamSegmenter::new();
        let (mut state, _) = feed(&["hello<think>"]);
        let before = state.clone();
        assert!(segmenter.consume(&mut state, "he", true).is_err());
        assert_eq!(state.cursor(), before.cursor());
        assert_eq!(state.finalized(), before.finalized());
        assert_eq!(state.mode(), before.mode());
    }

    #[test]
    fn test_segment_all() {
        let segments = StreamSegmenter::new().segment_all("<think>plan</think>answer");
        assert_eq!(
            segments,
            vec![Segment::think("plan"), Segment::normal("answer")]
        );
    }
}
