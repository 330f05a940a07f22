//! Incremental segmentation of streamed model output.
//!
//! Language models that "think out loud" interleave their answer with
//! reasoning wrapped in `<think>` … `</think>`. This crate splits the growing
//! response buffer into [`Segment`]s of kind [`SegmentKind::Normal`] or
//! [`SegmentKind::Think`] while the stream is still arriving, scanning each
//! byte once and never re-processing finalized text.
//!
//! - [`StreamSegmenter`] + [`ParserState`]: the state machine.
//! - [`RenderModel`] / [`RenderSnapshot`]: what a renderer draws.
//! - [`present`]: collapsed reasoning previews and the live cursor.
//! - `async_stream`: tokio and futures drivers (feature-gated).

#![cfg_attr(
    not(test),
    deny(
        unsafe_code,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::dbg_macro
    )
)]

pub mod config;
mod error;
pub mod marker;
pub mod present;
mod render;
mod segment;
mod segmenter;
mod state;

#[cfg(any(feature = "tokio", feature = "futures"))]
pub mod async_stream;

pub use config::SegmenterConfig;
pub use error::Error;
pub use marker::{Marker, strip_markers};
pub use present::{Block, BlockContent, Formatter, Presentation, Presenter, ThinkingBlock};
pub use render::{RenderModel, RenderSnapshot};
pub use segment::{Mode, OpenSegment, Segment, SegmentKind};
pub use segmenter::StreamSegmenter;
pub use state::ParserState;
