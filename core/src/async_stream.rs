//! Async adapters that drive a segmenter from a chunk stream.
//!
//! The network transport is not part of this crate. These adapters are the
//! ordered, serialized caller the segmenter expects: they own the growing
//! buffer, append each chunk, call [`StreamSegmenter::consume`] and publish
//! owned [`RenderSnapshot`]s.
//!
//! # Features
//!
//! - **Batching**: with a non-zero [`StreamConfig::batch_interval`] updates are
//!   coalesced; every published snapshot still covers the whole buffer.
//! - **Cancellation**: the tokio pipeline flushes when cancelled, so open
//!   segments are never lost.
//! - **Backpressure**: bounded channels provide natural flow control.
//!
//! # Example
//!
//! ```ignore
//! use thinkstream::async_stream::{StreamConfig, tokio_impl::SegmentPipeline};
//! use tokio::sync::mpsc;
//!
//! async fn render_reply(chunks: mpsc::Receiver<String>) {
//!     let (update_tx, mut update_rx) = mpsc::channel(16);
//!
//!     tokio::spawn(async move {
//!         let mut pipeline = SegmentPipeline::with_config(chunks, update_tx, StreamConfig::batched());
//!         pipeline.run().await
//!     });
//!
//!     while let Some(snapshot) = update_rx.recv().await {
//!         redraw(&snapshot);
//!     }
//! }
//! ```

use core::time::Duration;

use thiserror::Error;

use crate::config::SegmenterConfig;
use crate::error::Error as SegmentError;
use crate::render::RenderSnapshot;
use crate::segmenter::StreamSegmenter;
use crate::state::ParserState;

/// Error type for async segmenting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The update receiver was dropped.
    #[error("channel closed unexpectedly")]
    ChannelClosed,

    /// A single chunk exceeded [`StreamConfig::max_chunk_size`].
    #[error("chunk size {size} exceeds maximum {max}")]
    ChunkTooLarge {
        /// Size of the rejected chunk.
        size: usize,
        /// Maximum allowed chunk size.
        max: usize,
    },

    /// The segmenter rejected the buffer.
    #[error(transparent)]
    Segment(#[from] SegmentError),
}

/// Configuration for async segmenting.
///
/// # Presets
///
/// - [`StreamConfig::immediate()`]: publish after every chunk (default)
/// - [`StreamConfig::batched()`]: coalesce updates over 20 ms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Capacity of the channels created by `SegmentPipeline::channel`. Default: 64.
    pub channel_capacity: usize,
    /// Largest accepted chunk in bytes. Default: 64KB.
    pub max_chunk_size: usize,
    /// Minimum time between published updates. Zero publishes per chunk.
    pub batch_interval: Duration,
    /// Configuration of the underlying segmenter.
    pub segmenter: SegmenterConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::immediate()
    }
}

impl StreamConfig {
    /// Publish a snapshot for every chunk.
    pub const fn immediate() -> Self {
        Self {
            channel_capacity: 64,
            max_chunk_size: 64 * 1024,
            batch_interval: Duration::ZERO,
            segmenter: SegmenterConfig::DEFAULT,
        }
    }

    /// Publish at most one snapshot every 20 ms.
    pub const fn batched() -> Self {
        Self::immediate().with_batch_interval(Duration::from_millis(20))
    }

    /// Sets the batch interval.
    pub const fn with_batch_interval(mut self, interval: Duration) -> Self {
        self.batch_interval = interval;
        self
    }

    /// Sets the channel capacity.
    pub const fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Sets the maximum chunk size.
    pub const fn with_max_chunk_size(mut self, max: usize) -> Self {
        self.max_chunk_size = max;
        self
    }

    /// Sets the segmenter configuration.
    pub const fn with_segmenter(mut self, segmenter: SegmenterConfig) -> Self {
        self.segmenter = segmenter;
        self
    }
}

/// Buffer, state and segmenter for one stream.
#[derive(Debug)]
struct Session {
    segmenter: StreamSegmenter,
    state: ParserState,
    buffer: String,
    max_chunk_size: usize,
}

impl Session {
    fn new(config: &StreamConfig) -> Self {
        Self {
            segmenter: StreamSegmenter::with_config(config.segmenter),
            state: ParserState::new(),
            buffer: String::new(),
            max_chunk_size: config.max_chunk_size,
        }
    }

    fn push(&mut self, chunk: &str) -> Result<(), StreamError> {
        if chunk.len() > self.max_chunk_size {
            return Err(StreamError::ChunkTooLarge {
                size: chunk.len(),
                max: self.max_chunk_size,
            });
        }
        self.buffer.push_str(chunk);
        Ok(())
    }

    fn snapshot(&mut self, streaming: bool) -> Result<RenderSnapshot, StreamError> {
        let model = self
            .segmenter
            .consume(&mut self.state, &self.buffer, streaming)?;
        Ok(model.to_snapshot())
    }
}

#[cfg(feature = "tokio")]
pub mod tokio_impl {
    //! Tokio-based segmenting pipeline.

    use super::*;
    use ::tokio::sync::mpsc;
    use ::tokio::time::{Instant, sleep_until};
    use core::future::{Future, pending};
    use tracing::{debug, warn};

    enum Event {
        Cancelled,
        Chunk(Option<String>),
        Tick,
    }

    /// Receives text chunks and publishes render snapshots.
    pub struct SegmentPipeline {
        chunk_rx: mpsc::Receiver<String>,
        update_tx: mpsc::Sender<RenderSnapshot>,
        session: Session,
        batch_interval: Duration,
    }

    impl SegmentPipeline {
        /// Create a pipeline that publishes after every chunk.
        pub fn new(
            chunk_rx: mpsc::Receiver<String>,
            update_tx: mpsc::Sender<RenderSnapshot>,
        ) -> Self {
            Self::with_config(chunk_rx, update_tx, StreamConfig::default())
        }

        /// Create a pipeline with custom configuration.
        pub fn with_config(
            chunk_rx: mpsc::Receiver<String>,
            update_tx: mpsc::Sender<RenderSnapshot>,
            config: StreamConfig,
        ) -> Self {
            Self {
                chunk_rx,
                update_tx,
                session: Session::new(&config),
                batch_interval: config.batch_interval,
            }
        }

        /// Create a pipeline together with its chunk and snapshot channels.
        ///
        /// Both channels are bounded by [`StreamConfig::channel_capacity`]
        /// (at least 1). Feed chunks into the returned sender, call
        /// [`run`](Self::run), and read snapshots from the returned receiver.
        pub fn channel(
            config: StreamConfig,
        ) -> (mpsc::Sender<String>, mpsc::Receiver<RenderSnapshot>, Self) {
            let capacity = config.channel_capacity.max(1);
            let (chunk_tx, chunk_rx) = mpsc::channel(capacity);
            let (update_tx, update_rx) = mpsc::channel(capacity);
            let pipeline = Self::with_config(chunk_rx, update_tx, config);
            (chunk_tx, update_rx, pipeline)
        }

        /// The text received so far.
        pub fn buffer(&self) -> &str {
            &self.session.buffer
        }

        /// Run until the chunk channel closes.
        ///
        /// Returns the final, flushed snapshot after publishing it.
        pub async fn run(&mut self) -> Result<RenderSnapshot, StreamError> {
            self.run_until(pending::<()>()).await
        }

        /// Run until the chunk channel closes or `cancel` resolves.
        ///
        /// Either way the buffer received so far is flushed and the final
        /// snapshot published. A chunk over the size limit is dropped, the
        /// text accepted before it is flushed and published, and the
        /// [`StreamError::ChunkTooLarge`] is returned.
        pub async fn run_until<C>(&mut self, cancel: C) -> Result<RenderSnapshot, StreamError>
        where
            C: Future<Output = ()>,
        {
            let mut cancel = core::pin::pin!(cancel);
            let mut deadline: Option<Instant> = None;

            loop {
                let tick = async move {
                    match deadline {
                        Some(at) => sleep_until(at).await,
                        None => pending::<()>().await,
                    }
                };

                let event = ::tokio::select! {
                    biased;
                    _ = &mut cancel => Event::Cancelled,
                    chunk = self.chunk_rx.recv() => Event::Chunk(chunk),
                    _ = tick => Event::Tick,
                };

                match event {
                    Event::Cancelled => {
                        debug!(bytes = self.session.buffer.len(), "segment pipeline cancelled");
                        return self.finish().await;
                    }
                    Event::Chunk(None) => {
                        debug!(bytes = self.session.buffer.len(), "chunk channel closed");
                        return self.finish().await;
                    }
                    Event::Chunk(Some(chunk)) => {
                        if let Err(err) = self.session.push(&chunk) {
                            warn!(%err, bytes = self.session.buffer.len(), "chunk rejected, flushing");
                            self.finish().await?;
                            return Err(err);
                        }
                        if self.batch_interval.is_zero() {
                            self.publish().await?;
                        } else if deadline.is_none() {
                            deadline = Some(Instant::now() + self.batch_interval);
                        }
                    }
                    Event::Tick => {
                        deadline = None;
                        self.publish().await?;
                    }
                }
            }
        }

        async fn publish(&mut self) -> Result<(), StreamError> {
            let snapshot = self.session.snapshot(true)?;
            self.update_tx
                .send(snapshot)
                .await
                .map_err(|_| StreamError::ChannelClosed)
        }

        async fn finish(&mut self) -> Result<RenderSnapshot, StreamError> {
            let snapshot = self.session.snapshot(false)?;
            self.update_tx
                .send(snapshot.clone())
                .await
                .map_err(|_| StreamError::ChannelClosed)?;
            Ok(snapshot)
        }
    }
}

#[cfg(feature = "futures")]
pub mod futures_impl {
    //! Futures-based adapter (runtime-agnostic).

    use super::*;
    use core::pin::Pin;
    use core::task::{Context, Poll};
    use futures_core::Stream;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Streaming,
        Flush,
        Done,
    }

    /// A stream adapter that yields a snapshot per chunk and a flushed
    /// snapshot when the inner stream ends.
    ///
    /// A rejected chunk is yielded as an error, followed by the flushed
    /// snapshot of the text accepted before it; the stream then ends.
    pub struct SegmentUpdates<S> {
        inner: S,
        session: Session,
        phase: Phase,
    }

    impl<S> SegmentUpdates<S>
    where
        S: Stream<Item = String>,
    {
        /// Wrap a chunk stream with the default configuration.
        pub fn new(inner: S) -> Self {
            Self::with_config(inner, &StreamConfig::default())
        }

        /// Wrap a chunk stream with custom configuration.
        ///
        /// The batch interval is ignored; batching needs a timer.
        pub fn with_config(inner: S, config: &StreamConfig) -> Self {
            Self {
                inner,
                session: Session::new(config),
                phase: Phase::Streaming,
            }
        }
    }

    impl<S> Stream for SegmentUpdates<S>
    where
        S: Stream<Item = String> + Unpin,
    {
        type Item = Result<RenderSnapshot, StreamError>;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            let this = self.get_mut();
            match this.phase {
                Phase::Done => return Poll::Ready(None),
                Phase::Flush => {
                    this.phase = Phase::Done;
                    return Poll::Ready(Some(this.session.snapshot(false)));
                }
                Phase::Streaming => {}
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(chunk)) => match this.session.push(&chunk) {
                    Ok(()) => {
                        let result = this.session.snapshot(true);
                        if result.is_err() {
                            this.phase = Phase::Done;
                        }
                        Poll::Ready(Some(result))
                    }
                    Err(err) => {
                        this.phase = Phase::Flush;
                        Poll::Ready(Some(Err(err)))
                    }
                },
                Poll::Ready(None) => {
                    this.phase = Phase::Done;
                    Poll::Ready(Some(this.session.snapshot(false)))
                }
                Poll::Pending => Poll::Pending,
            }
        }
    }
}
