//! Segmenter configuration.
//!
//! This module provides [`SegmenterConfig`] for the few knobs the segmenter
//! and its presentation layer expose. The tag vocabulary itself is fixed and
//! not configurable.
//!
//! # Example
//!
//! ```ignore
//! use thinkstream_core::SegmenterConfig;
//!
//! // Defaults: 32-byte divergence guard, 3 preview lines, '▌' cursor
//! let config = SegmenterConfig::default();
//!
//! // Longer previews for wide layouts
//! let config = SegmenterConfig::new().with_preview_lines(5);
//! ```

/// Configuration for segmentation and presentation.
///
/// # Default Values
///
/// | Setting | Default | Rationale |
/// |---------|---------|-----------|
/// | `guard_window` | 32 | Catches a stale state reused for a new message |
/// | `preview_lines` | 3 | Collapsed reasoning blocks show their tail |
/// | `cursor_glyph` | `'▌'` | Live cursor while streaming |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Number of trailing consumed bytes remembered per stream.
    ///
    /// On each call the same bytes must still precede the cursor, otherwise
    /// [`Error::BufferDiverged`](crate::Error::BufferDiverged) is returned.
    /// `0` disables the check.
    ///
    /// Default: 32
    pub guard_window: usize,

    /// Lines of trimmed reasoning text shown in a collapsed think block.
    ///
    /// Default: 3
    pub preview_lines: usize,

    /// Glyph appended to the live segment while the stream is open.
    ///
    /// Default: `'▌'`
    pub cursor_glyph: char,
}

impl Default for SegmenterConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl SegmenterConfig {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        guard_window: 32,
        preview_lines: 3,
        cursor_glyph: '▌',
    };

    /// Creates a new configuration with default values.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the divergence guard window in bytes.
    #[inline]
    pub const fn with_guard_window(mut self, bytes: usize) -> Self {
        self.guard_window = bytes;
        self
    }

    /// Sets the number of preview lines for collapsed think blocks.
    #[inline]
    pub const fn with_preview_lines(mut self, lines: usize) -> Self {
        self.preview_lines = lines;
        self
    }

    /// Sets the live cursor glyph.
    #[inline]
    pub const fn with_cursor_glyph(mut self, glyph: char) -> Self {
        self.cursor_glyph = glyph;
        self
    }

    /// Disables divergent-buffer detection.
    ///
    /// Shrinking buffers are still rejected.
    #[inline]
    pub const fn disable_divergence_guard(self) -> Self {
        self.with_guard_window(0)
    }
}
