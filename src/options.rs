//! Configuration options for the two codecs.
//!
//! This module provides:
//!
//! - [`TextOptions`]: USO output layout and parser limits
//! - [`BinaryOptions`]: decoder limits and the gzip level for compressed archives
//!
//! ## Examples
//!
//! ```rust
//! use ubo::{to_text_with_options, DataMap, DataValue, TextOptions};
//!
//! let mut map = DataMap::new();
//! map.put_int("x", 1);
//!
//! let options = TextOptions::pretty().with_indent(4);
//! let text = to_text_with_options(&DataValue::from(map), &options);
//! assert_eq!(text, "{\n    \"x\": 1\n}");
//! ```

/// Default bound on container nesting for both decoders.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default bound on the largest bitset index the text parser accepts.
///
/// A set bit at index `n` costs `n / 8 + 1` bytes, so this keeps a short
/// document from allocating more than 128 KiB per bitset.
pub const DEFAULT_MAX_BITSET_INDEX: usize = (1 << 20) - 1;

/// Configuration options for USO text.
///
/// # Examples
///
/// ```rust
/// use ubo::TextOptions;
///
/// // Compact single-line output, multi-line input accepted
/// let options = TextOptions::new();
/// assert!(!options.pretty);
///
/// // Parse only the first line of the input, ignoring the rest
/// let options = TextOptions::new().with_first_line_only(true);
/// assert!(options.first_line_only);
/// ```
#[derive(Clone, Debug)]
pub struct TextOptions {
    pub pretty: bool,
    pub indent: usize,
    pub first_line_only: bool,
    pub max_depth: usize,
    /// Largest index accepted in a `[X; ...]` bitset literal.
    pub max_bitset_index: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            pretty: false,
            indent: 2,
            first_line_only: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_bitset_index: DEFAULT_MAX_BITSET_INDEX,
        }
    }
}

impl TextOptions {
    /// Creates default options (compact output, whole input parsed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output with one entry per line.
    #[must_use]
    pub fn pretty() -> Self {
        TextOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Restricts parsing to the text before the first line break.
    ///
    /// Anything after the first line is ignored rather than rejected. Pretty
    /// output cannot be read back in this mode.
    #[must_use]
    pub fn with_first_line_only(mut self, first_line_only: bool) -> Self {
        self.first_line_only = first_line_only;
        self
    }

    /// Sets the maximum container nesting the parser accepts.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the largest bitset index the parser accepts.
    #[must_use]
    pub fn with_max_bitset_index(mut self, max_bitset_index: usize) -> Self {
        self.max_bitset_index = max_bitset_index;
        self
    }
}

/// Configuration options for the binary codec.
///
/// # Examples
///
/// ```rust
/// use ubo::BinaryOptions;
///
/// let options = BinaryOptions::new()
///     .with_max_depth(64)
///     .with_compression_level(9);
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Clone, Debug)]
pub struct BinaryOptions {
    pub max_depth: usize,
    /// gzip level, 0 (store) to 9 (best). Only used by the compressed writers.
    pub compression_level: u32,
}

impl Default for BinaryOptions {
    fn default() -> Self {
        BinaryOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            compression_level: 6,
        }
    }
}

impl BinaryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum container nesting the decoder accepts.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the gzip level, clamped to `0..=9`.
    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }
}
