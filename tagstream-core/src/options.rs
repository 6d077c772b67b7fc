//! Parser configuration.

/// Deepest element nesting accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options shared by the tokenizer, tree builder and walker.
///
/// ```
/// use tagstream_core::ParseOptions;
///
/// let options = ParseOptions::new().skip_whitespace(false).max_depth(64);
/// assert!(!options.skip_whitespace);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop whitespace between markup instead of emitting it as text.
    ///
    /// When set, text runs also lose their leading whitespace. Whitespace
    /// inside a run and before the next `<` is kept.
    pub skip_whitespace: bool,
    /// Maximum number of simultaneously open elements.
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_whitespace(mut self, skip: bool) -> Self {
        self.skip_whitespace = skip;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_whitespace: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
