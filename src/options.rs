use crate::token::MAX_LEVEL;

/// Options for [`parse_with_options`](crate::parse_with_options). Use
/// [`TokenizerOptionsBuilder`] to create instances of this struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// The maximum number of nesting levels
    pub(crate) max_depth: u16,
}

impl Default for TokenizerOptions {
    /// Returns default tokenizer options
    fn default() -> Self {
        Self {
            max_depth: MAX_LEVEL + 1,
        }
    }
}

impl TokenizerOptions {
    /// Returns the maximum number of nesting levels the tokenizer accepts
    pub fn max_depth(&self) -> u16 {
        self.max_depth
    }
}

/// A builder for [`TokenizerOptions`]
///
/// ```rust
/// use flatjson::{parse_with_options, Token, TokenizerOptionsBuilder};
///
/// let mut tokens = [Token::default(); 8];
/// let options = TokenizerOptionsBuilder::default()
///     .with_max_depth(16)
///     .build();
/// let count = parse_with_options(b"[[1,2],[3]]", &mut tokens, options).unwrap();
/// assert_eq!(count, 6);
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenizerOptionsBuilder {
    options: TokenizerOptions,
}

impl TokenizerOptionsBuilder {
    /// Set the maximum number of nesting levels. A token that would be
    /// allocated at this depth or beyond fails the parse with
    /// [`ParseError::TooDeep`](crate::ParseError::TooDeep).
    ///
    /// Recognizer recursion depth equals nesting depth, so this also bounds
    /// call-stack use. Values above 2048 are clamped: a token's level field
    /// is 11 bits wide.
    pub fn with_max_depth(mut self, max_depth: u16) -> Self {
        self.options.max_depth = max_depth.min(MAX_LEVEL + 1);
        self
    }

    /// Create a new [`TokenizerOptions`] object
    pub fn build(self) -> TokenizerOptions {
        self.options
    }
}
