use thiserror::Error;

/// An error that can happen during tokenization.
///
/// The tokenizer is total with respect to malformed input: every input
/// either parses completely or fails with exactly one of these variants.
/// [`code()`](Self::code) maps each variant to the conventional negative
/// integer used by embedded bindings.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The input violates the JSON grammar.
    #[error("bad format: the input is not valid JSON")]
    BadFormat,

    /// The input ended in the middle of an element.
    #[error("incomplete: the input ended mid-element")]
    Incomplete,

    /// The input contained nothing but whitespace.
    #[error("no entities: the input contains no JSON element")]
    NoEntities,

    /// Non-whitespace bytes remained after the top-level element.
    #[error("stray input: bytes remain after the top-level element")]
    StrayInput,

    /// The caller-supplied token array filled up before the input was
    /// exhausted.
    #[error("not enough tokens: the token array is full")]
    NotEnoughTokens,

    /// Empty input, an empty token array, or an input longer than a token's
    /// 16-bit length field can span.
    #[error("bad argument: empty buffer or unusable capacity")]
    BadArgument,

    /// Nesting exceeded the configured maximum depth.
    #[error("too deep: nesting exceeds the configured maximum depth")]
    TooDeep,

    /// A byte with the high bit set was encountered. Multi-byte input is
    /// not supported, not even inside string literals.
    #[error("no multibyte: input contains a byte with the high bit set")]
    NoMultibyte,

    /// An unreachable-state guard fired. This indicates a bug in the
    /// tokenizer, not malformed input.
    #[error("internal: unreachable tokenizer state")]
    Internal,
}

impl ParseError {
    /// The conventional integer code for this error. Success has no code
    /// here; it is the `Ok(count)` arm of the parse result.
    pub fn code(&self) -> i32 {
        match self {
            ParseError::BadFormat => -1,
            ParseError::Incomplete => -2,
            ParseError::NoEntities => -3,
            ParseError::StrayInput => -4,
            ParseError::NotEnoughTokens => -5,
            ParseError::BadArgument => -6,
            ParseError::TooDeep => -7,
            ParseError::NoMultibyte => -8,
            ParseError::Internal => -9,
        }
    }
}
