use std::num::ParseFloatError;
use std::ops::Range;
use std::str::{from_utf8, Utf8Error};

use btoi::ParseIntegerError;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, FromPrimitive, Zero};
use thiserror::Error;

// A token packs its descriptor into one 32-bit word next to the 32-bit
// start offset: length in bits 0..16, type in bits 16..20, level in bits
// 20..31, the is-last marker in bit 31.
const LEN_MASK: u32 = 0xFFFF;
const TYPE_SHIFT: u32 = 16;
const TYPE_MASK: u32 = 0xF;
const LEVEL_SHIFT: u32 = 20;
const LEVEL_MASK: u32 = 0x7FF;
const LAST_BIT: u32 = 1 << 31;

/// The longest input the tokenizer accepts. The root token's length must
/// span the entire input and the length field is 16 bits wide.
pub const MAX_INPUT_LEN: usize = LEN_MASK as usize;

/// The deepest nesting level a token can record.
pub(crate) const MAX_LEVEL: u16 = LEVEL_MASK as u16;

/// The syntactic class of a [`Token`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenType {
    /// A JSON object, spanning `{` through the matching `}`.
    Object = 0,

    /// A JSON array, spanning `[` through the matching `]`.
    Array = 1,

    /// A string, spanning both surrounding quotes. Escape sequences inside
    /// are validated but left undecoded.
    String = 2,

    /// A number with a fractional part or an exponent.
    Number = 3,

    /// A number with neither fractional part nor exponent. Every `Integer`
    /// is also a valid `Number`.
    Integer = 4,

    /// The keyword `true`.
    True = 5,

    /// The keyword `false`.
    False = 6,

    /// The keyword `null`.
    Null = 7,
}

impl TokenType {
    fn from_bits(bits: u32) -> TokenType {
        match bits {
            0 => TokenType::Object,
            1 => TokenType::Array,
            2 => TokenType::String,
            3 => TokenType::Number,
            4 => TokenType::Integer,
            5 => TokenType::True,
            6 => TokenType::False,
            _ => TokenType::Null,
        }
    }
}

/// An error that can happen when reading a token's text as a string
#[derive(Error, Debug)]
#[error("invalid string: {0}")]
pub struct InvalidStringValueError(#[from] Utf8Error);

/// An error that can happen when decoding a token's text to an integer
#[derive(Error, Debug)]
#[error("invalid integer: {0}")]
pub struct InvalidIntValueError(#[from] ParseIntegerError);

/// An error that can happen when decoding a token's text to a float
#[derive(Error, Debug)]
pub enum InvalidFloatValueError {
    #[error("unable to read token text as string: {0}")]
    String(#[from] InvalidStringValueError),

    #[error("unable to parse token text to float: {0}")]
    Float(#[from] ParseFloatError),
}

/// One JSON syntactic element, described as a sub-range of the input
/// buffer it was parsed from.
///
/// Tokens copy no character data. They are only meaningful together with
/// the input buffer they were parsed from, and only while that buffer
/// remains unmodified. A token is two 32-bit words; the field packing is an
/// implementation detail behind the logical accessors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Token {
    start: u32,
    packed: u32,
}

impl Token {
    pub(crate) fn new(start: usize, token_type: TokenType, level: u16) -> Token {
        Token {
            start: start as u32,
            packed: ((token_type as u32) << TYPE_SHIFT) | ((level as u32) << LEVEL_SHIFT),
        }
    }

    /// Byte offset of the element's first byte within the input buffer.
    pub fn start(&self) -> usize {
        self.start as usize
    }

    /// Byte length of the element's complete textual form. Containers span
    /// their brackets inclusively; strings include both quotes.
    pub fn len(&self) -> usize {
        (self.packed & LEN_MASK) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The token's byte range within the input buffer.
    pub fn span(&self) -> Range<usize> {
        self.start()..self.start() + self.len()
    }

    pub fn token_type(&self) -> TokenType {
        TokenType::from_bits((self.packed >> TYPE_SHIFT) & TYPE_MASK)
    }

    /// Nesting depth. Top-level tokens are at level 0; a direct child of a
    /// container is one level deeper than its container.
    pub fn level(&self) -> u16 {
        ((self.packed >> LEVEL_SHIFT) & LEVEL_MASK) as u16
    }

    /// `true` only on the last token the tokenizer wrote.
    pub fn is_last(&self) -> bool {
        self.packed & LAST_BIT != 0
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= LEN_MASK as usize);
        self.packed = (self.packed & !LEN_MASK) | (len as u32 & LEN_MASK);
    }

    pub(crate) fn set_type(&mut self, token_type: TokenType) {
        self.packed =
            (self.packed & !(TYPE_MASK << TYPE_SHIFT)) | ((token_type as u32) << TYPE_SHIFT);
    }

    pub(crate) fn set_last(&mut self) {
        self.packed |= LAST_BIT;
    }

    /// The raw bytes of the element's textual form.
    ///
    /// # Panics
    ///
    /// Panics if `input` is not the buffer this token was parsed from and
    /// the token's span falls outside it.
    pub fn text<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.span()]
    }

    /// The token's text as `&str`. For a [`TokenType::String`] token this
    /// is the text between the quotes, with escape sequences untouched; for
    /// every other type it is the complete span.
    pub fn str_value<'a>(&self, input: &'a [u8]) -> Result<&'a str, InvalidStringValueError> {
        let text = self.text(input);
        let text = if self.token_type() == TokenType::String {
            &text[1..text.len() - 1]
        } else {
            text
        };
        Ok(from_utf8(text)?)
    }

    /// Decode the token's text to an integer. Intended for
    /// [`TokenType::Integer`] tokens; any other text fails to decode.
    pub fn int_value<I>(&self, input: &[u8]) -> Result<I, InvalidIntValueError>
    where
        I: FromPrimitive + Zero + CheckedAdd + CheckedSub + CheckedMul,
    {
        Ok(btoi::btoi(self.text(input))?)
    }

    /// Decode the token's text to a float. Intended for
    /// [`TokenType::Number`] and [`TokenType::Integer`] tokens.
    pub fn float_value(&self, input: &[u8]) -> Result<f64, InvalidFloatValueError> {
        Ok(self.str_value(input)?.parse()?)
    }
}
