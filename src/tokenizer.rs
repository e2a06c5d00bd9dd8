use crate::chars::{is_digit, is_hex_digit, is_whitespace};
use crate::error::ParseError;
use crate::options::TokenizerOptions;
use crate::token::{Token, TokenType, MAX_INPUT_LEN};

/// Tokenize a complete JSON text into a caller-supplied token array.
///
/// The input is scanned exactly once. Tokens are written to `tokens[0..count]`
/// in preorder: every container token precedes the tokens of its children,
/// and the final token carries the [`is_last`](Token::is_last) marker. The
/// returned `count` is the number of tokens written. On error the contents
/// of `tokens` are unspecified.
///
/// The top-level element may be any JSON value, not only an object or array.
/// Input must be ASCII; any byte with the high bit set fails with
/// [`ParseError::NoMultibyte`].
///
/// ```
/// use flatjson::{parse, Token, TokenType};
///
/// let json = br#"{"name": "Elvis", "age": 42}"#;
/// let mut tokens = [Token::default(); 8];
/// let count = parse(json, &mut tokens).unwrap();
///
/// assert_eq!(count, 5);
/// assert_eq!(tokens[0].token_type(), TokenType::Object);
/// assert_eq!(tokens[4].int_value::<i64>(json).unwrap(), 42);
/// ```
pub fn parse(input: &[u8], tokens: &mut [Token]) -> Result<usize, ParseError> {
    parse_with_options(input, tokens, TokenizerOptions::default())
}

/// Like [`parse`], with explicit [`TokenizerOptions`].
pub fn parse_with_options(
    input: &[u8],
    tokens: &mut [Token],
    options: TokenizerOptions,
) -> Result<usize, ParseError> {
    if input.is_empty() || tokens.is_empty() || input.len() > MAX_INPUT_LEN {
        return Err(ParseError::BadArgument);
    }

    let mut t = Tokenizer {
        input,
        pos: 0,
        tokens,
        count: 0,
        level: 0,
        max_depth: options.max_depth,
    };

    t.skip_whitespace();
    if t.peek().is_none() {
        return Err(ParseError::NoEntities);
    }
    t.element()?;
    t.skip_whitespace();
    match t.peek() {
        Some(b) => Err(reject(b, ParseError::StrayInput)),
        None => {
            t.tokens[t.count - 1].set_last();
            Ok(t.count)
        }
    }
}

/// A rejected byte with the high bit set always reports `NoMultibyte`,
/// whatever error the grammar position would otherwise produce.
fn reject(b: u8, otherwise: ParseError) -> ParseError {
    if b & 0x80 != 0 {
        ParseError::NoMultibyte
    } else {
        otherwise
    }
}

struct Tokenizer<'a, 't> {
    input: &'a [u8],
    pos: usize,
    tokens: &'t mut [Token],
    count: usize,
    level: u16,
    max_depth: u16,
}

impl<'a, 't> Tokenizer<'a, 't> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn take(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if is_whitespace(b)) {
            self.pos += 1;
        }
    }

    /// Append a token for the element starting at the current position. The
    /// token is appended before the element's contents are parsed, so
    /// container tokens precede their children and the array ends up in
    /// preorder. The length is patched in by [`Self::seal`] afterwards.
    fn push_token(&mut self, token_type: TokenType) -> Result<usize, ParseError> {
        if self.level >= self.max_depth {
            return Err(ParseError::TooDeep);
        }
        if self.count == self.tokens.len() {
            return Err(ParseError::NotEnoughTokens);
        }
        let idx = self.count;
        self.tokens[idx] = Token::new(self.pos, token_type, self.level);
        self.count += 1;
        Ok(idx)
    }

    fn seal(&mut self, idx: usize) {
        let len = self.pos - self.tokens[idx].start();
        self.tokens[idx].set_len(len);
    }

    /// Parse one element, dispatched on its first byte. On success the
    /// position is one past the element's last byte.
    fn element(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(ParseError::Incomplete),
            Some(b'"') => self.string(),
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b't') => self.literal(b"true", TokenType::True),
            Some(b'f') => self.literal(b"false", TokenType::False),
            Some(b'n') => self.literal(b"null", TokenType::Null),
            Some(b'-' | b'0'..=b'9') => self.number(),
            Some(b) => Err(reject(b, ParseError::BadFormat)),
        }
    }

    fn string(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some(b'"') {
            return Err(ParseError::Internal);
        }
        let idx = self.push_token(TokenType::String)?;
        self.pos += 1;
        loop {
            match self.take() {
                None => return Err(ParseError::Incomplete),
                Some(b'"') => break,
                Some(b'\\') => self.escape()?,
                Some(b) if b & 0x80 != 0 => return Err(ParseError::NoMultibyte),
                Some(b) if b < 0x20 => return Err(ParseError::BadFormat),
                Some(_) => {}
            }
        }
        self.seal(idx);
        Ok(())
    }

    /// Validate one escape sequence, the backslash already consumed. The
    /// enclosed bytes are not decoded.
    fn escape(&mut self) -> Result<(), ParseError> {
        match self.take() {
            None => Err(ParseError::Incomplete),
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => Ok(()),
            Some(b'u') => {
                for _ in 0..4 {
                    match self.take() {
                        None => return Err(ParseError::Incomplete),
                        Some(h) if is_hex_digit(h) => {}
                        Some(h) => return Err(reject(h, ParseError::BadFormat)),
                    }
                }
                Ok(())
            }
            Some(b) => Err(reject(b, ParseError::BadFormat)),
        }
    }

    fn number(&mut self) -> Result<(), ParseError> {
        if !matches!(self.peek(), Some(b'-' | b'0'..=b'9')) {
            return Err(ParseError::Internal);
        }
        let idx = self.push_token(TokenType::Integer)?;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            None => return Err(ParseError::Incomplete),
            Some(b'0') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b) if is_digit(b)) {
                    return Err(ParseError::BadFormat);
                }
            }
            Some(b) if is_digit(b) => self.digits(),
            Some(b) => return Err(reject(b, ParseError::BadFormat)),
        }

        let mut integer = true;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            // An empty fraction is malformed even at end of input.
            match self.peek() {
                Some(b) if is_digit(b) => self.digits(),
                Some(b) => return Err(reject(b, ParseError::BadFormat)),
                None => return Err(ParseError::BadFormat),
            }
            integer = false;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            // Same for an exponent marker with no digits.
            match self.peek() {
                Some(b) if is_digit(b) => self.digits(),
                Some(b) => return Err(reject(b, ParseError::BadFormat)),
                None => return Err(ParseError::BadFormat),
            }
            integer = false;
        }

        if !integer {
            self.tokens[idx].set_type(TokenType::Number);
        }
        self.seal(idx);
        Ok(())
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(b) if is_digit(b)) {
            self.pos += 1;
        }
    }

    fn object(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some(b'{') {
            return Err(ParseError::Internal);
        }
        let idx = self.push_token(TokenType::Object)?;
        self.pos += 1;
        self.level += 1;
        let mut first = true;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::Incomplete),
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => {
                    if !first {
                        if b != b',' {
                            return Err(reject(b, ParseError::BadFormat));
                        }
                        self.pos += 1;
                        self.skip_whitespace();
                    }
                }
            }
            match self.peek() {
                None => return Err(ParseError::Incomplete),
                Some(b'"') => self.string()?,
                Some(b) => return Err(reject(b, ParseError::BadFormat)),
            }
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::Incomplete),
                Some(b':') => self.pos += 1,
                Some(b) => return Err(reject(b, ParseError::BadFormat)),
            }
            self.skip_whitespace();
            self.element()?;
            first = false;
        }
        self.level -= 1;
        self.seal(idx);
        Ok(())
    }

    fn array(&mut self) -> Result<(), ParseError> {
        if self.peek() != Some(b'[') {
            return Err(ParseError::Internal);
        }
        let idx = self.push_token(TokenType::Array)?;
        self.pos += 1;
        self.level += 1;
        let mut first = true;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::Incomplete),
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => {
                    if !first {
                        if b != b',' {
                            return Err(reject(b, ParseError::BadFormat));
                        }
                        self.pos += 1;
                        self.skip_whitespace();
                    }
                }
            }
            self.element()?;
            first = false;
        }
        self.level -= 1;
        self.seal(idx);
        Ok(())
    }

    /// Match one of the three JSON keywords byte by byte.
    fn literal(&mut self, text: &'static [u8], token_type: TokenType) -> Result<(), ParseError> {
        if self.peek() != Some(text[0]) {
            return Err(ParseError::Internal);
        }
        let idx = self.push_token(token_type)?;
        for &expected in text {
            match self.take() {
                None => return Err(ParseError::Incomplete),
                Some(b) if b == expected => {}
                Some(b) => return Err(reject(b, ParseError::BadFormat)),
            }
        }
        self.seal(idx);
        Ok(())
    }
}
