use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::tree::TokenTree;
use crate::{parse, ParseError, Token, TokenType};

/// An error that can happen when converting a JSON text into a Serde JSON
/// [`Value`]
#[derive(Error, Debug)]
pub enum FromSliceError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// An escape sequence that passed syntactic validation could not be
    /// decoded, e.g. an unpaired UTF-16 surrogate.
    #[error("string contains an undecodable escape sequence")]
    InvalidEscape,

    /// A number token could not be represented as a serde_json number.
    #[error("number cannot be represented")]
    InvalidNumber,
}

/// Parse a byte slice into a Serde JSON [`Value`].
///
/// This is the hosted convenience layer on top of the tokenizer: it
/// allocates token storage, decodes string escapes (the tokenizer leaves
/// them untouched) and converts numeric text. The input restrictions of the
/// tokenizer still apply; in particular, non-ASCII bytes are rejected, so
/// non-ASCII characters can only enter through `\uXXXX` escapes.
///
/// ```
/// use flatjson::serde_json::from_slice;
///
/// let json = br#"{"name": "Elvis"}"#;
/// let value = from_slice(json).unwrap();
///
/// assert!(value.is_object());
/// assert_eq!(value["name"], "Elvis");
/// ```
pub fn from_slice(v: &[u8]) -> Result<Value, FromSliceError> {
    // one-byte elements separated by one byte is the densest packing
    let mut tokens = vec![Token::default(); v.len() / 2 + 1];
    let count = parse(v, &mut tokens)?;
    let tree = TokenTree::new(&tokens[..count]);
    to_value(&tree, 0, v)
}

fn to_value(tree: &TokenTree, i: usize, input: &[u8]) -> Result<Value, FromSliceError> {
    let token = tree.get(i).unwrap();
    match token.token_type() {
        TokenType::Object => {
            let mut map = Map::new();
            let mut child = tree.child(i);
            while let Some(key_idx) = child {
                let key = unescape(raw_str(tree, key_idx, input))?;
                // in preorder the value immediately follows its key
                let value_idx = tree.next(key_idx).unwrap();
                map.insert(key, to_value(tree, value_idx, input)?);
                child = tree.next_sibling(value_idx);
            }
            Ok(Value::Object(map))
        }

        TokenType::Array => {
            let mut array = vec![];
            for child in tree.children(i) {
                array.push(to_value(tree, child, input)?);
            }
            Ok(Value::Array(array))
        }

        TokenType::String => Ok(Value::String(unescape(raw_str(tree, i, input))?)),

        TokenType::Integer => {
            // i64 first, f64 for magnitudes beyond it
            if let Ok(n) = token.int_value::<i64>(input) {
                Ok(Value::Number(Number::from(n)))
            } else {
                let f = token
                    .float_value(input)
                    .map_err(|_| FromSliceError::InvalidNumber)?;
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or(FromSliceError::InvalidNumber)
            }
        }

        TokenType::Number => {
            let f = token
                .float_value(input)
                .map_err(|_| FromSliceError::InvalidNumber)?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or(FromSliceError::InvalidNumber)
        }

        TokenType::True => Ok(Value::Bool(true)),
        TokenType::False => Ok(Value::Bool(false)),
        TokenType::Null => Ok(Value::Null),
    }
}

fn raw_str<'a>(tree: &TokenTree, i: usize, input: &'a [u8]) -> &'a str {
    // string token text is validated ASCII, sans quotes
    tree.get(i)
        .and_then(|t| t.str_value(input).ok())
        .unwrap_or_default()
}

/// Decode the escape sequences the tokenizer only validated. `\uXXXX`
/// escapes in the UTF-16 surrogate range must come in high/low pairs and
/// are combined into one character.
fn unescape(s: &str) -> Result<String, FromSliceError> {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b as char);
            i += 1;
            continue;
        }
        // the tokenizer guarantees a complete, well-formed escape here
        i += 1;
        match bytes[i] {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let high = hex4(&bytes[i + 1..i + 5])?;
                i += 4;
                if (0xDC00..=0xDFFF).contains(&high) {
                    // a low surrogate with no preceding high surrogate
                    return Err(FromSliceError::InvalidEscape);
                }
                let code = if (0xD800..=0xDBFF).contains(&high) {
                    if bytes.len() < i + 7 || &bytes[i + 1..i + 3] != b"\\u" {
                        return Err(FromSliceError::InvalidEscape);
                    }
                    let low = hex4(&bytes[i + 3..i + 7])?;
                    i += 6;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(FromSliceError::InvalidEscape);
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                out.push(char::from_u32(code).ok_or(FromSliceError::InvalidEscape)?);
            }
            _ => return Err(FromSliceError::InvalidEscape),
        }
        i += 1;
    }
    Ok(out)
}

fn hex4(digits: &[u8]) -> Result<u32, FromSliceError> {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| u32::from_str_radix(s, 16).ok())
        .ok_or(FromSliceError::InvalidEscape)
}

#[cfg(test)]
mod test {
    use crate::serde_json::{from_slice, FromSliceError};
    use crate::ParseError;
    use serde_json::{from_slice as serde_from_slice, Value};

    fn assert_matches_serde(json: &[u8]) {
        assert_eq!(
            serde_from_slice::<Value>(json).unwrap(),
            from_slice(json).unwrap(),
            "{}",
            String::from_utf8_lossy(json)
        );
    }

    /// Test that an empty object is parsed correctly
    #[test]
    fn empty_object() {
        assert_matches_serde(br#"{}"#);
    }

    /// Test that a simple object is parsed correctly
    #[test]
    fn simple_object() {
        assert_matches_serde(br#"{"name": "Elvis"}"#);
    }

    /// Test that arrays and primitives are parsed correctly
    #[test]
    fn mixed_array() {
        assert_matches_serde(br#"["Elvis", 132, "Max", 80.67, true, false, null]"#);
    }

    /// Test that top-level primitives are parsed correctly
    #[test]
    fn top_level_primitives() {
        assert_matches_serde(b"42");
        assert_matches_serde(b"-1.5e3");
        assert_matches_serde(b"\"str\"");
        assert_matches_serde(b"null");
    }

    /// Test that embedded objects are parsed correctly
    #[test]
    fn embedded_objects() {
        assert_matches_serde(
            br#"{
            "name": "Elvis",
            "address": {"street": "Graceland", "city": "Memphis"},
            "albums": [
                "Elvis Presley",
                "Elvis",
                {
                    "title": "His Hand in Mine",
                    "year": 1960
                }
            ]
        }"#,
        );
    }

    /// Test that escape sequences are decoded like serde_json decodes them
    #[test]
    fn escapes_are_decoded() {
        assert_matches_serde(br#""a\"b\\c\/d\b\f\n\r\t""#);
        assert_matches_serde(br#""A\u00e9 \u20ac""#);
    }

    /// Test that UTF-16 surrogate pairs are combined
    #[test]
    fn surrogate_pairs() {
        assert_matches_serde(br#""\ud83d\ude00""#);
        assert_matches_serde(br#"{"emoji": "\ud83d\udc4d"}"#);
    }

    /// Test that unpaired surrogates are rejected
    #[test]
    fn lone_surrogates_are_rejected() {
        assert!(matches!(
            from_slice(br#""\ud800""#),
            Err(FromSliceError::InvalidEscape)
        ));
        assert!(matches!(
            from_slice(br#""\ude00""#),
            Err(FromSliceError::InvalidEscape)
        ));
        assert!(matches!(
            from_slice(br#""\ud800x""#),
            Err(FromSliceError::InvalidEscape)
        ));
    }

    /// Test that integers beyond i64 fall back to floats
    #[test]
    fn huge_integers_fall_back_to_float() {
        let v = from_slice(b"123456789012345678901234567890").unwrap();
        assert!(v.as_f64().unwrap() > 1e29);
    }

    /// Test that tokenizer errors pass through
    #[test]
    fn parse_errors_pass_through() {
        assert!(matches!(
            from_slice(b"[1,"),
            Err(FromSliceError::Parse(ParseError::Incomplete))
        ));
        assert!(matches!(
            from_slice("\"é\"".as_bytes()),
            Err(FromSliceError::Parse(ParseError::NoMultibyte))
        ));
    }
}
