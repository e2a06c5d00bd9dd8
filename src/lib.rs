//! # Flatjson
//!
//! An allocation-free JSON tokenizer and streaming emitter for constrained
//! environments.
//!
//! Both halves share one philosophy: the caller owns every byte of working
//! memory. The tokenizer scans a byte slice once and describes it in a
//! caller-supplied token array; the emitter writes a byte at a time into a
//! caller-supplied sink, tracking nesting on a caller-supplied level stack.
//! Nothing is copied, nothing is boxed, and neither half ever touches the
//! heap.
//!
//! ## Tokenizing
//!
//! [`parse`] validates a complete JSON text and fills the token array in
//! preorder: each container token comes before its children. Tokens are
//! sub-ranges of the input, two 32-bit words each, and stay meaningful
//! for as long as the input buffer lives.
//!
//! ```
//! use flatjson::{parse, Token, TokenType};
//!
//! let json = br#"{ "a": [1, 2.5], "b": true }"#;
//! let mut tokens = [Token::default(); 16];
//!
//! let count = parse(json, &mut tokens).unwrap();
//! assert_eq!(count, 7);
//! assert_eq!(tokens[0].token_type(), TokenType::Object);
//! assert_eq!(tokens[2].token_type(), TokenType::Array);
//! assert_eq!(tokens[3].int_value::<i64>(json).unwrap(), 1);
//! assert_eq!(tokens[4].float_value(json).unwrap(), 2.5);
//! ```
//!
//! Input must be ASCII and at most 65535 bytes; see
//! [`ParseError`](ParseError) for how malformed input is classified.
//!
//! ## Navigating
//!
//! The token array is a tree flattened in preorder. [`TokenTree`] walks it
//! without any auxiliary storage: parents by a backward scan, siblings by a
//! forward scan that never escapes the enclosing container.
//!
//! ```
//! use flatjson::{parse, Token, TokenTree};
//!
//! let json = br#"{ "a": [1, 2.5], "b": true }"#;
//! let mut tokens = [Token::default(); 16];
//! let count = parse(json, &mut tokens).unwrap();
//!
//! let tree = TokenTree::new(&tokens[..count]);
//! let a = tree.lookup(0, "a", json).unwrap();
//! let first = tree.child(a).unwrap();
//! assert_eq!(tree.parent(first), Some(a));
//! assert_eq!(tree.children(a).count(), 2);
//! ```
//!
//! ## Emitting
//!
//! [`JsonEmitter`] streams well-formed JSON into any [`sink::JsonSink`].
//! Separators are derived from per-level item counts, so values can be
//! pushed in a single chain without bookkeeping on the caller's side.
//!
//! ```
//! use flatjson::{JsonEmitter, Level};
//! use flatjson::sink::SliceJsonSink;
//!
//! let mut buf = [0u8; 64];
//! let mut levels = [Level::default(); 4];
//! let mut e = JsonEmitter::new(SliceJsonSink::new(&mut buf), &mut levels);
//!
//! e.object_open()
//!     .key_string("name", "Elvis")
//!     .key_array_open("hits")
//!     .integer(31)
//!     .array_close()
//!     .object_close();
//!
//! assert_eq!(e.sink.as_bytes(), br#"{"name":"Elvis","hits":[31]}"#);
//! ```
//!
//! ## Parsing into a Serde JSON Value
//!
//! For testing and compatibility reasons, Flatjson can parse a byte slice
//! into a [Serde JSON](https://github.com/serde-rs/json) Value. Heads up:
//! you need to enable the `serde_json` feature for this.
//!
//! ```ignore
//! use flatjson::serde_json::from_slice;
//!
//! let json = br#"{"name": "Elvis"}"#;
//! let value = from_slice(json).unwrap();
//!
//! assert!(value.is_object());
//! assert_eq!(value["name"], "Elvis");
//! ```
//!
//! However, if you find yourself doing this, your data fits into memory and
//! a heap is available, so you're most likely better off using Serde JSON
//! directly.
mod chars;
mod emitter;
mod error;
mod options;
pub mod sink;
mod token;
mod tokenizer;
mod tree;

#[cfg(feature = "serde_json")]
pub mod serde_json;

pub use emitter::{JsonEmitter, Level};
pub use error::ParseError;
pub use options::{TokenizerOptions, TokenizerOptionsBuilder};
pub use token::{
    InvalidFloatValueError, InvalidIntValueError, InvalidStringValueError, Token, TokenType,
    MAX_INPUT_LEN,
};
pub use tokenizer::{parse, parse_with_options};
pub use tree::{Children, TokenTree};
