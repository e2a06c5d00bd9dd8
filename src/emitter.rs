use crate::chars::HEX_LOWER;
use crate::sink::JsonSink;

/// One record on the emitter's caller-owned level stack.
///
/// `item_count` is the number of immediate children already emitted at this
/// level; `is_object` selects the `:`/`,` alternation for object members.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    item_count: u32,
    is_object: bool,
}

/// A streaming JSON writer.
///
/// Bytes are pushed into the caller-supplied [`JsonSink`] one at a time, in
/// the exact order of the emitted text. Nesting state lives on a
/// caller-owned stack of [`Level`] records; nothing is allocated. The
/// output is valid JSON iff every opened container has been closed and, in
/// objects, the caller alternates keys and values.
///
/// No operation can fail. Opening a container beyond the stack's capacity
/// emits the bracket but does not push a level; closing at depth 0 emits
/// the bracket and keeps the depth. Both produce output that no longer
/// balances, but never corrupt memory. The emitter does not police key /
/// value alternation inside objects either; violating it produces invalid
/// JSON without raising.
///
/// ```
/// use flatjson::{JsonEmitter, Level};
///
/// let mut levels = [Level::default(); 8];
/// let mut e = JsonEmitter::new(Vec::new(), &mut levels);
/// e.object_open()
///     .key_string("name", "Elvis")
///     .key_array_open("hits")
///     .integer(31)
///     .number(18.0)
///     .array_close()
///     .object_close();
///
/// assert_eq!(e.sink, br#"{"name":"Elvis","hits":[31,18]}"#.to_vec());
/// ```
pub struct JsonEmitter<'a, S> {
    pub sink: S,
    levels: &'a mut [Level],
    depth: usize,
}

impl<'a, S> JsonEmitter<'a, S>
where
    S: JsonSink,
{
    /// Create a new emitter writing to `sink`, with nesting state on
    /// `levels`. The stack's length bounds the nesting depth the emitter
    /// can track.
    ///
    /// # Panics
    ///
    /// Panics if `levels` is empty; the top level needs one record.
    pub fn new(sink: S, levels: &'a mut [Level]) -> Self {
        assert!(!levels.is_empty(), "level stack must hold at least one record");
        levels[0] = Level::default();
        JsonEmitter {
            sink,
            levels,
            depth: 0,
        }
    }

    /// Forget all nesting state and start over at depth 0. The sink is
    /// left untouched.
    pub fn reset(&mut self) {
        self.depth = 0;
        self.levels[0] = Level::default();
    }

    /// The current nesting depth. 0 outside all containers.
    pub fn level(&self) -> usize {
        self.depth
    }

    /// The number of items already emitted at the current level. Inside an
    /// object, keys and values count separately.
    pub fn item_count(&self) -> u32 {
        self.levels[self.depth].item_count
    }

    /// Emit the separator a new item needs at the current level, and count
    /// it. In an object, items alternate key, value, key, and so on: item 0
    /// takes no prefix, odd items take `:` and later even items take `,`.
    fn begin_item(&mut self) {
        let level = self.levels[self.depth];
        if level.item_count > 0 {
            if level.is_object && level.item_count % 2 == 1 {
                self.sink.put(b':');
            } else {
                self.sink.put(b',');
            }
        }
        self.levels[self.depth].item_count += 1;
    }

    fn open(&mut self, bracket: u8, is_object: bool) {
        self.begin_item();
        self.sink.put(bracket);
        if self.depth + 1 < self.levels.len() {
            self.depth += 1;
            self.levels[self.depth] = Level {
                item_count: 0,
                is_object,
            };
        }
    }

    fn close(&mut self, bracket: u8) {
        self.sink.put(bracket);
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// Open an object: emit `{` and push a level.
    pub fn object_open(&mut self) -> &mut Self {
        self.open(b'{', true);
        self
    }

    /// Close the current object: emit `}` and pop.
    pub fn object_close(&mut self) -> &mut Self {
        self.close(b'}');
        self
    }

    /// Open an array: emit `[` and push a level.
    pub fn array_open(&mut self) -> &mut Self {
        self.open(b'[', false);
        self
    }

    /// Close the current array: emit `]` and pop.
    pub fn array_close(&mut self) -> &mut Self {
        self.close(b']');
        self
    }

    /// Emit a quoted string. Bytes below 0x20 and at or above 0x7F become
    /// `\uXXXX` escapes, `"` and `\` are backslash-escaped, everything else
    /// is written verbatim; the output is 7-bit clean.
    pub fn string(&mut self, s: &str) -> &mut Self {
        self.bytes(s.as_bytes())
    }

    /// Like [`string`](Self::string), for a raw byte buffer. The buffer
    /// may contain NUL and other control bytes; they are escaped like any
    /// other byte.
    pub fn bytes(&mut self, buf: &[u8]) -> &mut Self {
        self.begin_item();
        self.sink.put(b'"');
        for &b in buf {
            self.escape(b);
        }
        self.sink.put(b'"');
        self
    }

    fn escape(&mut self, b: u8) {
        match b {
            b'"' | b'\\' => {
                self.sink.put(b'\\');
                self.sink.put(b);
            }
            0x20..=0x7E => self.sink.put(b),
            _ => {
                self.sink.put(b'\\');
                self.sink.put(b'u');
                self.sink.put(b'0');
                self.sink.put(b'0');
                self.sink.put(HEX_LOWER[(b >> 4) as usize]);
                self.sink.put(HEX_LOWER[(b & 0xF) as usize]);
            }
        }
    }

    /// Emit a signed decimal integer.
    pub fn integer(&mut self, v: i64) -> &mut Self {
        self.begin_item();
        let mut buf = itoa::Buffer::new();
        self.raw(buf.format(v).as_bytes());
        self
    }

    /// Emit a number. A value that round-trips through `i64` is written as
    /// an integer (`3.0` becomes `3`); anything else is written as the
    /// shortest decimal that reproduces it. Non-finite values have no JSON
    /// form and are written as `null`.
    pub fn number(&mut self, v: f64) -> &mut Self {
        if !v.is_finite() {
            return self.null();
        }
        if v as i64 as f64 == v {
            return self.integer(v as i64);
        }
        self.begin_item();
        let mut buf = ryu::Buffer::new();
        self.raw(buf.format_finite(v).as_bytes());
        self
    }

    /// Emit `true` or `false`.
    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.literal(if v { b"true" } else { b"false" })
    }

    /// Emit `null`.
    pub fn null(&mut self) -> &mut Self {
        self.literal(b"null")
    }

    /// Emit caller-supplied bytes verbatim, with no quoting and no escaping. The
    /// literal still counts as one item at the current level, so it
    /// participates in separator sequencing. The caller is responsible for
    /// the bytes being valid JSON.
    pub fn literal(&mut self, raw: &[u8]) -> &mut Self {
        self.begin_item();
        self.raw(raw);
        self
    }

    fn raw(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.sink.put(b);
        }
    }

    /// Emit a key and a string value.
    pub fn key_string(&mut self, key: &str, v: &str) -> &mut Self {
        self.string(key).string(v)
    }

    /// Emit a key and a string value given as raw bytes.
    pub fn key_bytes(&mut self, key: &str, v: &[u8]) -> &mut Self {
        self.string(key).bytes(v)
    }

    /// Emit a key and an integer value.
    pub fn key_integer(&mut self, key: &str, v: i64) -> &mut Self {
        self.string(key).integer(v)
    }

    /// Emit a key and a number value.
    pub fn key_number(&mut self, key: &str, v: f64) -> &mut Self {
        self.string(key).number(v)
    }

    /// Emit a key and a boolean value.
    pub fn key_bool(&mut self, key: &str, v: bool) -> &mut Self {
        self.string(key).bool(v)
    }

    /// Emit a key and `null`.
    pub fn key_null(&mut self, key: &str) -> &mut Self {
        self.string(key).null()
    }

    /// Emit a key and caller-supplied raw bytes.
    pub fn key_literal(&mut self, key: &str, raw: &[u8]) -> &mut Self {
        self.string(key).literal(raw)
    }

    /// Emit a key and open an object as its value.
    pub fn key_object_open(&mut self, key: &str) -> &mut Self {
        self.string(key).object_open()
    }

    /// Emit a key and open an array as its value.
    pub fn key_array_open(&mut self, key: &str) -> &mut Self {
        self.string(key).array_open()
    }
}

#[cfg(test)]
mod test {
    use super::{JsonEmitter, Level};

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut JsonEmitter<Vec<u8>>),
    {
        let mut levels = [Level::default(); 8];
        let mut e = JsonEmitter::new(Vec::new(), &mut levels);
        f(&mut e);
        String::from_utf8(e.sink).unwrap()
    }

    #[test]
    fn empty_containers() {
        assert_eq!(emit(|e| { e.object_open().object_close(); }), "{}");
        assert_eq!(emit(|e| { e.array_open().array_close(); }), "[]");
    }

    #[test]
    fn array_separators() {
        let out = emit(|e| {
            e.array_open().integer(1).integer(2).integer(3).array_close();
        });
        assert_eq!(out, "[1,2,3]");
    }

    #[test]
    fn object_alternates_colon_and_comma() {
        let out = emit(|e| {
            e.object_open()
                .key_integer("a", 1)
                .key_bool("b", false)
                .key_null("c")
                .object_close();
        });
        assert_eq!(out, r#"{"a":1,"b":false,"c":null}"#);
    }

    #[test]
    fn mixed_document() {
        let out = emit(|e| {
            e.object_open();
            e.key_integer("a", 111);
            e.key_array_open("b");
            e.number(22.2).integer(0).number(3.0);
            e.array_close();
            e.key_object_open("c");
            e.object_close();
            e.object_close();
        });
        assert_eq!(out, r#"{"a":111,"b":[22.2,0,3],"c":{}}"#);
    }

    #[test]
    fn number_integral_round_trip() {
        assert_eq!(emit(|e| { e.number(3.0); }), "3");
        assert_eq!(emit(|e| { e.number(-4.0); }), "-4");
        assert_eq!(emit(|e| { e.number(0.5); }), "0.5");
        assert_eq!(emit(|e| { e.number(-1.25); }), "-1.25");
        assert_eq!(emit(|e| { e.integer(i64::MIN); }), i64::MIN.to_string());
    }

    #[test]
    fn non_finite_becomes_null() {
        assert_eq!(emit(|e| { e.number(f64::NAN); }), "null");
        assert_eq!(emit(|e| { e.number(f64::INFINITY); }), "null");
        assert_eq!(emit(|e| { e.number(f64::NEG_INFINITY); }), "null");
    }

    #[test]
    fn string_escaping() {
        assert_eq!(emit(|e| { e.string("a\"b"); }), r#""a\"b""#);
        assert_eq!(emit(|e| { e.string("a\\b"); }), r#""a\\b""#);
        assert_eq!(emit(|e| { e.string("\x01"); }), r#""\u0001""#);
        assert_eq!(emit(|e| { e.string("tab\there"); }), r#""tab\u0009here""#);
        assert_eq!(emit(|e| { e.bytes(b"\x00"); }), r#""\u0000""#);
    }

    #[test]
    fn high_bytes_escape_to_seven_bit_output() {
        for b in 0x7Fu8..=0xFF {
            let out = emit(|e| {
                e.bytes(&[b]);
            });
            assert_eq!(out, format!("\"\\u{:04x}\"", b));
            assert!(out.is_ascii());
        }
    }

    #[test]
    fn literal_is_verbatim_but_separated() {
        let out = emit(|e| {
            e.array_open()
                .literal(b"1e99")
                .key_literal("x", b"{}")
                .array_close();
        });
        // key_literal in an array is unusual but sequencing still applies
        assert_eq!(out, r#"[1e99,"x",{}]"#);
    }

    #[test]
    fn multiple_top_level_values_are_comma_separated() {
        let out = emit(|e| {
            e.integer(1).integer(2);
        });
        assert_eq!(out, "1,2");
    }

    #[test]
    fn depth_overflow_is_silently_truncated() {
        let mut levels = [Level::default(); 2];
        let mut e = JsonEmitter::new(Vec::new(), &mut levels);
        e.array_open().array_open().integer(1).array_close().array_close();
        // The second open emitted its bracket but never pushed, so the
        // integer was counted on the stack's deepest level, after the
        // bracket. Output degrades, memory does not.
        assert_eq!(e.level(), 0);
        assert_eq!(String::from_utf8(e.sink).unwrap(), "[[,1]]");
    }

    #[test]
    fn close_at_depth_zero_does_not_underflow() {
        let out = emit(|e| {
            e.object_open().object_close().object_close();
        });
        assert_eq!(out, "{}}");
    }

    #[test]
    fn introspection_and_reset() {
        let mut levels = [Level::default(); 4];
        let mut e = JsonEmitter::new(Vec::new(), &mut levels);
        assert_eq!(e.level(), 0);
        e.object_open().key_integer("a", 1);
        assert_eq!(e.level(), 1);
        assert_eq!(e.item_count(), 2);
        e.reset();
        assert_eq!(e.level(), 0);
        assert_eq!(e.item_count(), 0);
        e.integer(7);
        assert_eq!(String::from_utf8(e.sink).unwrap(), r#"{"a":17"#);
    }
}
