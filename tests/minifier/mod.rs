use flatjson::sink::JsonSink;
use flatjson::{parse, JsonEmitter, Level, ParseError, Token, TokenTree, TokenType};

/// Demonstrates how the tokenizer and the emitter compose: parse a JSON
/// text and write it back without insignificant whitespace. Primitive
/// tokens are copied verbatim through the emitter's `literal` operation, so
/// escape sequences and number spellings survive untouched.
pub fn minify(input: &[u8]) -> Result<String, ParseError> {
    let mut tokens = [Token::default(); 256];
    let count = parse(input, &mut tokens)?;
    let tree = TokenTree::new(&tokens[..count]);

    let mut levels = [Level::default(); 32];
    let mut e = JsonEmitter::new(Vec::new(), &mut levels);
    emit_element(&tree, 0, input, &mut e);
    Ok(String::from_utf8(e.sink).expect("emitter output is 7-bit clean"))
}

fn emit_element<S>(tree: &TokenTree, i: usize, input: &[u8], e: &mut JsonEmitter<S>)
where
    S: JsonSink,
{
    let token = tree.get(i).unwrap();
    match token.token_type() {
        TokenType::Object => {
            e.object_open();
            // keys and values alternate; the separator state machine
            // turns that alternation into ':' and ','
            for child in tree.children(i) {
                emit_element(tree, child, input, e);
            }
            e.object_close();
        }
        TokenType::Array => {
            e.array_open();
            for child in tree.children(i) {
                emit_element(tree, child, input, e);
            }
            e.array_close();
        }
        _ => {
            e.literal(token.text(input));
        }
    }
}
