use flatjson::{parse, Token, TokenTree};

#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        let mut tokens = [Token::default(); 1024];
        if let Ok(count) = parse(data, &mut tokens) {
            // exercise the navigator over whatever parsed
            let tree = TokenTree::new(&tokens[..count]);
            let mut i = 0;
            while let Some(n) = tree.next(i) {
                tree.parent(n);
                tree.next_sibling(n);
                i = n;
            }
        }
    });
}
