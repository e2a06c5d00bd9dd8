use crate::token::{Token, TokenType};

/// A view of a preorder token array as a tree.
///
/// All operations assume the slice is exactly the prefix filled by a
/// successful [`parse`](crate::parse), i.e. `&tokens[..count]`. Tokens
/// carry no parent pointers; [`parent`](Self::parent), [`root`](Self::root)
/// and the sibling walks scan linearly through the array, which keeps the
/// token representation at two words per element.
///
/// ```
/// use flatjson::{parse, Token, TokenTree, TokenType};
///
/// let json = br#"{"a": [1, 2], "b": null}"#;
/// let mut tokens = [Token::default(); 8];
/// let count = parse(json, &mut tokens).unwrap();
/// let tree = TokenTree::new(&tokens[..count]);
///
/// let a = tree.lookup(0, "a", json).unwrap();
/// assert_eq!(tree.get(a).unwrap().token_type(), TokenType::Array);
/// assert_eq!(tree.children(a).count(), 2);
/// ```
pub struct TokenTree<'t> {
    tokens: &'t [Token],
}

impl<'t> TokenTree<'t> {
    /// Wrap a parsed token slice.
    pub fn new(tokens: &'t [Token]) -> Self {
        TokenTree { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// `true` iff `i` is the physically first token. The grammar admits
    /// exactly one top-level element, so this is also the only token at
    /// level 0.
    pub fn is_first(&self, i: usize) -> bool {
        i == 0
    }

    /// The root of the tree: the first token, if any.
    pub fn root(&self) -> Option<usize> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// The physical predecessor, `None` for the first token.
    pub fn prev(&self, i: usize) -> Option<usize> {
        if i == 0 {
            None
        } else {
            Some(i - 1)
        }
    }

    /// The physical successor, `None` for the token carrying the last
    /// marker.
    pub fn next(&self, i: usize) -> Option<usize> {
        if self.tokens[i].is_last() {
            None
        } else {
            Some(i + 1)
        }
    }

    /// The nearest predecessor one level shallower; `None` for the root.
    pub fn parent(&self, i: usize) -> Option<usize> {
        let level = self.tokens[i].level();
        if level == 0 {
            return None;
        }
        let mut j = i;
        while let Some(k) = self.prev(j) {
            if self.tokens[k].level() == level - 1 {
                return Some(k);
            }
            j = k;
        }
        None
    }

    /// The first child of a container: the successor, iff it is strictly
    /// deeper.
    pub fn child(&self, i: usize) -> Option<usize> {
        let level = self.tokens[i].level();
        self.next(i).filter(|&k| self.tokens[k].level() > level)
    }

    /// The next token at the same level, not crossing the end of the
    /// enclosing container.
    pub fn next_sibling(&self, i: usize) -> Option<usize> {
        let level = self.tokens[i].level();
        let mut j = i;
        while let Some(k) = self.next(j) {
            if self.tokens[k].level() < level {
                return None;
            }
            if self.tokens[k].level() == level {
                return Some(k);
            }
            j = k;
        }
        None
    }

    /// The previous token at the same level, not crossing the start of the
    /// enclosing container.
    pub fn prev_sibling(&self, i: usize) -> Option<usize> {
        let level = self.tokens[i].level();
        let mut j = i;
        while let Some(k) = self.prev(j) {
            if self.tokens[k].level() < level {
                return None;
            }
            if self.tokens[k].level() == level {
                return Some(k);
            }
            j = k;
        }
        None
    }

    /// Iterate over the direct children of a container token. For an
    /// object this yields keys and values alternately, starting with the
    /// first key.
    pub fn children(&self, i: usize) -> Children<'_, 't> {
        Children {
            tree: self,
            next: self.child(i),
        }
    }

    /// Find the value for `key` among the members of the object at `i`.
    /// Returns `None` if `i` is not an object token or no key matches.
    ///
    /// The comparison is lexical: the bytes between the key's quotes are
    /// compared against `key` without decoding escapes. With duplicate
    /// keys, the first match wins.
    pub fn lookup(&self, i: usize, key: &str, input: &[u8]) -> Option<usize> {
        if self.tokens[i].token_type() != TokenType::Object {
            return None;
        }
        let mut k = self.child(i);
        while let Some(key_idx) = k {
            if self.tokens[key_idx].str_value(input).ok()? == key {
                return self.next(key_idx);
            }
            // skip over the value, to the next key
            let value_idx = self.next_sibling(key_idx)?;
            k = self.next_sibling(value_idx);
        }
        None
    }
}

/// Iterator over the direct children of a container, created by
/// [`TokenTree::children`].
pub struct Children<'a, 't> {
    tree: &'a TokenTree<'t>,
    next: Option<usize>,
}

impl<'a, 't> Iterator for Children<'a, 't> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let i = self.next?;
        self.next = self.tree.next_sibling(i);
        Some(i)
    }
}
