use crate::{Node, ParseError, Tree};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Token<'s> {
    Open,
    Close,
    Atom(&'s str),
}

/// Splits bracket notation into parentheses and whitespace-delimited atoms.
struct Lexer<'s> {
    text: &'s str,
    offset: usize,
}

impl<'s> Lexer<'s> {
    fn new(text: &'s str) -> Self {
        Lexer { text, offset: 0 }
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = (usize, Token<'s>);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.offset..];
        let start = self.offset + rest.find(|c: char| !c.is_whitespace())?;
        let rest = &self.text[start..];

        let (token, len) = match rest.as_bytes()[0] {
            b'(' => (Token::Open, 1),
            b')' => (Token::Close, 1),
            _ => {
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                    .unwrap_or(rest.len());
                (Token::Atom(&rest[..len]), len)
            }
        };

        self.offset = start + len;
        Some((start, token))
    }
}

/// Parses a single root expression, e.g. `(S (NP the dog) (VP runs))`.
///
/// A bare atom is a leaf, so `(NP the dog)` and `(NP (the) (dog))` denote the same tree.
impl FromStr for Node {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lexer = Lexer::new(text);
        let mut open: Vec<(&str, Vec<Node>)> = Vec::new();
        let mut root = None;

        while let Some((offset, token)) = lexer.next() {
            if root.is_some() {
                return Err(ParseError::TrailingInput { offset });
            }

            let node = match token {
                Token::Open => {
                    match lexer.next() {
                        Some((_, Token::Atom(label))) => open.push((label, Vec::new())),
                        Some((offset, _)) => return Err(ParseError::MissingLabel { offset }),
                        None => return Err(ParseError::Unclosed { open: open.len() + 1 }),
                    }

                    continue;
                }

                Token::Close => match open.pop() {
                    Some((label, children)) => Node::new(label, children),
                    None => return Err(ParseError::UnexpectedClose { offset }),
                },

                Token::Atom(label) => Node::leaf(label),
            };

            match open.last_mut() {
                Some((_, siblings)) => siblings.push(node),
                None => root = Some(node),
            }
        }

        if !open.is_empty() {
            return Err(ParseError::Unclosed { open: open.len() });
        }

        root.ok_or(ParseError::Empty)
    }
}

/// Parses bracket notation into a [Tree].
///
/// Blank input is the empty tree.
///
/// # Example
///
/// ```rust
/// use ted_engine::parse;
///
/// assert_eq!(parse("(S (NP the dog) (VP runs))")?.len(), 6);
/// assert!(parse("")?.is_empty());
/// assert!(parse("(S (NP)").is_err());
/// # Ok::<(), ted_engine::ParseError>(())
/// ```
pub fn parse(text: &str) -> Result<Tree, ParseError> {
    if text.trim().is_empty() {
        Ok(Tree::empty())
    } else {
        Ok(Tree::build(&text.parse::<Node>()?))
    }
}

impl FromStr for Tree {
    type Err = ParseError;

    #[inline]
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse(text)
    }
}
