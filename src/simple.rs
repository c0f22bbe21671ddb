//! A fast approximation that ignores subtree boundaries.
//!
//! Each tree is serialized in preorder as one token per node, the node's label tagged with its
//! number of children, which is enough to reconstruct the tree. The distance is the unit cost
//! Levenshtein distance between the two token sequences.
//!
//! This is *not* the tree edit distance: it may overestimate it, since moving a subtree across a
//! bracket boundary changes many arities, and it may underestimate it, since a sequence alignment
//! may match tokens that no tree mapping could match together. It is symmetric, zero between
//! identical trees, and equal to the size of the other tree against the empty tree.

use crate::Tree;
use std::fmt::{self, Display, Formatter};

/// A node in the linear serialization of a tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token<'t> {
    pub label: &'t str,
    pub arity: usize,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.label, self.arity)
    }
}

/// Serializes the tree in preorder.
pub fn tokens(t: &Tree) -> impl ExactSizeIterator<Item = Token<'_>> + '_ {
    t.preorder().iter().map(move |&i| Token {
        label: t.label(i),
        arity: t.children(i).len(),
    })
}

/// Unit cost edit distance between two sequences, keeping a single row of the table.
fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> u64 {
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };

    let mut row: Vec<u64> = (0..=b.len() as u64).collect();
    for (i, x) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i as u64 + 1;

        for (j, y) in b.iter().enumerate() {
            let substitute = diagonal + u64::from(x != y);
            let delete = row[j + 1] + 1;
            let insert = row[j] + 1;

            diagonal = row[j + 1];
            row[j + 1] = substitute.min(delete).min(insert);
        }
    }

    row[b.len()]
}

/// Approximates the tree edit distance between `a` and `b`.
///
/// # Example
///
/// ```rust
/// use ted_engine::{parse, simple};
///
/// let a = parse("(S (NP the dog) (VP runs))")?;
/// let b = parse("(S (NP the cat) (VP runs))")?;
/// assert_eq!(simple::distance(&a, &b), 1);
/// # Ok::<(), ted_engine::ParseError>(())
/// ```
pub fn distance(a: &Tree, b: &Tree) -> u64 {
    let a: Vec<_> = tokens(a).collect();
    let b: Vec<_> = tokens(b).collect();
    levenshtein(&a, &b)
}
