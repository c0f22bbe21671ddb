use derive_more::From;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// An abstraction for a recursive, ordered, labeled tree.
///
/// Implement this for your own parse tree type to feed it to [Tree::build][crate::Tree::build]
/// without converting it to a [Node] first.
///
/// # Example
///
/// ```rust
/// use ted_engine::{Hierarchy, Tree};
///
/// struct Constituent {
///     tag: String,
///     parts: Vec<Constituent>,
/// }
///
/// impl<'t> Hierarchy<'t> for Constituent {
///     type Children = &'t [Self];
///
///     fn label(&'t self) -> &'t str {
///         &self.tag
///     }
///
///     fn children(&'t self) -> Self::Children {
///         &self.parts
///     }
/// }
///
/// let np = Constituent { tag: "NP".into(), parts: vec![] };
/// let s = Constituent { tag: "S".into(), parts: vec![np] };
///
/// assert_eq!(Tree::build(&s).len(), 2);
/// ```
pub trait Hierarchy<'t>: 't {
    /// A type that can iterate over this node's [children][Hierarchy::children], in order.
    type Children: IntoIterator<Item = &'t Self>;

    /// Returns this node's label.
    fn label(&'t self) -> &'t str;

    /// Returns this node's immediate children.
    fn children(&'t self) -> Self::Children;
}

/// An immutable node of an ordered labeled tree.
///
/// Two nodes are equal iff their labels are equal and their children are pairwise equal, in
/// order.
#[derive(Debug, Clone, Eq, PartialEq, Hash, From)]
pub struct Node {
    label: Box<str>,
    children: Box<[Node]>,
}

impl Node {
    /// Creates a node with the given children.
    pub fn new(label: impl Into<Box<str>>, children: impl IntoIterator<Item = Node>) -> Self {
        Node {
            label: label.into(),
            children: children.into_iter().collect(),
        }
    }

    /// Creates a node without children.
    pub fn leaf(label: impl Into<Box<str>>) -> Self {
        Node::new(label, [])
    }

    /// This node's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// This node's children, in order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The total number of nodes in the tree rooted at this node.
    pub fn size(&self) -> usize {
        crate::Fold::count(self)
    }
}

/// Tears the tree down without recursing, so arbitrarily deep trees are safe to drop.
impl Drop for Node {
    fn drop(&mut self) {
        if self.children.is_empty() {
            return;
        }

        let mut stack = std::mem::take(&mut self.children).into_vec();
        while let Some(mut n) = stack.pop() {
            stack.extend(std::mem::take(&mut n.children).into_vec());
        }
    }
}

impl<'t> Hierarchy<'t> for Node {
    type Children = &'t [Self];

    #[inline]
    fn label(&'t self) -> &'t str {
        &self.label
    }

    #[inline]
    fn children(&'t self) -> Self::Children {
        &self.children
    }
}

/// Writes the node in bracket notation, with leaves as bare labels.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "{}", self.label)
        } else {
            write!(f, "({} {})", self.label, self.children.iter().format(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{collection::vec, prelude::*, sample::select};
    use test_strategy::proptest;

    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, From)]
    pub struct Size {
        depth: usize,
        breadth: usize,
    }

    impl Default for Size {
        fn default() -> Self {
            (4, 3).into()
        }
    }

    fn label() -> impl Strategy<Value = String> {
        select(vec!["A", "B", "C", "D"]).prop_map(String::from)
    }

    pub(crate) fn node(size: Size) -> impl Strategy<Value = Node> {
        let depth = size.depth as u32;
        let breadth = size.breadth as u32;
        let size = (breadth.pow(depth + 1) - 1) / (breadth - 1) / 2; // half the maximum number of nodes

        label()
            .prop_map(Node::leaf)
            .prop_recursive(depth, size, breadth, move |inner| {
                (label(), vec(inner, ..=breadth as usize)).prop_map(|(l, c)| Node::new(l, c))
            })
    }

    impl Arbitrary for Node {
        type Parameters = Size;
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(size: Size) -> Self::Strategy {
            node(size).boxed()
        }
    }

    #[test]
    fn leaves_are_written_as_bare_labels() {
        let n = Node::new("NP", [Node::leaf("the"), Node::leaf("dog")]);
        assert_eq!(n.to_string(), "(NP the dog)");
        assert_eq!(Node::leaf("A").to_string(), "A");
    }

    #[test]
    fn nested_nodes_are_written_in_bracket_notation() {
        let n = Node::new(
            "S",
            [
                Node::new("NP", [Node::leaf("the"), Node::leaf("dog")]),
                Node::new("VP", [Node::leaf("runs")]),
            ],
        );

        assert_eq!(n.to_string(), "(S (NP the dog) (VP runs))");
    }

    #[proptest]
    fn size_equals_one_plus_sum_of_sizes_of_children(n: Node) {
        let children: usize = n.children().iter().map(Node::size).sum();
        assert_eq!(n.size(), 1 + children);
    }

    #[proptest]
    fn written_nodes_parse_back_to_themselves(n: Node) {
        assert_eq!(n.to_string().parse::<Node>(), Ok(n));
    }
}

#[cfg(test)]
pub(crate) use tests::Size;
