use crate::Hierarchy;
use std::fmt::{self, Display, Formatter};

/// Statistics that summarize the shape of a [Tree].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Shape {
    /// Total number of nodes.
    pub size: usize,

    /// Number of nodes on the longest root-to-leaf path.
    pub depth: usize,

    /// Number of nodes without children.
    pub leaves: usize,
}

impl Shape {
    /// Number of nodes with children.
    pub fn internal(&self) -> usize {
        self.size - self.leaves
    }

    /// Average number of children of internal nodes.
    pub fn branching(&self) -> f64 {
        match self.internal() {
            0 => 0.0,
            n => (self.size - 1) as f64 / n as f64,
        }
    }
}

/// An immutable ordered labeled tree, flattened in postorder.
///
/// Nodes are identified by their postorder index, so the root, if any, is always the last node
/// and every node comes after all of its descendants. The metadata needed by the distance
/// algorithms is computed once, at construction.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Tree {
    labels: Box<[Box<str>]>,
    parents: Box<[Option<usize>]>,
    children: Box<[Box<[usize]>]>,
    lld: Box<[usize]>,
    keyroots: Box<[usize]>,
    preorder: Box<[usize]>,
    ranks: Box<[usize]>,
    shape: Shape,
}

impl Tree {
    /// The tree without nodes.
    pub fn empty() -> Self {
        Tree::default()
    }

    /// Flattens a recursive tree.
    pub fn build<T: for<'t> Hierarchy<'t>>(root: &T) -> Self {
        Tree::assemble(root, |n| n.label().into(), |n| n.children())
    }

    /// Flattens whatever `children` reaches from `root`, without recursing.
    fn assemble<N, I, L, C>(root: N, label: L, children: C) -> Self
    where
        N: Copy,
        I: IntoIterator<Item = N>,
        L: Fn(N) -> Box<str>,
        C: Fn(N) -> I,
    {
        let mut labels = Vec::new();
        let mut kids: Vec<Box<[usize]>> = Vec::new();
        let mut stack = vec![(root, children(root).into_iter(), Vec::new())];

        while let Some((_, pending, _)) = stack.last_mut() {
            if let Some(child) = pending.next() {
                stack.push((child, children(child).into_iter(), Vec::new()));
            } else if let Some((node, _, done)) = stack.pop() {
                let id = labels.len();
                labels.push(label(node));
                kids.push(done.into());

                if let Some((_, _, siblings)) = stack.last_mut() {
                    siblings.push(id);
                }
            }
        }

        Tree::index(labels.into(), kids.into())
    }

    /// Derives the metadata from labels and children in postorder.
    fn index(labels: Box<[Box<str>]>, children: Box<[Box<[usize]>]>) -> Self {
        let n = labels.len();

        let mut parents = vec![None; n];
        let mut lld = vec![0; n];
        for (i, c) in children.iter().enumerate() {
            c.iter().for_each(|&k| parents[k] = Some(i));
            lld[i] = c.first().map_or(i, |&k| lld[k]);
        }

        // Every node that has a left sibling starts a new leftmost path.
        let keyroots = (0..n)
            .filter(|&i| parents[i].map_or(true, |p| children[p][0] != i))
            .collect();

        let mut preorder = Vec::with_capacity(n);
        let mut ranks = vec![0; n];
        let mut shape = Shape {
            size: n,
            ..Shape::default()
        };

        let mut stack: Vec<_> = n.checked_sub(1).map(|root| (root, 1)).into_iter().collect();
        while let Some((i, depth)) = stack.pop() {
            ranks[i] = preorder.len();
            preorder.push(i);
            shape.depth = shape.depth.max(depth);
            if children[i].is_empty() {
                shape.leaves += 1;
            }

            stack.extend(children[i].iter().rev().map(|&k| (k, depth + 1)));
        }

        Tree {
            labels,
            parents: parents.into(),
            children,
            lld: lld.into(),
            keyroots,
            preorder: preorder.into(),
            ranks: ranks.into(),
            shape,
        }
    }

    /// The same tree with the order of every node's children reversed.
    pub fn mirrored(&self) -> Self {
        match self.root() {
            None => Tree::empty(),
            Some(root) => Tree::assemble(
                root,
                |i| self.labels[i].clone(),
                |i| self.children[i].iter().rev().copied(),
            ),
        }
    }

    /// The total number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the tree has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The postorder index of the root, if any.
    #[inline]
    pub fn root(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// The label of node `i`.
    #[inline]
    pub fn label(&self, i: usize) -> &str {
        &self.labels[i]
    }

    /// The postorder indices of the children of `i`, in order.
    #[inline]
    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    /// The postorder index of the parent of `i`, or `None` for the root.
    #[inline]
    pub fn parent(&self, i: usize) -> Option<usize> {
        self.parents[i]
    }

    /// The postorder index of the leftmost leaf descendant of `i`.
    #[inline]
    pub fn leftmost_leaf(&self, i: usize) -> usize {
        self.lld[i]
    }

    /// The number of nodes in the subtree rooted at `i`.
    #[inline]
    pub fn subtree_size(&self, i: usize) -> usize {
        i - self.lld[i] + 1
    }

    /// The root along with every node that has a left sibling, in ascending postorder.
    #[inline]
    pub fn keyroots(&self) -> &[usize] {
        &self.keyroots
    }

    /// Postorder indices in preorder.
    #[inline]
    pub fn preorder(&self) -> &[usize] {
        &self.preorder
    }

    /// The position of `i` in preorder.
    #[inline]
    pub fn preorder_rank(&self, i: usize) -> usize {
        self.ranks[i]
    }

    /// Labels in postorder, tagged with their index.
    pub fn postorder(&self) -> impl ExactSizeIterator<Item = (usize, &str)> + '_ {
        self.labels.iter().map(|l| &**l).enumerate()
    }

    /// Size, depth and leaf count, computed at construction.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl<T: for<'t> Hierarchy<'t>> From<&T> for Tree {
    #[inline]
    fn from(root: &T) -> Self {
        Tree::build(root)
    }
}

/// Writes the tree in bracket notation; the empty tree is written as nothing.
impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        enum Visit {
            Open(usize),
            Close,
        }

        let mut stack: Vec<_> = self.root().map(Visit::Open).into_iter().collect();
        let mut first = true;

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Close => f.write_str(")")?,
                Visit::Open(i) => {
                    if !first {
                        f.write_str(" ")?;
                    }

                    first = false;
                    if self.children[i].is_empty() {
                        f.write_str(&self.labels[i])?;
                    } else {
                        write!(f, "({}", self.labels[i])?;
                        stack.push(Visit::Close);
                        stack.extend(self.children[i].iter().rev().map(|&k| Visit::Open(k)));
                    }
                }
            }
        }

        Ok(())
    }
}
