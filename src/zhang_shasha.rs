//! The classic keyroot dynamic program of Zhang and Shasha.
//!
//! Runs in O(n1 · n2 · min(depth1, leaves1) · min(depth2, leaves2)) time and O(n1 · n2) space.

use crate::{CostModel, EditOperation, Tree};
use arrayvec::ArrayVec;
use pathfinding::matrix::Matrix;
use tracing::trace;

/// Scratch space shared by every keyroot pass of one comparison.
pub(crate) struct Tables {
    /// Distances between whole subtrees, indexed by postorder.
    pub(crate) tree: Matrix<u64>,

    /// Distances between prefixes of the two forests of the current keyroot pair.
    forest: Matrix<u64>,

    delete: Box<[u64]>,
    insert: Box<[u64]>,
}

impl Tables {
    pub(crate) fn new<C: CostModel + ?Sized>(a: &Tree, b: &Tree, cost: &C) -> Self {
        Tables {
            tree: Matrix::new(a.len(), b.len(), 0),
            forest: Matrix::new(a.len() + 1, b.len() + 1, 0),
            delete: a.postorder().map(|(_, l)| cost.delete(l)).collect(),
            insert: b.postorder().map(|(_, l)| cost.insert(l)).collect(),
        }
    }
}

/// The cost of deleting all of `a` or inserting all of `b`, whichever is not empty.
pub(crate) fn trivial<C: CostModel + ?Sized>(a: &Tree, b: &Tree, cost: &C) -> Option<u64> {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => None,
        (true, _) => Some(b.postorder().map(|(_, l)| cost.insert(l)).sum()),
        (_, true) => Some(a.postorder().map(|(_, l)| cost.delete(l)).sum()),
    }
}

/// Fills the forest table for the subtrees rooted at `i` and `j`.
///
/// Records the distance of every pair of subtrees along the leftmost paths of `i` and `j`, and
/// relies on every other pair of subtrees having been recorded already.
pub(crate) fn keyroot_pass<C: CostModel + ?Sized>(
    a: &Tree,
    b: &Tree,
    cost: &C,
    i: usize,
    j: usize,
    t: &mut Tables,
) {
    let (li, lj) = (a.leftmost_leaf(i), b.leftmost_leaf(j));
    trace!(i, j, cells = (i - li + 1) * (j - lj + 1), "keyroot pass");

    let fd = &mut t.forest;
    fd[(0, 0)] = 0;
    for x in li..=i {
        fd[(x - li + 1, 0)] = fd[(x - li, 0)] + t.delete[x];
    }

    for y in lj..=j {
        fd[(0, y - lj + 1)] = fd[(0, y - lj)] + t.insert[y];
    }

    for x in li..=i {
        for y in lj..=j {
            let (r, c) = (x - li + 1, y - lj + 1);
            let delete = fd[(r - 1, c)] + t.delete[x];
            let insert = fd[(r, c - 1)] + t.insert[y];

            if a.leftmost_leaf(x) == li && b.leftmost_leaf(y) == lj {
                let rename = fd[(r - 1, c - 1)] + cost.rename(a.label(x), b.label(y));
                fd[(r, c)] = rename.min(delete).min(insert);
                t.tree[(x, y)] = fd[(r, c)];
            } else {
                let (p, q) = (a.leftmost_leaf(x) - li, b.leftmost_leaf(y) - lj);
                let subtree = fd[(p, q)] + t.tree[(x, y)];
                fd[(r, c)] = subtree.min(delete).min(insert);
            }
        }
    }
}

/// Fills the subtree table for every pair of nodes.
pub(crate) fn fill<C: CostModel + ?Sized>(a: &Tree, b: &Tree, cost: &C, t: &mut Tables) {
    for &i in a.keyroots() {
        for &j in b.keyroots() {
            keyroot_pass(a, b, cost, i, j, t);
        }
    }
}

/// Computes the tree edit distance between `a` and `b`.
///
/// # Example
///
/// ```rust
/// use ted_engine::{parse, zhang_shasha, UnitCost};
///
/// let a = parse("(A (B) (C))")?;
/// let b = parse("(A (B) (D))")?;
/// assert_eq!(zhang_shasha::distance(&a, &b, &UnitCost), 1);
/// # Ok::<(), ted_engine::ParseError>(())
/// ```
pub fn distance<C: CostModel + ?Sized>(a: &Tree, b: &Tree, cost: &C) -> u64 {
    if let Some(d) = trivial(a, b, cost) {
        return d;
    }

    let mut t = Tables::new(a, b, cost);
    fill(a, b, cost, &mut t);
    t.tree[(a.len() - 1, b.len() - 1)]
}

/// A move back through the forest table.
enum Step {
    Match,
    Subtrees(usize, usize),
    Delete,
    Insert,
}

/// Finds a lowest cost sequence of [EditOperation]s that transforms `a` into `b`.
///
/// Among equally cheap alternatives, matching the nodes is preferred over deleting from `a`,
/// which is preferred over inserting from `b`. Matched nodes whose rename is free produce no
/// operation.
///
/// # Example
///
/// ```rust
/// use ted_engine::{parse, zhang_shasha, EditOperation, UnitCost};
///
/// let a = parse("(A (B) (C))")?;
/// let b = parse("(A (B) (C) (D))")?;
/// let (edits, cost) = zhang_shasha::edit_script(&a, &b, &UnitCost);
///
/// assert_eq!(cost, 1);
/// assert_eq!(&*edits, &[EditOperation::Insert { node: 2, label: "D".into(), cost: 1 }]);
/// # Ok::<(), ted_engine::ParseError>(())
/// ```
pub fn edit_script<C: CostModel + ?Sized>(
    a: &Tree,
    b: &Tree,
    cost: &C,
) -> (Box<[EditOperation]>, u64) {
    let insert = |y: usize| EditOperation::Insert {
        node: y,
        label: b.label(y).into(),
        cost: cost.insert(b.label(y)),
    };

    let delete = |x: usize| EditOperation::Delete {
        node: x,
        label: a.label(x).into(),
        cost: cost.delete(a.label(x)),
    };

    if a.is_empty() || b.is_empty() {
        let edits: Box<[_]> = (0..a.len()).map(delete).chain((0..b.len()).map(insert)).collect();
        let total = edits.iter().map(EditOperation::cost).sum();
        return (edits, total);
    }

    let mut t = Tables::new(a, b, cost);
    fill(a, b, cost, &mut t);

    let mut edits = Vec::new();
    let mut pending = vec![(a.len() - 1, b.len() - 1)];

    while let Some((i, j)) = pending.pop() {
        keyroot_pass(a, b, cost, i, j, &mut t);
        let (li, lj) = (a.leftmost_leaf(i), b.leftmost_leaf(j));
        let fd = &t.forest;

        // Walk back from the full forests to the empty ones.
        let (mut r, mut c) = (i - li + 1, j - lj + 1);
        while r > 0 || c > 0 {
            let (x, y) = ((li + r).wrapping_sub(1), (lj + c).wrapping_sub(1));

            let mut steps = ArrayVec::<_, 3>::new();
            if r > 0 && c > 0 {
                if a.leftmost_leaf(x) == li && b.leftmost_leaf(y) == lj {
                    let rename = cost.rename(a.label(x), b.label(y));
                    steps.push((fd[(r - 1, c - 1)] + rename, Step::Match));
                } else {
                    let (p, q) = (a.leftmost_leaf(x) - li, b.leftmost_leaf(y) - lj);
                    steps.push((fd[(p, q)] + t.tree[(x, y)], Step::Subtrees(p, q)));
                }
            }

            if r > 0 {
                steps.push((fd[(r - 1, c)] + t.delete[x], Step::Delete));
            }

            if c > 0 {
                steps.push((fd[(r, c - 1)] + t.insert[y], Step::Insert));
            }

            let target = fd[(r, c)];
            let step = steps.into_iter().find(|&(d, _)| d == target).map(|(_, s)| s);

            match step {
                Some(Step::Match) => {
                    let rename = cost.rename(a.label(x), b.label(y));
                    if rename > 0 || a.label(x) != b.label(y) {
                        edits.push(EditOperation::Rename {
                            from: x,
                            to: y,
                            from_label: a.label(x).into(),
                            to_label: b.label(y).into(),
                            cost: rename,
                        });
                    }

                    (r, c) = (r - 1, c - 1);
                }

                Some(Step::Subtrees(p, q)) => {
                    pending.push((x, y));
                    (r, c) = (p, q);
                }

                Some(Step::Delete) => {
                    edits.push(delete(x));
                    r -= 1;
                }

                Some(Step::Insert) | None => {
                    edits.push(insert(y));
                    c -= 1;
                }
            }
        }
    }

    edits.reverse();
    let total = t.tree[(a.len() - 1, b.len() - 1)];
    (edits.into(), total)
}
