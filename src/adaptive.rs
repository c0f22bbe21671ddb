//! Chooses, per pair of trees, the decomposition that solves the fewest subproblems.
//!
//! The keyroot dynamic program always decomposes both trees along their leftmost paths, which is
//! quadratic in the number of nodes for trees whose large subtrees hang to the right. Running it
//! on the mirrored trees fixes that case, and decomposing one tree along its heavy paths bounds
//! the number of its relevant subforests by O(n log n) regardless of shape. The planner estimates
//! the work of each strategy from the shape of the trees and picks the cheapest.

use crate::cost::Swapped;
use crate::zhang_shasha::{self, trivial};
use crate::{CostModel, Tree};
use arrayvec::ArrayVec;
use derive_more::Display;
use std::collections::HashMap;
use tracing::debug;

/// A decomposition of a pair of trees into subproblems.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
pub enum Strategy {
    /// Keyroots along leftmost paths.
    #[display(fmt = "left-to-right")]
    LeftToRight,

    /// Keyroots along rightmost paths.
    #[display(fmt = "right-to-left")]
    RightToLeft,

    /// Heavy paths of the left-hand tree against every subforest of the right-hand tree.
    #[display(fmt = "heavy-path")]
    HeavyPath,

    /// Heavy paths of the right-hand tree against every subforest of the left-hand tree.
    #[display(fmt = "heavy-path (swapped)")]
    HeavyPathSwapped,
}

/// The strategy chosen for a pair of trees, along with its estimated number of subproblems.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Plan {
    pub strategy: Strategy,
    pub estimate: u128,
}

/// Relative cost of a memoized subproblem against a cell of the keyroot tables.
const HEAVY_PATH_OVERHEAD: u128 = 4;

/// Sum of subtree sizes over the nodes that start a new path, given which child continues it.
fn path_roots(t: &Tree, continues: impl Fn(&[usize]) -> Option<usize>) -> u128 {
    let starts = (0..t.len()).filter(|&i| match t.parent(i) {
        None => true,
        Some(p) => continues(t.children(p)) != Some(i),
    });

    starts.map(|i| t.subtree_size(i) as u128).sum()
}

fn leftmost_paths(t: &Tree) -> u128 {
    path_roots(t, |c| c.first().copied())
}

fn rightmost_paths(t: &Tree) -> u128 {
    path_roots(t, |c| c.last().copied())
}

fn heavy_paths(t: &Tree) -> u128 {
    path_roots(t, |c| c.iter().copied().max_by_key(|&k| t.subtree_size(k)))
}

fn subforests(t: &Tree) -> u128 {
    let n = t.len() as u128;
    n * (n + 1) / 2
}

/// Picks the strategy with the lowest estimate; ties go to the earliest in declaration order.
pub fn plan(a: &Tree, b: &Tree) -> Plan {
    let candidates = [
        (Strategy::LeftToRight, leftmost_paths(a) * leftmost_paths(b)),
        (Strategy::RightToLeft, rightmost_paths(a) * rightmost_paths(b)),
        (
            Strategy::HeavyPath,
            HEAVY_PATH_OVERHEAD * heavy_paths(a) * subforests(b),
        ),
        (
            Strategy::HeavyPathSwapped,
            HEAVY_PATH_OVERHEAD * heavy_paths(b) * subforests(a),
        ),
    ];

    let (strategy, estimate) = candidates
        .into_iter()
        .min_by_key(|&(_, e)| e)
        .unwrap_or((Strategy::LeftToRight, 0));

    let (sa, sb) = (a.shape(), b.shape());
    debug!(
        size = ?(sa.size, sb.size),
        depth = ?(sa.depth, sb.depth),
        leaves = ?(sa.leaves, sb.leaves),
        branching = ?(sa.branching(), sb.branching()),
        %strategy,
        %estimate,
        "adaptive plan"
    );

    Plan { strategy, estimate }
}

/// Computes the tree edit distance between `a` and `b` with the given strategy.
///
/// Every strategy yields the same distance; only the amount of work differs.
pub fn distance_by<C: CostModel + ?Sized>(strategy: Strategy, a: &Tree, b: &Tree, cost: &C) -> u64 {
    if let Some(d) = trivial(a, b, cost) {
        return d;
    }

    match strategy {
        Strategy::LeftToRight => zhang_shasha::distance(a, b, cost),
        Strategy::RightToLeft => zhang_shasha::distance(&a.mirrored(), &b.mirrored(), cost),
        Strategy::HeavyPath => HeavyPath::new(a, b, cost).solve(),
        Strategy::HeavyPathSwapped => HeavyPath::new(b, a, &Swapped(cost)).solve(),
    }
}

/// Computes the tree edit distance between `a` and `b` with the [plan]ned strategy.
///
/// Always equal to [zhang_shasha::distance][crate::zhang_shasha::distance].
pub fn distance<C: CostModel + ?Sized>(a: &Tree, b: &Tree, cost: &C) -> u64 {
    distance_by(plan(a, b).strategy, a, b, cost)
}

/// A subforest of a tree obtained by repeatedly removing its leftmost or rightmost root.
///
/// Holds exactly the nodes whose preorder rank is at least `first` and whose postorder index is
/// at most `last`. Both bounds are kept tight, so equal forests have equal representations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct Forest {
    first: usize,
    last: usize,
    len: usize,
}

const EMPTY: Forest = Forest {
    first: 0,
    last: 0,
    len: 0,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Side {
    Left,
    Right,
}

impl Forest {
    fn whole(t: &Tree) -> Self {
        match t.root() {
            None => EMPTY,
            Some(root) => Forest {
                first: 0,
                last: root,
                len: t.len(),
            },
        }
    }

    fn new(t: &Tree, first: usize, last: usize, len: usize) -> Self {
        if len == 0 {
            return EMPTY;
        }

        // Only ancestors of the outermost roots can be skipped.
        let mut first = first;
        while t.preorder()[first] > last {
            first += 1;
        }

        let mut last = last;
        while t.preorder_rank(last) < first {
            last -= 1;
        }

        Forest { first, last, len }
    }

    fn root(&self, t: &Tree, side: Side) -> usize {
        match side {
            Side::Left => t.preorder()[self.first],
            Side::Right => self.last,
        }
    }

    fn without_root(&self, t: &Tree, side: Side) -> Self {
        match side {
            Side::Left => Forest::new(t, self.first + 1, self.last, self.len - 1),
            Side::Right => Forest::new(t, self.first, self.last.saturating_sub(1), self.len - 1),
        }
    }

    fn without_tree(&self, t: &Tree, side: Side) -> Self {
        let v = self.root(t, side);
        let size = t.subtree_size(v);
        match side {
            Side::Left => Forest::new(t, self.first + size, self.last, self.len - size),
            Side::Right => {
                let last = t.leftmost_leaf(v).saturating_sub(1);
                Forest::new(t, self.first, last, self.len - size)
            }
        }
    }

    fn children(t: &Tree, v: usize) -> Self {
        let first = t.preorder_rank(v) + 1;
        Forest::new(t, first, v.saturating_sub(1), t.subtree_size(v) - 1)
    }
}

type Key = (Forest, Forest);

/// The subproblems an alternative depends on, plus the cost of its own operation.
type Alternative = (ArrayVec<Key, 2>, u64);

/// Memoized forest distances, decomposing the left-hand tree along its heavy paths.
struct HeavyPath<'t, C: ?Sized> {
    a: &'t Tree,
    b: &'t Tree,
    cost: &'t C,
    delete: Box<[u64]>,
    insert: Box<[u64]>,
    memo: HashMap<Key, u64>,
}

impl<'t, C: CostModel + ?Sized> HeavyPath<'t, C> {
    fn new(a: &'t Tree, b: &'t Tree, cost: &'t C) -> Self {
        HeavyPath {
            a,
            b,
            cost,
            delete: a.postorder().map(|(_, l)| cost.delete(l)).collect(),
            insert: b.postorder().map(|(_, l)| cost.insert(l)).collect(),
            memo: HashMap::new(),
        }
    }

    /// Removes roots from the side opposite to the largest tree, which is thus decomposed last.
    fn side(&self, f: &Forest) -> Side {
        let (l, r) = (f.root(self.a, Side::Left), f.root(self.a, Side::Right));
        if l == r || self.a.subtree_size(l) < self.a.subtree_size(r) {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn alternatives(&self, (f, g): Key) -> ArrayVec<Alternative, 3> {
        let (a, b) = (self.a, self.b);
        let mut alternatives = ArrayVec::new();

        match (f.len, g.len) {
            (0, 0) => alternatives.push((ArrayVec::new(), 0)),

            (0, _) => {
                let w = g.root(b, Side::Left);
                let rest = (f, g.without_root(b, Side::Left));
                alternatives.push(([rest].into_iter().collect(), self.insert[w]));
            }

            (_, 0) => {
                let v = f.root(a, Side::Left);
                let rest = (f.without_root(a, Side::Left), g);
                alternatives.push(([rest].into_iter().collect(), self.delete[v]));
            }

            _ => {
                let side = self.side(&f);
                let (v, w) = (f.root(a, side), g.root(b, side));

                let delete = (f.without_root(a, side), g);
                alternatives.push(([delete].into_iter().collect(), self.delete[v]));

                let insert = (f, g.without_root(b, side));
                alternatives.push(([insert].into_iter().collect(), self.insert[w]));

                let children = (Forest::children(a, v), Forest::children(b, w));
                let siblings = (f.without_tree(a, side), g.without_tree(b, side));
                let rename = self.cost.rename(a.label(v), b.label(w));
                alternatives.push(([children, siblings].into_iter().collect(), rename));
            }
        }

        alternatives
    }

    /// Evaluates the whole trees on an explicit stack, so deep trees are safe.
    fn solve(mut self) -> u64 {
        let root = (Forest::whole(self.a), Forest::whole(self.b));
        let mut stack = vec![root];

        while let Some(&key) = stack.last() {
            if self.memo.contains_key(&key) {
                stack.pop();
                continue;
            }

            let alternatives = self.alternatives(key);
            let missing: Vec<Key> = alternatives
                .iter()
                .flat_map(|(deps, _)| deps)
                .copied()
                .filter(|k| !self.memo.contains_key(k))
                .collect();

            if missing.is_empty() {
                let best = alternatives
                    .iter()
                    .map(|(deps, c)| deps.iter().map(|k| self.memo[k]).sum::<u64>() + c)
                    .min()
                    .unwrap_or_default();

                self.memo.insert(key, best);
                stack.pop();
            } else {
                stack.extend(missing);
            }
        }

        debug!(subproblems = self.memo.len(), "heavy path");
        self.memo.get(&root).copied().unwrap_or_default()
    }
}
