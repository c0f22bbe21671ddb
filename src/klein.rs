//! The keyroot dynamic program, memoized over isomorphic subtrees.
//!
//! Every subtree of both trees is assigned a structural fingerprint, shared across the two trees,
//! such that two subtrees have equal fingerprints iff they are equal. Whenever a pair of keyroots
//! repeats a pair of fingerprints already solved, the distances along their leftmost paths are
//! copied from the cache instead of being recomputed.

use crate::zhang_shasha::{keyroot_pass, trivial, Tables};
use crate::{CostModel, Tree};
use pathfinding::matrix::Matrix;
use std::collections::HashMap;
use tracing::{debug, trace};

/// The subtree fingerprints of both trees of one comparison.
#[derive(Debug, Default)]
struct Fingerprints<'t> {
    interned: HashMap<(&'t str, Box<[u32]>), u32>,
}

impl<'t> Fingerprints<'t> {
    /// Fingerprints every subtree of `t`, indexed by postorder.
    fn of(&mut self, t: &'t Tree) -> Box<[u32]> {
        let mut ids: Vec<u32> = Vec::with_capacity(t.len());
        for (i, label) in t.postorder() {
            let children = t.children(i).iter().map(|&k| ids[k]).collect();
            let next = self.interned.len() as u32;
            ids.push(*self.interned.entry((label, children)).or_insert(next));
        }

        ids.into()
    }
}

/// The cache of one comparison.
///
/// Keys are fingerprints interned for a single pair of trees, so a memo is only ever filled by
/// the call that created it.
#[derive(Debug, Default)]
pub struct Memo {
    paths: HashMap<(u32, u32), Matrix<u64>>,
    hits: usize,
}

impl Memo {
    /// The number of keyroot pairs that were served from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// The number of distinct pairs of subtrees that were solved.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing was solved, as when either tree is empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The nodes on the leftmost path from `i` down to its leftmost leaf, in postorder.
fn leftmost_path(t: &Tree, i: usize) -> impl Iterator<Item = usize> + '_ {
    let l = t.leftmost_leaf(i);
    (l..=i).filter(move |&x| t.leftmost_leaf(x) == l)
}

/// Computes the tree edit distance between `a` and `b`, along with the cache it was solved with.
pub fn distance_with<C: CostModel + ?Sized>(a: &Tree, b: &Tree, cost: &C) -> (u64, Memo) {
    let mut memo = Memo::default();
    if let Some(d) = trivial(a, b, cost) {
        return (d, memo);
    }

    let mut fingerprints = Fingerprints::default();
    let fa = fingerprints.of(a);
    let fb = fingerprints.of(b);

    let mut t = Tables::new(a, b, cost);
    for &i in a.keyroots() {
        for &j in b.keyroots() {
            let key = (fa[i], fb[j]);

            if let Some(cached) = memo.paths.get(&key) {
                for (r, x) in leftmost_path(a, i).enumerate() {
                    for (c, y) in leftmost_path(b, j).enumerate() {
                        t.tree[(x, y)] = cached[(r, c)];
                    }
                }

                memo.hits += 1;
                trace!(i, j, "keyroot pair served from cache");
                continue;
            }

            keyroot_pass(a, b, cost, i, j, &mut t);

            let rows: Vec<_> = leftmost_path(a, i).collect();
            let columns: Vec<_> = leftmost_path(b, j).collect();
            let mut solved = Matrix::new(rows.len(), columns.len(), 0);
            for (r, &x) in rows.iter().enumerate() {
                for (c, &y) in columns.iter().enumerate() {
                    solved[(r, c)] = t.tree[(x, y)];
                }
            }

            memo.paths.insert(key, solved);
        }
    }

    debug!(hits = memo.hits, solved = memo.paths.len(), "klein");
    (t.tree[(a.len() - 1, b.len() - 1)], memo)
}

/// Computes the tree edit distance between `a` and `b`.
///
/// Always equal to [zhang_shasha::distance][crate::zhang_shasha::distance].
pub fn distance<C: CostModel + ?Sized>(a: &Tree, b: &Tree, cost: &C) -> u64 {
    distance_with(a, b, cost).0
}
