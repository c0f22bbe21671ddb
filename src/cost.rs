/// Assigns a non-negative cost to each edit operation.
///
/// The distance algorithms only form a metric if the model does: renaming a label to itself
/// should be free, renames should be symmetric and no operation should be cheaper than a
/// combination of others that achieves the same effect.
///
/// # Example
///
/// ```rust
/// use ted_engine::{parse, zhang_shasha, CostModel};
///
/// /// Renaming is cheap between tags of the same category, e.g. `NN` and `NNS`.
/// struct Tags;
///
/// impl CostModel for Tags {
///     fn insert(&self, _: &str) -> u64 {
///         2
///     }
///
///     fn delete(&self, _: &str) -> u64 {
///         2
///     }
///
///     fn rename(&self, from: &str, to: &str) -> u64 {
///         match (from, to) {
///             _ if from == to => 0,
///             _ if from.get(..2) == to.get(..2) => 1,
///             _ => 3,
///         }
///     }
/// }
///
/// let a = parse("(NP (DT the) (NN dog))")?;
/// let b = parse("(NP (DT the) (NNS dogs))")?;
/// assert_eq!(zhang_shasha::distance(&a, &b, &Tags), 2);
/// # Ok::<(), ted_engine::ParseError>(())
/// ```
pub trait CostModel {
    /// The cost of inserting a node with this label.
    fn insert(&self, label: &str) -> u64;

    /// The cost of deleting a node with this label.
    fn delete(&self, label: &str) -> u64;

    /// The cost of relabeling a node.
    fn rename(&self, from: &str, to: &str) -> u64;
}

impl<C: CostModel + ?Sized> CostModel for &C {
    #[inline]
    fn insert(&self, label: &str) -> u64 {
        C::insert(self, label)
    }

    #[inline]
    fn delete(&self, label: &str) -> u64 {
        C::delete(self, label)
    }

    #[inline]
    fn rename(&self, from: &str, to: &str) -> u64 {
        C::rename(self, from, to)
    }
}

impl<C: CostModel + ?Sized> CostModel for Box<C> {
    #[inline]
    fn insert(&self, label: &str) -> u64 {
        C::insert(self, label)
    }

    #[inline]
    fn delete(&self, label: &str) -> u64 {
        C::delete(self, label)
    }

    #[inline]
    fn rename(&self, from: &str, to: &str) -> u64 {
        C::rename(self, from, to)
    }
}

/// Every insertion and deletion costs 1; renaming costs 0 iff the labels are equal, else 1.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UnitCost;

impl CostModel for UnitCost {
    #[inline]
    fn insert(&self, _: &str) -> u64 {
        1
    }

    #[inline]
    fn delete(&self, _: &str) -> u64 {
        1
    }

    #[inline]
    fn rename(&self, from: &str, to: &str) -> u64 {
        u64::from(from != to)
    }
}

/// Constant costs per kind of operation; renaming a label to itself is free.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Weighted {
    pub insert: u64,
    pub delete: u64,
    pub rename: u64,
}

impl Default for Weighted {
    fn default() -> Self {
        Weighted {
            insert: 1,
            delete: 1,
            rename: 1,
        }
    }
}

impl CostModel for Weighted {
    #[inline]
    fn insert(&self, _: &str) -> u64 {
        self.insert
    }

    #[inline]
    fn delete(&self, _: &str) -> u64 {
        self.delete
    }

    #[inline]
    fn rename(&self, from: &str, to: &str) -> u64 {
        if from == to {
            0
        } else {
            self.rename
        }
    }
}

/// The model seen from the other tree: insertions become deletions and renames are reversed.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Swapped<C>(pub(crate) C);

impl<C: CostModel> CostModel for Swapped<C> {
    #[inline]
    fn insert(&self, label: &str) -> u64 {
        self.0.delete(label)
    }

    #[inline]
    fn delete(&self, label: &str) -> u64 {
        self.0.insert(label)
    }

    #[inline]
    fn rename(&self, from: &str, to: &str) -> u64 {
        self.0.rename(to, from)
    }
}
