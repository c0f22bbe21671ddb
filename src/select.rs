use crate::{adaptive, klein, simple, zhang_shasha};
use crate::{CostModel, InvalidConfigError, TedConfig, Tree};
use derive_more::Display;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The distance algorithms known to the engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display)]
pub enum AlgorithmKind {
    /// Sequence edit distance over the preorder serialization, see [`simple`].
    Simple,
    /// The keyroot dynamic program, see [`zhang_shasha`].
    ZhangShasha,
    /// The keyroot dynamic program memoized over isomorphic subtrees, see [`klein`].
    Klein,
    /// Shape-driven choice of decomposition strategy, see [`adaptive`].
    Adaptive,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::Simple,
        AlgorithmKind::ZhangShasha,
        AlgorithmKind::Klein,
        AlgorithmKind::Adaptive,
    ];

    /// Whether the result is the exact tree edit distance.
    pub fn is_exact(self) -> bool {
        self != AlgorithmKind::Simple
    }

    /// Runs this algorithm on a pair of trees.
    ///
    /// [`AlgorithmKind::Simple`] always counts unit costs and ignores `cost`.
    pub fn distance<C: CostModel + ?Sized>(self, a: &Tree, b: &Tree, cost: &C) -> u64 {
        match self {
            AlgorithmKind::Simple => simple::distance(a, b),
            AlgorithmKind::ZhangShasha => zhang_shasha::distance(a, b, cost),
            AlgorithmKind::Klein => klein::distance(a, b, cost),
            AlgorithmKind::Adaptive => adaptive::distance(a, b, cost),
        }
    }
}

/// A non-fatal remark on how the algorithms of a comparison were chosen.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Display)]
pub enum Notice {
    /// An enabled algorithm was left out because the trees are too large.
    #[display(fmt = "{algorithm} skipped: {largest} nodes exceed the size threshold of {threshold}")]
    Skipped {
        algorithm: AlgorithmKind,
        largest: usize,
        threshold: usize,
    },

    /// Nothing else could run, so [`AlgorithmKind::Simple`] was added.
    #[display(fmt = "no enabled algorithm can run, falling back to Simple")]
    Fallback,
}

/// The algorithms to run on a pair of trees.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Selection {
    pub algorithms: BTreeSet<AlgorithmKind>,
    pub notices: Vec<Notice>,
}

/// Decides which algorithms to run on `a` and `b`.
///
/// Trees within the size threshold run every enabled algorithm, larger ones only those that are
/// also cheap. If that leaves nothing to run, [`AlgorithmKind::Simple`] is selected instead,
/// unless the fallback is disabled.
///
/// # Example
///
/// ```rust
/// use ted_engine::{parse, select, AlgorithmKind, Notice, TedConfig};
///
/// let config = TedConfig::builder()
///     .enabled([AlgorithmKind::ZhangShasha])
///     .size_threshold(2)
///     .build()?;
///
/// let a = parse("(A b c)")?;
/// let selection = select(&a, &a, &config)?;
///
/// assert_eq!(selection.algorithms.into_iter().collect::<Vec<_>>(), [AlgorithmKind::Simple]);
/// assert_eq!(selection.notices.last(), Some(&Notice::Fallback));
/// # Ok::<(), ted_engine::TedError>(())
/// ```
pub fn select<C>(a: &Tree, b: &Tree, config: &TedConfig<C>) -> Result<Selection, InvalidConfigError> {
    let largest = a.len().max(b.len());
    let threshold = config.size_threshold();

    let mut notices = Vec::new();
    let mut algorithms: BTreeSet<_> = if largest <= threshold {
        config.enabled().clone()
    } else {
        for &algorithm in config.enabled().difference(config.cheap()) {
            notices.push(Notice::Skipped {
                algorithm,
                largest,
                threshold,
            });
        }

        config.enabled().intersection(config.cheap()).copied().collect()
    };

    if algorithms.is_empty() {
        if !config.fallback() {
            return Err(if config.enabled().is_empty() {
                InvalidConfigError::NothingEnabled
            } else {
                InvalidConfigError::NothingSelected {
                    enabled: config.enabled().iter().copied().collect(),
                    largest,
                    threshold,
                }
            });
        }

        algorithms.insert(AlgorithmKind::Simple);
        notices.push(Notice::Fallback);
    }

    for notice in &notices {
        info!(%notice, "size guard");
    }

    debug!(largest, threshold, ?algorithms, "selected");
    Ok(Selection {
        algorithms,
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Node, UnitCost};
    use assert_matches::assert_matches;
    use proptest::collection::btree_set;
    use proptest::sample::select as one_of;
    use proptest::strategy::Strategy;
    use test_strategy::proptest;

    fn kinds() -> impl Strategy<Value = BTreeSet<AlgorithmKind>> {
        btree_set(one_of(AlgorithmKind::ALL.to_vec()), 0..=4)
    }

    fn chain(n: usize) -> Tree {
        let node = (1..n).fold(Node::leaf("x"), |child, _| Node::new("x", [child]));
        Tree::from(&node)
    }

    #[test]
    fn small_trees_run_everything_enabled() {
        let config = TedConfig::default();
        let t = chain(10);

        let selection = select(&t, &t, &config).unwrap();
        assert_eq!(selection.algorithms, config.enabled().clone());
        assert!(selection.notices.is_empty());
    }

    #[test]
    fn large_trees_only_run_cheap_algorithms() {
        let config = TedConfig::builder().size_threshold(5).build().unwrap();
        let a = chain(6);
        let b = chain(2);

        let selection = select(&a, &b, &config).unwrap();
        assert_eq!(
            selection.algorithms.into_iter().collect::<Vec<_>>(),
            [AlgorithmKind::Simple, AlgorithmKind::Adaptive]
        );

        assert_eq!(
            selection.notices,
            [
                Notice::Skipped {
                    algorithm: AlgorithmKind::ZhangShasha,
                    largest: 6,
                    threshold: 5,
                },
                Notice::Skipped {
                    algorithm: AlgorithmKind::Klein,
                    largest: 6,
                    threshold: 5,
                },
            ]
        );
    }

    #[test]
    fn the_threshold_is_inclusive() {
        let config = TedConfig::builder().size_threshold(5).build().unwrap();
        let t = chain(5);
        assert_eq!(select(&t, &t, &config).unwrap().algorithms.len(), 4);
    }

    #[test]
    fn simple_is_the_fallback_when_everything_is_filtered() {
        let config = TedConfig::builder()
            .enabled([AlgorithmKind::Klein])
            .size_threshold(3)
            .build()
            .unwrap();

        let t = chain(4);
        let selection = select(&t, &t, &config).unwrap();

        assert_eq!(
            selection.algorithms.into_iter().collect::<Vec<_>>(),
            [AlgorithmKind::Simple]
        );

        assert_matches!(&*selection.notices, [Notice::Skipped { .. }, Notice::Fallback]);
    }

    #[test]
    fn simple_is_the_fallback_when_nothing_is_enabled() {
        let config = TedConfig::builder().enabled([]).build().unwrap();
        let t = chain(1);
        let selection = select(&t, &t, &config).unwrap();

        assert_eq!(
            selection.algorithms.into_iter().collect::<Vec<_>>(),
            [AlgorithmKind::Simple]
        );

        assert_eq!(selection.notices, [Notice::Fallback]);
    }

    #[test]
    fn filtering_everything_without_a_fallback_is_an_error() {
        let config = TedConfig::builder()
            .enabled([AlgorithmKind::ZhangShasha, AlgorithmKind::Klein])
            .size_threshold(1)
            .fallback(false)
            .build()
            .unwrap();

        let t = parse("(A b)").unwrap();
        assert_matches!(
            select(&t, &t, &config),
            Err(InvalidConfigError::NothingSelected {
                largest: 2,
                threshold: 1,
                ..
            })
        );
    }

    #[test]
    fn notices_are_readable() {
        let notice = Notice::Skipped {
            algorithm: AlgorithmKind::ZhangShasha,
            largest: 300,
            threshold: 256,
        };

        assert_eq!(
            notice.to_string(),
            "ZhangShasha skipped: 300 nodes exceed the size threshold of 256"
        );
    }

    #[test]
    fn every_algorithm_agrees_on_a_small_example() {
        let a = parse("(S (NP the dog) (VP runs))").unwrap();
        let b = parse("(S (NP the cat) (VP runs))").unwrap();

        for algorithm in AlgorithmKind::ALL {
            assert_eq!(algorithm.distance(&a, &b, &UnitCost), 1, "{algorithm}");
        }
    }

    #[proptest]
    fn the_selection_is_never_empty_with_a_fallback(
        #[strategy(kinds())] enabled: BTreeSet<AlgorithmKind>,
        #[strategy(kinds())] cheap: BTreeSet<AlgorithmKind>,
        #[strategy(0usize..20)] threshold: usize,
        #[any((3, 3).into())] a: Node,
        #[any((3, 3).into())] b: Node,
    ) {
        let config = TedConfig::builder()
            .enabled(enabled.iter().copied())
            .cheap(cheap.iter().copied())
            .size_threshold(threshold)
            .build()
            .unwrap();

        let (a, b) = (Tree::from(&a), Tree::from(&b));
        let selection = select(&a, &b, &config).unwrap();

        assert!(!selection.algorithms.is_empty());
        assert!(selection
            .algorithms
            .iter()
            .all(|k| enabled.contains(k) || *k == AlgorithmKind::Simple));

        if a.len().max(b.len()) > threshold {
            assert!(selection
                .algorithms
                .iter()
                .all(|k| cheap.contains(k) || *k == AlgorithmKind::Simple));
        }
    }
}
