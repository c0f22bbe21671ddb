use crate::{parse, select, AlgorithmKind, CostModel, Notice, Selection, TedConfig, TedError, Tree};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// The outcome of one algorithm on one pair of trees.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DistanceResult {
    pub algorithm: AlgorithmKind,
    pub distance: u64,
    pub tree1_size: usize,
    pub tree2_size: usize,
}

/// Every result of comparing one pair of trees.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Comparison {
    /// One entry per algorithm that ran.
    pub results: BTreeMap<AlgorithmKind, DistanceResult>,

    /// Algorithms that were skipped or added on account of the size of the trees.
    pub notices: Vec<Notice>,
}

impl Comparison {
    /// The result of `algorithm`, if it ran.
    pub fn get(&self, algorithm: AlgorithmKind) -> Option<&DistanceResult> {
        self.results.get(&algorithm)
    }

    /// The distance computed by `algorithm`, if it ran.
    pub fn distance(&self, algorithm: AlgorithmKind) -> Option<u64> {
        self.get(algorithm).map(|r| r.distance)
    }
}

/// Compares two trees with every algorithm selected by `config`.
///
/// The selected algorithms run independently of each other on the rayon thread pool.
///
/// # Example
///
/// ```rust
/// use ted_engine::{compare, parse, AlgorithmKind, TedConfig};
///
/// let a = parse("(A (B) (C))")?;
/// let b = parse("(A (B) (D))")?;
/// let comparison = compare(&a, &b, &TedConfig::default())?;
///
/// assert_eq!(comparison.results.len(), 4);
/// assert_eq!(comparison.distance(AlgorithmKind::ZhangShasha), Some(1));
/// # Ok::<(), ted_engine::TedError>(())
/// ```
pub fn compare<C: CostModel + Sync>(
    a: &Tree,
    b: &Tree,
    config: &TedConfig<C>,
) -> Result<Comparison, TedError> {
    let Selection {
        algorithms,
        notices,
    } = select(a, b, config)?;

    let cost = config.cost_model();
    let results = algorithms
        .into_par_iter()
        .map(|algorithm| {
            let distance = algorithm.distance(a, b, cost);
            debug!(%algorithm, distance, "computed");

            let result = DistanceResult {
                algorithm,
                distance,
                tree1_size: a.len(),
                tree2_size: b.len(),
            };

            (algorithm, result)
        })
        .collect();

    Ok(Comparison { results, notices })
}

/// Parses two trees in bracket notation and compares them.
///
/// Nothing is computed unless both inputs are well formed.
pub fn compare_str<C: CostModel + Sync>(
    a: &str,
    b: &str,
    config: &TedConfig<C>,
) -> Result<Comparison, TedError> {
    let a = parse(a)?;
    let b = parse(b)?;
    compare(&a, &b, config)
}

/// Compares many pairs of trees concurrently, preserving their order.
pub fn compare_batch<C: CostModel + Sync>(
    pairs: &[(Tree, Tree)],
    config: &TedConfig<C>,
) -> Result<Vec<Comparison>, TedError> {
    debug!(pairs = pairs.len(), "batch");
    pairs
        .par_iter()
        .map(|(a, b)| compare(a, b, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvalidConfigError, Node, ParseError, Weighted};
    use assert_matches::assert_matches;
    use test_strategy::proptest;

    const EXACT: [AlgorithmKind; 3] = [
        AlgorithmKind::ZhangShasha,
        AlgorithmKind::Klein,
        AlgorithmKind::Adaptive,
    ];

    fn exact(comparison: &Comparison) -> Vec<u64> {
        EXACT
            .iter()
            .filter_map(|&k| comparison.distance(k))
            .collect()
    }

    #[test]
    fn every_exact_algorithm_solves_the_reference_scenarios() {
        let config = TedConfig::default();
        let scenarios = [
            ("(A (B) (C))", "(A (B) (D))", 1),
            ("(A (B) (C))", "(A (B) (C) (D))", 1),
            ("(A)", "(A (B))", 1),
            ("", "(A (B) (C))", 3),
        ];

        for (a, b, expected) in scenarios {
            let comparison = compare_str(a, b, &config).unwrap();
            assert_eq!(exact(&comparison), [expected; 3], "{a} vs {b}");
        }
    }

    #[test]
    fn child_order_is_significant() {
        let comparison = compare_str("(A (B (C)) (D))", "(A (D) (B (C)))", &TedConfig::default());
        let comparison = comparison.unwrap();

        for result in comparison.results.values() {
            assert!(result.distance > 0, "{}", result.algorithm);
        }
    }

    #[test]
    fn results_carry_the_sizes_of_both_trees() {
        let comparison = compare_str("(A b c)", "(A b)", &TedConfig::default()).unwrap();
        let result = comparison.get(AlgorithmKind::Klein).unwrap();

        assert_eq!(result.algorithm, AlgorithmKind::Klein);
        assert_eq!((result.tree1_size, result.tree2_size), (3, 2));
        assert_eq!(result.distance, 1);
    }

    #[test]
    fn only_selected_algorithms_report_results() {
        let config = TedConfig::builder()
            .enabled([AlgorithmKind::ZhangShasha, AlgorithmKind::Simple])
            .build()
            .unwrap();

        let comparison = compare_str("(A b)", "(A c)", &config).unwrap();
        assert_eq!(
            comparison.results.keys().copied().collect::<Vec<_>>(),
            [AlgorithmKind::Simple, AlgorithmKind::ZhangShasha]
        );

        assert_eq!(comparison.distance(AlgorithmKind::Klein), None);
        assert!(comparison.notices.is_empty());
    }

    #[test]
    fn oversized_pairs_report_notices_alongside_results() {
        let config = TedConfig::builder().size_threshold(2).build().unwrap();
        let comparison = compare_str("(A b c)", "(A b c d)", &config).unwrap();

        assert_eq!(
            comparison.results.keys().copied().collect::<Vec<_>>(),
            [AlgorithmKind::Simple, AlgorithmKind::Adaptive]
        );

        assert_eq!(comparison.distance(AlgorithmKind::Adaptive), Some(1));
        assert_eq!(comparison.notices.len(), 2);
    }

    #[test]
    fn parse_errors_surface_before_any_comparison() {
        let result = compare_str("(A (B)", "(A)", &TedConfig::default());
        assert_matches!(result, Err(TedError::Parse(ParseError::Unclosed { open: 1 })));

        let result = compare_str("(A)", "(A))", &TedConfig::default());
        assert_matches!(result, Err(TedError::Parse(_)));
    }

    #[test]
    fn unsatisfiable_selections_are_reported() {
        let config = TedConfig::builder()
            .enabled([AlgorithmKind::Klein])
            .size_threshold(0)
            .fallback(false)
            .build()
            .unwrap();

        let result = compare_str("(A)", "(B)", &config);
        assert_matches!(
            result,
            Err(TedError::Config(InvalidConfigError::NothingSelected { .. }))
        );
    }

    #[test]
    fn the_cost_model_applies_to_exact_algorithms_only() {
        let config = TedConfig::builder()
            .cost_model(Weighted {
                insert: 5,
                delete: 5,
                rename: 3,
            })
            .build()
            .unwrap();

        let comparison = compare_str("(A (B) (C))", "(A (B) (D))", &config).unwrap();
        assert_eq!(exact(&comparison), [3; 3]);
        assert_eq!(comparison.distance(AlgorithmKind::Simple), Some(1));
    }

    #[test]
    fn batches_preserve_the_order_of_pairs() {
        let pairs: Vec<_> = ["(A)", "(A b)", "(A b c)", "(A b c d)"]
            .into_iter()
            .map(|s| (parse("(A)").unwrap(), parse(s).unwrap()))
            .collect();

        let comparisons = compare_batch(&pairs, &TedConfig::default()).unwrap();
        let distances: Vec<_> = comparisons
            .iter()
            .map(|c| c.distance(AlgorithmKind::ZhangShasha))
            .collect();

        assert_eq!(distances, [Some(0), Some(1), Some(2), Some(3)]);
    }

    #[proptest]
    fn exact_algorithms_agree(#[any((3, 3).into())] a: Node, #[any((3, 3).into())] b: Node) {
        let comparison = compare(&Tree::from(&a), &Tree::from(&b), &TedConfig::default()).unwrap();
        let distances = exact(&comparison);

        assert_eq!(distances.len(), 3);
        assert!(distances.iter().all(|&d| d == distances[0]));
    }

    #[proptest]
    fn comparisons_are_deterministic(a: Tree, b: Tree) {
        let config = TedConfig::default();
        assert_eq!(compare(&a, &b, &config).unwrap(), compare(&a, &b, &config).unwrap());
    }

    #[proptest]
    fn every_algorithm_is_zero_on_identical_trees(t: Tree) {
        let comparison = compare(&t, &t, &TedConfig::default()).unwrap();
        assert!(comparison.results.values().all(|r| r.distance == 0));
    }

    #[proptest]
    fn a_batch_matches_individual_comparisons(a: Tree, b: Tree, c: Tree) {
        let config = TedConfig::default();
        let pairs = [(a.clone(), b.clone()), (b.clone(), c.clone()), (c, a)];

        let batch = compare_batch(&pairs, &config).unwrap();
        for ((x, y), comparison) in pairs.iter().zip(&batch) {
            assert_eq!(&compare(x, y, &config).unwrap(), comparison);
        }
    }
}
