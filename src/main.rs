use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use ted_engine::{
    compare_batch, parse, zhang_shasha, AlgorithmKind, Comparison, Notice, TedConfig, Tree,
    DEFAULT_SIZE_THRESHOLD,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ted", about = "Tree edit distance between trees in bracket notation")]
struct Cli {
    /// Left-hand tree, e.g. "(S (NP the dog) (VP runs))".
    #[arg(required_unless_present = "pairs", requires = "right")]
    left: Option<String>,

    /// Right-hand tree.
    right: Option<String>,

    /// File of pairs, one `<left>\t<right>` per line.
    #[arg(long, conflicts_with_all = ["left", "right"])]
    pairs: Option<PathBuf>,

    /// Algorithm to run; may be repeated (default: all).
    #[arg(long = "algorithm", value_enum)]
    algorithms: Vec<Algorithm>,

    /// Largest tree size on which expensive algorithms still run.
    #[arg(long, default_value_t = DEFAULT_SIZE_THRESHOLD)]
    threshold: usize,

    /// Fail instead of falling back to the simple approximation.
    #[arg(long)]
    no_fallback: bool,

    /// Print a lowest cost edit script for every pair.
    #[arg(long)]
    edits: bool,
}

#[derive(ValueEnum, Debug, Copy, Clone)]
enum Algorithm {
    Simple,
    ZhangShasha,
    Klein,
    Adaptive,
}

impl From<Algorithm> for AlgorithmKind {
    fn from(a: Algorithm) -> Self {
        match a {
            Algorithm::Simple => AlgorithmKind::Simple,
            Algorithm::ZhangShasha => AlgorithmKind::ZhangShasha,
            Algorithm::Klein => AlgorithmKind::Klein,
            Algorithm::Adaptive => AlgorithmKind::Adaptive,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = TedConfig::builder()
        .size_threshold(cli.threshold)
        .fallback(!cli.no_fallback);

    if !cli.algorithms.is_empty() {
        builder = builder.enabled(cli.algorithms.iter().map(|&a| a.into()));
    }

    let config = builder.build().context("invalid configuration")?;

    let pairs = match (&cli.pairs, &cli.left, &cli.right) {
        (Some(path), _, _) => read_pairs(path)?,
        (None, Some(left), Some(right)) => vec![(
            parse(left).context("failed to parse the left-hand tree")?,
            parse(right).context("failed to parse the right-hand tree")?,
        )],
        _ => return Err(anyhow!("expected two trees or --pairs")),
    };

    let comparisons = compare_batch(&pairs, &config).context("comparison failed")?;
    for (idx, (comparison, (a, b))) in comparisons.iter().zip(&pairs).enumerate() {
        print_comparison(idx + 1, comparison);

        if cli.edits {
            if let Some(notice) = oversized(a, b, config.size_threshold()) {
                eprintln!("pair {}: edit script not computed, {notice}", idx + 1);
                continue;
            }

            let (edits, cost) = zhang_shasha::edit_script(a, b, config.cost_model());
            for edit in edits.iter() {
                println!("{}\tedit\t{}", idx + 1, edit);
            }

            println!("{}\tedit\ttotal {}", idx + 1, cost);
        }
    }

    Ok(())
}

/// Edit scripts need the full keyroot tables, so they obey the same size guard.
fn oversized(a: &Tree, b: &Tree, threshold: usize) -> Option<Notice> {
    let largest = a.len().max(b.len());
    (largest > threshold).then_some(Notice::Skipped {
        algorithm: AlgorithmKind::ZhangShasha,
        largest,
        threshold,
    })
}

fn read_pairs(path: &Path) -> Result<Vec<(Tree, Tree)>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_pairs(BufReader::new(file))
}

/// Reads one `<left>\t<right>` pair per line, skipping blank lines.
fn parse_pairs(reader: impl BufRead) -> Result<Vec<(Tree, Tree)>> {
    let mut pairs = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (left, right) = line
            .split_once('\t')
            .ok_or_else(|| anyhow!("missing tab separator on line {}", line_no + 1))?;

        let left = parse(left)
            .with_context(|| format!("invalid left-hand tree on line {}", line_no + 1))?;
        let right = parse(right)
            .with_context(|| format!("invalid right-hand tree on line {}", line_no + 1))?;

        pairs.push((left, right));
    }

    Ok(pairs)
}

fn print_comparison(idx: usize, comparison: &Comparison) {
    for notice in &comparison.notices {
        eprintln!("pair {idx}: {notice}");
    }

    for result in comparison.results.values() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            idx, result.algorithm, result.distance, result.tree1_size, result.tree2_size
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pairs_are_read_one_per_line() {
        let input = "(A b)\t(A c)\n\n   \n(S (NP the dog))\t\n";
        let pairs = parse_pairs(input.as_bytes()).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.to_string(), "(A b)");
        assert_eq!(pairs[0].1.to_string(), "(A c)");
        assert_eq!(pairs[1].0.len(), 4);
        assert!(pairs[1].1.is_empty());
    }

    #[test]
    fn lines_without_a_tab_are_rejected() {
        let err = parse_pairs("(A b)\t(A)\n(A b) (A)\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "missing tab separator on line 2");
    }

    #[test]
    fn malformed_trees_report_their_line() {
        let err = parse_pairs("(A b)\t(A (c)\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "invalid right-hand tree on line 1");
        assert_matches!(
            err.downcast_ref::<ted_engine::ParseError>(),
            Some(ted_engine::ParseError::Unclosed { open: 1 })
        );
    }

    #[test]
    fn edit_scripts_obey_the_size_threshold() {
        let a = parse("(A b c)").unwrap();
        let b = parse("(A b)").unwrap();

        assert_eq!(oversized(&a, &b, 3), None);
        assert_eq!(
            oversized(&a, &b, 2),
            Some(Notice::Skipped {
                algorithm: AlgorithmKind::ZhangShasha,
                largest: 3,
                threshold: 2,
            })
        );
    }
}
