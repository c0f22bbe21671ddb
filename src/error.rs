use crate::AlgorithmKind;
use thiserror::Error;

/// Malformed bracket notation.
///
/// Offsets are byte positions into the input.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected ')' at offset {offset}")]
    UnexpectedClose { offset: usize },

    #[error("{open} unclosed '(' at end of input")]
    Unclosed { open: usize },

    #[error("missing label after '(' at offset {offset}")]
    MissingLabel { offset: usize },

    #[error("trailing input after the root expression at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("empty input")]
    Empty,
}

/// A configuration that cannot produce any distance.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum InvalidConfigError {
    #[error("no algorithm is enabled and the fallback is disabled")]
    NothingEnabled,

    #[error(
        "trees of {largest} nodes exceed the size threshold of {threshold}, \
         none of {enabled:?} is cheap and the fallback is disabled"
    )]
    NothingSelected {
        enabled: Vec<AlgorithmKind>,
        largest: usize,
        threshold: usize,
    },
}

/// Any failure surfaced by the engine.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TedError {
    #[error("failed to parse tree: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid configuration: {0}")]
    Config(#[from] InvalidConfigError),
}
