//! # Overview
//!
//! This crate computes the [tree edit distance][ted] between ordered labeled trees: the lowest
//! total cost of inserting, deleting and renaming nodes that transforms one tree into the other,
//! according to a user-defined [`CostModel`].
//!
//! Four algorithms are provided, all operating on the same postorder [`Tree`] representation:
//!
//! * [`simple`], a fast approximation over the preorder serialization of both trees;
//! * [`zhang_shasha`], the classic keyroot dynamic program, which also reconstructs edit scripts;
//! * [`klein`], the same dynamic program memoized over isomorphic subtrees;
//! * [`adaptive`], which picks a decomposition strategy from the shapes of both trees.
//!
//! The exact algorithms always agree. [`compare`] runs every algorithm [`select`]ed by a
//! [`TedConfig`], skipping the expensive ones on large trees.
//!
//! [ted]: https://en.wikipedia.org/wiki/Tree_edit_distance
//!
//! # Example
//!
//! ```rust
//! use ted_engine::*;
//!
//! let canonical = parse("(S (NP (DT the) (NN dog)) (VP (VBZ runs) (ADVP fast)))")?;
//! let reduced = parse("(S (NP (DT the) (NN dog)) (VP (VBZ runs)))")?;
//!
//! let comparison = compare(&canonical, &reduced, &TedConfig::default())?;
//! assert_eq!(comparison.distance(AlgorithmKind::ZhangShasha), Some(2));
//! assert_eq!(comparison.distance(AlgorithmKind::Klein), Some(2));
//! assert_eq!(comparison.distance(AlgorithmKind::Adaptive), Some(2));
//!
//! let (edits, cost) = zhang_shasha::edit_script(&canonical, &reduced, &UnitCost);
//! assert_eq!(cost, 2);
//! assert_eq!(
//!     edits.iter().map(ToString::to_string).collect::<Vec<_>>(),
//!     ["delete fast (1)", "delete ADVP (1)"]
//! );
//! # Ok::<(), TedError>(())
//! ```

mod compare;
mod config;
mod cost;
mod edit;
mod error;
mod node;
mod parse;
mod select;
mod tree;

pub use compare::*;
pub use config::*;
pub use cost::*;
pub use edit::*;
pub use error::*;
pub use node::*;
pub use parse::*;
pub use select::*;
pub use tree::*;

pub mod adaptive;
pub mod klein;
pub mod simple;
pub mod zhang_shasha;

mod fold;

pub(crate) use fold::*;

#[cfg(test)]
pub(crate) use node::Size;
