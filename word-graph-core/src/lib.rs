//! Word adjacency graph engine.
//!
//! This crate builds a weighted directed graph from free-form text and
//! answers structural queries against it:
//! - Bridge-word lookup between two words
//! - Text generation by bridge-word insertion
//! - Weighted shortest paths (single target with ties, or all targets)
//! - Randomized walks that stop on edge reuse
//!
//! The graph is built once and never mutated afterwards, so a single
//! `WordGraph` can be shared by reference across any number of readers.

/// Graph construction and query logic.
///
/// Exposes the `WordGraph` handle and every query operating on it.
pub mod model;

/// Error types returned by graph construction and queries.
pub mod error;

/// I/O utilities (corpus loading).
///
/// Not exposed
pub(crate) mod io;

pub use error::{GraphError, Result};
pub use model::graph::WordGraph;
