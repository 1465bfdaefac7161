//! Top-level module for the word graph engine.
//!
//! Data flows leaves first:
//! - Text is split into lowercase words (`tokenizer`)
//! - Consecutive word pairs are counted (`edge_counts`)
//! - Counts become a weighted directed graph (`graph`) with a cached
//!   successor projection (`successors`)
//! - Read-only queries run against the built graph (`bridge`, `generator`,
//!   `shortest_path`, `walk`)

/// Lowercase word tokenization shared by corpus and query text.
pub mod tokenizer;

/// Ordered pair counter with parallel chunked counting.
///
/// Internal building block of `WordGraph`.
mod edge_counts;

/// The immutable weighted word graph and its topology accessors.
pub mod graph;

/// Cached node → sorted successors projection.
///
/// Not exposed
mod successors;

/// Bridge-word lookup and its three-way outcome.
pub mod bridge;

/// New-text generation by random bridge-word insertion.
pub mod generator;

/// Weighted shortest paths, single target (all ties) or all targets.
pub mod shortest_path;

/// Stateful random walk with edge-reuse termination.
pub mod walk;
