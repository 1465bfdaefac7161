//! Error types for word-graph-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building or querying a `WordGraph`.
///
/// An empty query result (no bridge word, no path, too few input words)
/// is never an error: those are reported as empty collections or `None`.
#[derive(Error, Debug)]
pub enum GraphError {
	/// The queried word is not a node of the graph.
	#[error("No \"{word}\" in the graph")]
	NodeNotFound {
		/// Normalized (lowercased) word that was looked up.
		word: String,
	},

	/// The corpus file could not be read.
	#[error("Failed to read {}: {source}", .path.display())]
	Io {
		/// Path of the corpus file.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// A parallel pair-counting worker did not report back.
	#[error("Graph build failed: {0}")]
	Build(String),
}

impl GraphError {
	pub(crate) fn node_not_found(word: &str) -> Self {
		GraphError::NodeNotFound { word: word.to_owned() }
	}
}
