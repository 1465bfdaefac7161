use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::graph::WordGraph;
use crate::error::Result;
use crate::io::normalize_word;

/// Outcome of a bridge-word query between two words.
///
/// The three cases are kept apart so callers never confuse a missing word
/// with a valid pair that simply has no bridge.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BridgeOutcome {
	/// At least one bridge word exists (sorted alphabetically).
	Found { from: String, to: String, words: Vec<String> },
	/// Both words are in the graph but nothing links them in two hops.
	NoBridge { from: String, to: String },
	/// One or both words are absent from the graph.
	MissingNodes { missing: Vec<String> },
}

impl BridgeOutcome {
	/// Human-readable summary of the outcome.
	pub fn message(&self) -> String {
		match self {
			BridgeOutcome::Found { from, to, words } => {
				format!("The bridge words from {from} to {to} are: {}", words.join(", "))
			}
			BridgeOutcome::NoBridge { from, to } => format!("No bridge words from {from} to {to}!"),
			BridgeOutcome::MissingNodes { missing } => format!("No {} in the graph!", missing.join(" or ")),
		}
	}

	/// Bridge words found, empty for the two other outcomes.
	pub fn words(&self) -> &[String] {
		match self {
			BridgeOutcome::Found { words, .. } => words,
			_ => &[],
		}
	}
}

/// Nodes `x` with edges `from -> x` and `x -> to`, sorted by word.
///
/// `from` and `to` themselves are never reported, even through a self-loop.
pub(crate) fn bridge_nodes(graph: &WordGraph, from: NodeIndex, to: NodeIndex) -> Vec<NodeIndex> {
	graph
		.sorted_successors(from)
		.iter()
		.copied()
		.filter(|x| *x != from && *x != to && graph.has_edge(*x, to))
		.collect()
}

/// Returns every bridge word from `from` to `to`, sorted alphabetically.
///
/// An empty vector means both words exist but have no bridge.
///
/// # Errors
/// Returns `GraphError::NodeNotFound` for the first absent word.
pub fn find_bridges(graph: &WordGraph, from: &str, to: &str) -> Result<Vec<String>> {
	let from = graph.index_of(from)?;
	let to = graph.index_of(to)?;
	Ok(bridge_nodes(graph, from, to).into_iter().map(|x| graph.word(x).to_owned()).collect())
}

/// Runs a bridge-word query and classifies the result.
///
/// Unlike `find_bridges`, every absent word is listed in
/// `BridgeOutcome::MissingNodes`.
pub fn query_bridge_words(graph: &WordGraph, from: &str, to: &str) -> BridgeOutcome {
	let (from, to) = (normalize_word(from), normalize_word(to));

	match (graph.index_of(&from), graph.index_of(&to)) {
		(Ok(a), Ok(b)) => {
			let words: Vec<String> = bridge_nodes(graph, a, b).into_iter().map(|x| graph.word(x).to_owned()).collect();
			if words.is_empty() {
				BridgeOutcome::NoBridge { from, to }
			} else {
				BridgeOutcome::Found { from, to, words }
			}
		}
		(a, b) => {
			let missing: Vec<String> = [(a.is_err(), from), (b.is_err(), to)]
				.into_iter()
				.filter_map(|(absent, word)| absent.then_some(word))
				.collect();
			log::debug!("Bridge query: missing {missing:?}");
			BridgeOutcome::MissingNodes { missing }
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::GraphError;

	fn fox_graph() -> WordGraph {
		// the -> quick, quick -> fox, fox -> the, the -> fox
		WordGraph::from_text("the quick fox the fox").unwrap()
	}

	#[test]
	fn direct_edge_does_not_disqualify_bridge() {
		let graph = fox_graph();
		assert_eq!(find_bridges(&graph, "the", "fox").unwrap(), vec!["quick"]);
	}

	#[test]
	fn bridges_sorted_alphabetically() {
		let graph = WordGraph::from_text("a z b a m b a c b").unwrap();
		assert_eq!(find_bridges(&graph, "a", "b").unwrap(), vec!["c", "m", "z"]);
	}

	#[test]
	fn no_bridge_is_empty_not_error() {
		let graph = fox_graph();
		assert!(find_bridges(&graph, "quick", "fox").unwrap().is_empty());
	}

	#[test]
	fn missing_word_is_an_error() {
		let graph = fox_graph();
		match find_bridges(&graph, "the", "cat") {
			Err(GraphError::NodeNotFound { word }) => assert_eq!(word, "cat"),
			other => panic!("unexpected: {other:?}"),
		}
	}

	#[test]
	fn endpoints_never_bridge_themselves() {
		// a -> a (self-loop) and a -> b: "a" is not a bridge from a to b
		let graph = WordGraph::from_text("a a b b").unwrap();
		assert!(find_bridges(&graph, "a", "b").unwrap().is_empty());
	}

	#[test]
	fn query_is_case_insensitive() {
		let graph = fox_graph();
		assert_eq!(
			query_bridge_words(&graph, "The", "FOX"),
			BridgeOutcome::Found { from: "the".into(), to: "fox".into(), words: vec!["quick".into()] }
		);
	}

	#[test]
	fn query_outcomes_and_messages() {
		let graph = fox_graph();

		let found = query_bridge_words(&graph, "the", "fox");
		assert_eq!(found.message(), "The bridge words from the to fox are: quick");
		assert_eq!(found.words(), ["quick".to_owned()]);

		let none = query_bridge_words(&graph, "the", "quick");
		assert_eq!(none, BridgeOutcome::NoBridge { from: "the".into(), to: "quick".into() });
		assert_eq!(none.message(), "No bridge words from the to quick!");
		assert!(none.words().is_empty());

		let missing = query_bridge_words(&graph, "cat", "dog");
		assert_eq!(missing, BridgeOutcome::MissingNodes { missing: vec!["cat".into(), "dog".into()] });
		assert_eq!(missing.message(), "No cat or dog in the graph!");

		let one_missing = query_bridge_words(&graph, "the", "dog");
		assert_eq!(one_missing, BridgeOutcome::MissingNodes { missing: vec!["dog".into()] });

		let first_missing = query_bridge_words(&graph, "Cat", "fox");
		assert_eq!(first_missing, BridgeOutcome::MissingNodes { missing: vec!["cat".into()] });
	}
}
