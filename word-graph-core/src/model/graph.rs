use std::collections::HashMap;
use std::path::Path;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::edge_counts::EdgeCounts;
use super::successors::SuccessorIndex;
use super::tokenizer::tokenize;
use crate::error::{GraphError, Result};
use crate::io;

/// A weighted directed edge as exposed to presentation layers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	pub source: String,
	pub target: String,
	/// Number of times `target` immediately follows `source` in the corpus.
	pub weight: usize,
}

/// Full node and edge listing, e.g. for drawing the graph.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Topology {
	pub nodes: Vec<String>,
	pub edges: Vec<Edge>,
}

/// Weighted directed word adjacency graph.
///
/// Nodes are distinct lowercase words of a corpus; an edge `a -> b` exists
/// when `b` immediately follows `a` at least once, and its weight is the
/// number of such occurrences.
///
/// ## Responsibilities:
/// - Build the graph from raw text, a token sequence or a corpus file
/// - Expose topology (nodes, weighted edges, successors)
/// - Resolve query words (case-insensitive) to nodes for the query modules
///
/// ## Invariants
/// - At most one edge per ordered pair, weight >= 1
/// - Self-loops exist only if a word immediately follows itself
/// - Never mutated after construction; the successor index stays valid
///
/// Nodes and edges are stored in first-appearance order of the corpus.
#[derive(Clone, Debug)]
pub struct WordGraph {
	graph: DiGraph<String, usize>,
	node_map: HashMap<String, NodeIndex>,
	successors: SuccessorIndex,
}

impl WordGraph {
	/// Loads a corpus file and builds its graph.
	///
	/// # Errors
	/// Returns `GraphError::Io` if the file cannot be read as UTF-8 text.
	pub fn from_file<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let text = io::read_file(&filepath)?;
		log::info!("Loaded corpus {} ({} bytes)", filepath.as_ref().display(), text.len());
		Self::from_text(&text)
	}

	/// Tokenizes `text` and builds its graph.
	pub fn from_text(text: &str) -> Result<Self> {
		Self::from_tokens(&tokenize(text))
	}

	/// Builds the graph from an already tokenized sequence.
	///
	/// - Tokens are normalized like query words (trimmed, lowercased);
	///   tokens left empty are dropped
	/// - Every distinct token becomes a node, even with fewer than 2 tokens
	/// - Every distinct consecutive pair becomes one edge weighted by its count
	///
	/// # Errors
	/// Returns `GraphError::Build` if parallel pair counting fails.
	pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
		let tokens: Vec<String> = tokens
			.iter()
			.map(|t| io::normalize_word(t.as_ref()))
			.filter(|t| !t.is_empty())
			.collect();
		let counts = EdgeCounts::count(&tokens)?;

		let mut graph: DiGraph<String, usize> = DiGraph::with_capacity(0, counts.len());
		let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
		for token in &tokens {
			if !node_map.contains_key(token) {
				let idx = graph.add_node(token.clone());
				node_map.insert(token.clone(), idx);
			}
		}

		for (from, to, count) in counts.into_ordered() {
			graph.add_edge(node_map[&from], node_map[&to], count);
		}

		let successors = SuccessorIndex::build(&graph);
		log::info!(
			"Built word graph: {} nodes, {} edges from {} tokens",
			graph.node_count(),
			graph.edge_count(),
			tokens.len()
		);

		Ok(Self { graph, node_map, successors })
	}

	/// Number of distinct words.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// Number of distinct ordered word pairs.
	pub fn edge_count(&self) -> usize {
		self.graph.edge_count()
	}

	pub fn is_empty(&self) -> bool {
		self.graph.node_count() == 0
	}

	/// Whether `word` (case-insensitive) is a node of the graph.
	pub fn contains(&self, word: &str) -> bool {
		self.node_map.contains_key(&io::normalize_word(word))
	}

	/// All words, in first-appearance order.
	pub fn nodes(&self) -> Vec<String> {
		self.graph.node_indices().map(|n| self.graph[n].clone()).collect()
	}

	/// All weighted edges, in first-appearance order of their pair.
	pub fn edges(&self) -> Vec<Edge> {
		self.graph
			.edge_references()
			.map(|e| Edge {
				source: self.graph[e.source()].clone(),
				target: self.graph[e.target()].clone(),
				weight: *e.weight(),
			})
			.collect()
	}

	/// Nodes and edges together.
	pub fn topology(&self) -> Topology {
		Topology { nodes: self.nodes(), edges: self.edges() }
	}

	/// Weight of the edge `from -> to`, or `None` if there is no such edge
	/// (including when either word is absent).
	pub fn weight(&self, from: &str, to: &str) -> Option<usize> {
		let from = self.index_of(from).ok()?;
		let to = self.index_of(to).ok()?;
		self.graph.find_edge(from, to).map(|e| self.graph[e])
	}

	/// Direct successors of `word`, sorted alphabetically.
	///
	/// # Errors
	/// Returns `GraphError::NodeNotFound` if the word is absent.
	pub fn successors(&self, word: &str) -> Result<Vec<&str>> {
		let node = self.index_of(word)?;
		Ok(self.successors.get(node).iter().map(|n| self.word(*n)).collect())
	}

	/// Resolves a query word to its node.
	pub(crate) fn index_of(&self, word: &str) -> Result<NodeIndex> {
		let key = io::normalize_word(word);
		match self.node_map.get(&key) {
			Some(idx) => Ok(*idx),
			None => Err(GraphError::node_not_found(&key)),
		}
	}

	pub(crate) fn word(&self, node: NodeIndex) -> &str {
		&self.graph[node]
	}

	pub(crate) fn inner(&self) -> &DiGraph<String, usize> {
		&self.graph
	}

	pub(crate) fn sorted_successors(&self, node: NodeIndex) -> &[NodeIndex] {
		self.successors.get(node)
	}

	pub(crate) fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
		self.successors.contains(from, to)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn weights_are_exact_pair_counts() {
		let graph = WordGraph::from_text("a b a b").unwrap();
		assert_eq!(graph.node_count(), 2);
		assert_eq!(graph.edge_count(), 2);
		assert_eq!(graph.weight("a", "b"), Some(2));
		assert_eq!(graph.weight("b", "a"), Some(1));
		assert_eq!(graph.weight("b", "b"), None);
	}

	#[test]
	fn edges_are_directed() {
		let graph = WordGraph::from_text("to be").unwrap();
		assert_eq!(graph.weight("to", "be"), Some(1));
		assert_eq!(graph.weight("be", "to"), None);
	}

	#[test]
	fn self_loops_are_kept() {
		let graph = WordGraph::from_text("very very very good").unwrap();
		assert_eq!(graph.weight("very", "very"), Some(2));
		assert_eq!(graph.weight("very", "good"), Some(1));
		assert_eq!(graph.successors("very").unwrap(), vec!["good", "very"]);
	}

	#[test]
	fn single_token_has_node_but_no_edge() {
		let graph = WordGraph::from_text("Hello!").unwrap();
		assert_eq!(graph.nodes(), vec!["hello"]);
		assert!(graph.edges().is_empty());
	}

	#[test]
	fn empty_text_gives_empty_graph() {
		let graph = WordGraph::from_text("... ?!").unwrap();
		assert!(graph.is_empty());
		assert_eq!(graph.topology(), Topology::default());
	}

	#[test]
	fn nodes_and_edges_in_first_appearance_order() {
		let graph = WordGraph::from_text("The cat saw the dog. The dog ran.").unwrap();
		assert_eq!(graph.nodes(), vec!["the", "cat", "saw", "dog", "ran"]);
		let edges: Vec<(String, String, usize)> =
			graph.edges().into_iter().map(|e| (e.source, e.target, e.weight)).collect();
		assert_eq!(
			edges,
			vec![
				("the".to_owned(), "cat".to_owned(), 1),
				("cat".to_owned(), "saw".to_owned(), 1),
				("saw".to_owned(), "the".to_owned(), 1),
				("the".to_owned(), "dog".to_owned(), 2),
				("dog".to_owned(), "the".to_owned(), 1),
				("dog".to_owned(), "ran".to_owned(), 1),
			]
		);
	}

	#[test]
	fn tokens_are_normalized() {
		let graph = WordGraph::from_tokens(&["Hello", " WORLD ", "", "hello", "  "]).unwrap();
		assert_eq!(graph.nodes(), vec!["hello", "world"]);
		assert!(graph.contains("Hello"));
		assert_eq!(graph.weight("Hello", "World"), Some(1));
		assert_eq!(graph.weight("world", "hello"), Some(1));
	}

	#[test]
	fn large_corpus_uses_parallel_counting() {
		// 200k tokens: well above the inline counting threshold
		let mut tokens = Vec::with_capacity(200_000);
		for i in 0..100_000 {
			tokens.push("the".to_owned());
			tokens.push(format!("w{}", i % 20_000));
		}
		let graph = WordGraph::from_tokens(&tokens).unwrap();

		assert_eq!(graph.node_count(), 20_001);
		assert_eq!(graph.edge_count(), 40_000);
		assert_eq!(graph.weight("the", "w0"), Some(5));
		assert_eq!(graph.weight("w0", "the"), Some(5));
		// The last token has no successor
		assert_eq!(graph.weight("w19999", "the"), Some(4));

		let first: Vec<(String, String)> =
			graph.edges().into_iter().take(3).map(|e| (e.source, e.target)).collect();
		assert_eq!(
			first,
			vec![
				("the".to_owned(), "w0".to_owned()),
				("w0".to_owned(), "the".to_owned()),
				("the".to_owned(), "w1".to_owned()),
			]
		);
		assert_eq!(graph.successors("the").unwrap().len(), 20_000);
	}

	#[test]
	fn queries_are_case_insensitive() {
		let graph = WordGraph::from_text("Rust is fast").unwrap();
		assert!(graph.contains("RUST"));
		assert!(graph.contains(" is "));
		assert_eq!(graph.weight("IS", "Fast"), Some(1));
		assert!(!graph.contains("slow"));
	}

	#[test]
	fn successors_of_missing_word() {
		let graph = WordGraph::from_text("a b").unwrap();
		match graph.successors("zzz") {
			Err(GraphError::NodeNotFound { word }) => assert_eq!(word, "zzz"),
			other => panic!("unexpected: {other:?}"),
		}
	}
}
