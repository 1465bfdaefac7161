use std::collections::HashSet;

use petgraph::graph::{DiGraph, NodeIndex};

/// Node → direct successors projection of a `WordGraph`.
///
/// Built once right after the graph, which is never mutated afterwards.
/// Successor lists are sorted by word so every query iterating them is
/// reproducible; a parallel hash set answers membership checks.
#[derive(Clone, Debug, Default)]
pub(crate) struct SuccessorIndex {
	ordered: Vec<Vec<NodeIndex>>,
	lookup: Vec<HashSet<NodeIndex>>,
}

impl SuccessorIndex {
	/// Builds the index in time linear in the edge count (plus sorting).
	pub fn build(graph: &DiGraph<String, usize>) -> Self {
		let mut ordered: Vec<Vec<NodeIndex>> = vec![Vec::new(); graph.node_count()];
		for node in graph.node_indices() {
			let mut successors: Vec<NodeIndex> = graph.neighbors(node).collect();
			successors.sort_by(|a, b| graph[*a].cmp(&graph[*b]));
			ordered[node.index()] = successors;
		}
		let lookup = ordered.iter().map(|s| s.iter().copied().collect()).collect();
		Self { ordered, lookup }
	}

	/// Direct successors of `node`, sorted by word.
	pub fn get(&self, node: NodeIndex) -> &[NodeIndex] {
		self.ordered.get(node.index()).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Whether an edge `from -> to` exists.
	pub fn contains(&self, from: NodeIndex, to: NodeIndex) -> bool {
		self.lookup.get(from.index()).is_some_and(|s| s.contains(&to))
	}
}
