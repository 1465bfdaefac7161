//! Weighted shortest paths over the word graph.
//!
//! Edge weights (pair counts) are used as costs, so a path's length is the
//! sum of its edge weights, not its hop count. Weights are always >= 1,
//! which keeps the predecessor graph produced by Dijkstra acyclic.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::graph::WordGraph;
use crate::error::Result;

/// A single path with its total weight.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WeightedPath {
	pub nodes: Vec<String>,
	pub weight: usize,
}

impl WeightedPath {
	/// Consecutive `(from, to)` pairs of the path.
	pub fn edges(&self) -> Vec<(&str, &str)> {
		self.nodes.windows(2).map(|w| (w[0].as_str(), w[1].as_str())).collect()
	}
}

/// Every minimum-weight path between two words.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PathSet {
	pub from: String,
	pub to: String,
	/// Shared total weight of all paths.
	pub weight: usize,
	/// Tied shortest paths, sorted lexicographically.
	pub paths: Vec<Vec<String>>,
}

impl PathSet {
	/// Iterates the tied paths as `WeightedPath`s.
	pub fn weighted_paths(&self) -> impl Iterator<Item = WeightedPath> + '_ {
		self.paths.iter().map(|nodes| WeightedPath { nodes: nodes.clone(), weight: self.weight })
	}
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct DijkstraState {
	cost: usize,
	node: NodeIndex,
}

impl Ord for DijkstraState {
	fn cmp(&self, other: &Self) -> Ordering {
		// Reversed for a min-heap
		other.cost.cmp(&self.cost).then_with(|| other.node.cmp(&self.node))
	}
}

impl PartialOrd for DijkstraState {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Distances from a source plus every minimal predecessor of each reached node.
struct ShortestTree {
	dist: HashMap<NodeIndex, usize>,
	preds: HashMap<NodeIndex, Vec<NodeIndex>>,
}

/// Dijkstra from `source`, recording all tied predecessors.
///
/// Stops early once `target` is settled: every predecessor of a settled node
/// is strictly closer, hence already settled and relaxed.
fn dijkstra(graph: &WordGraph, source: NodeIndex, target: Option<NodeIndex>) -> ShortestTree {
	let inner = graph.inner();
	let mut dist: HashMap<NodeIndex, usize> = HashMap::new();
	let mut preds: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
	let mut heap = BinaryHeap::new();

	dist.insert(source, 0);
	heap.push(DijkstraState { cost: 0, node: source });

	while let Some(DijkstraState { cost, node }) = heap.pop() {
		if dist.get(&node).is_some_and(|best| cost > *best) {
			continue;
		}
		if Some(node) == target {
			break;
		}

		for edge in inner.edges(node) {
			let next = edge.target();
			let next_cost = cost + *edge.weight();

			match dist.get(&next) {
				Some(&best) if next_cost > best => {}
				Some(&best) if next_cost == best => {
					preds.entry(next).or_default().push(node);
				}
				_ => {
					dist.insert(next, next_cost);
					preds.insert(next, vec![node]);
					heap.push(DijkstraState { cost: next_cost, node: next });
				}
			}
		}
	}

	ShortestTree { dist, preds }
}

/// Walks predecessor lists back from `node` to `source`, emitting every path.
fn collect_paths(
	graph: &WordGraph,
	tree: &ShortestTree,
	source: NodeIndex,
	node: NodeIndex,
	suffix: &mut Vec<NodeIndex>,
	out: &mut Vec<Vec<String>>,
) {
	suffix.push(node);
	if node == source {
		out.push(suffix.iter().rev().map(|n| graph.word(*n).to_owned()).collect());
	} else if let Some(preds) = tree.preds.get(&node) {
		for pred in preds {
			collect_paths(graph, tree, source, *pred, suffix, out);
		}
	}
	suffix.pop();
}

/// One shortest path to `node`, choosing the alphabetically smallest
/// predecessor at each tie.
fn representative_path(graph: &WordGraph, tree: &ShortestTree, source: NodeIndex, node: NodeIndex) -> Vec<String> {
	let mut path = vec![node];
	let mut current = node;
	while current != source {
		let next = tree
			.preds
			.get(&current)
			.and_then(|preds| preds.iter().min_by(|a, b| graph.word(**a).cmp(graph.word(**b))));
		match next {
			Some(pred) => {
				path.push(*pred);
				current = *pred;
			}
			None => break,
		}
	}
	path.into_iter().rev().map(|n| graph.word(n).to_owned()).collect()
}

/// Returns every minimum-weight path from `from` to `to`.
///
/// - `Ok(None)` when `to` is unreachable from `from` (not an error)
/// - `from == to` yields the single path `[from]` with weight 0
///
/// # Errors
/// Returns `GraphError::NodeNotFound` if either word is absent.
pub fn shortest_paths(graph: &WordGraph, from: &str, to: &str) -> Result<Option<PathSet>> {
	let source = graph.index_of(from)?;
	let target = graph.index_of(to)?;
	let (from, to) = (graph.word(source).to_owned(), graph.word(target).to_owned());

	if source == target {
		return Ok(Some(PathSet { paths: vec![vec![from.clone()]], from, to, weight: 0 }));
	}

	let tree = dijkstra(graph, source, Some(target));
	let Some(&weight) = tree.dist.get(&target) else {
		log::debug!("No path from {from} to {to}");
		return Ok(None);
	};

	let mut paths = Vec::new();
	collect_paths(graph, &tree, source, target, &mut Vec::new(), &mut paths);
	paths.sort();
	log::debug!("{} shortest path(s) from {from} to {to}, weight {weight}", paths.len());

	Ok(Some(PathSet { from, to, weight, paths }))
}

/// Returns one shortest path from `from` to every other reachable word.
///
/// Ties are not enumerated here: each target gets a single representative
/// path. Unreachable words are absent from the map.
///
/// # Errors
/// Returns `GraphError::NodeNotFound` if `from` is absent.
pub fn shortest_paths_from(graph: &WordGraph, from: &str) -> Result<BTreeMap<String, WeightedPath>> {
	let source = graph.index_of(from)?;
	let tree = dijkstra(graph, source, None);

	let paths: BTreeMap<String, WeightedPath> = tree
		.dist
		.iter()
		.filter(|(node, _)| **node != source)
		.map(|(node, weight)| {
			let nodes = representative_path(graph, &tree, source, *node);
			(graph.word(*node).to_owned(), WeightedPath { nodes, weight: *weight })
		})
		.collect();

	log::debug!("{} word(s) reachable from {}", paths.len(), graph.word(source));
	Ok(paths)
}
