use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use petgraph::graph::NodeIndex;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::graph::WordGraph;
use crate::error::Result;

/// How the walker picks its next edge and when it stops.
///
/// Edges are compared without direction: once `a -> b` is traversed,
/// `b -> a` counts as visited too.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WalkPolicy {
	/// Pick uniformly among successors whose edge is still unvisited;
	/// stop when there is none.
	#[default]
	UnvisitedOnly,
	/// Pick uniformly among all successors; stop, without moving, when the
	/// picked edge was already visited.
	StopOnRepeat,
}

impl FromStr for WalkPolicy {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.trim().to_lowercase().replace('_', "-").as_str() {
			"unvisited-only" | "unvisited" => Ok(WalkPolicy::UnvisitedOnly),
			"stop-on-repeat" | "repeat" => Ok(WalkPolicy::StopOnRepeat),
			other => Err(format!("Unknown walk policy '{other}' (expected 'unvisited-only' or 'stop-on-repeat')")),
		}
	}
}

impl fmt::Display for WalkPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WalkPolicy::UnvisitedOnly => write!(f, "unvisited-only"),
			WalkPolicy::StopOnRepeat => write!(f, "stop-on-repeat"),
		}
	}
}

/// A finished walk.
///
/// `edges[i]` is the edge from `path[i]` to `path[i + 1]`, so there is
/// always exactly one edge less than nodes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Walk {
	pub path: Vec<String>,
	pub edges: Vec<(String, String)>,
}

/// State of a walk after a given number of steps, for step-by-step replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkStep<'a> {
	/// 0 for the start node.
	pub index: usize,
	/// Node reached at this step.
	pub node: &'a str,
	/// Edges visited so far, in traversal order.
	pub visited: &'a [(String, String)],
}

impl Walk {
	/// Number of visited nodes (start included).
	pub fn len(&self) -> usize {
		self.path.len()
	}

	pub fn is_empty(&self) -> bool {
		self.path.is_empty()
	}

	/// Snapshot of every step, start node first.
	pub fn snapshots(&self) -> impl Iterator<Item = WalkStep<'_>> {
		self.path.iter().enumerate().map(|(index, node)| WalkStep {
			index,
			node,
			visited: &self.edges[..index.min(self.edges.len())],
		})
	}

	/// Words visited up to and including `step`, joined by spaces.
	///
	/// A step past the end yields the whole path.
	pub fn log_line(&self, step: usize) -> String {
		let end = step.saturating_add(1).min(self.path.len());
		self.path[..end].join(" ")
	}
}

/// Key of an undirected edge.
fn edge_key(u: NodeIndex, v: NodeIndex) -> (NodeIndex, NodeIndex) {
	if u <= v { (u, v) } else { (v, u) }
}

/// Stateful random walker over a `WordGraph`.
///
/// ## Lifecycle
/// - `start` picks a random start node (or `from_word` a given one)
/// - each `step` follows one random outgoing edge
/// - once a step returns `None` the walk is terminal; `finish` yields the `Walk`
///
/// Every successful step marks one more undirected edge as visited, so a walk
/// takes at most |E| steps.
#[derive(Debug)]
pub struct RandomWalker<'g> {
	graph: &'g WordGraph,
	policy: WalkPolicy,
	path: Vec<NodeIndex>,
	edges: Vec<(NodeIndex, NodeIndex)>,
	visited: HashSet<(NodeIndex, NodeIndex)>,
	terminal: bool,
}

impl<'g> RandomWalker<'g> {
	/// Starts a walk at a node chosen uniformly at random.
	///
	/// Returns `None` if the graph has no node.
	pub fn start<R: Rng + ?Sized>(graph: &'g WordGraph, policy: WalkPolicy, rng: &mut R) -> Option<Self> {
		if graph.is_empty() {
			return None;
		}
		let start = NodeIndex::new(rng.random_range(0..graph.node_count()));
		Some(Self::at(graph, policy, start))
	}

	/// Starts a walk at `word`.
	///
	/// # Errors
	/// Returns `GraphError::NodeNotFound` if the word is absent.
	pub fn from_word(graph: &'g WordGraph, word: &str, policy: WalkPolicy) -> Result<Self> {
		let start = graph.index_of(word)?;
		Ok(Self::at(graph, policy, start))
	}

	fn at(graph: &'g WordGraph, policy: WalkPolicy, start: NodeIndex) -> Self {
		log::debug!("Random walk starts at {} ({policy})", graph.word(start));
		Self {
			graph,
			policy,
			path: vec![start],
			edges: Vec::new(),
			visited: HashSet::new(),
			terminal: false,
		}
	}

	/// Word the walker currently stands on.
	pub fn current(&self) -> &'g str {
		let graph = self.graph;
		match self.path.last() {
			Some(node) => graph.word(*node),
			None => "",
		}
	}

	pub fn is_terminal(&self) -> bool {
		self.terminal
	}

	/// Words visited so far.
	pub fn path(&self) -> Vec<&'g str> {
		let graph = self.graph;
		self.path.iter().map(|n| graph.word(*n)).collect()
	}

	/// Follows one random outgoing edge.
	///
	/// Returns the word reached, or `None` once the walk is terminal.
	pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'g str> {
		if self.terminal {
			return None;
		}
		let Some(&current) = self.path.last() else {
			self.terminal = true;
			return None;
		};

		let successors = self.graph.sorted_successors(current);
		let next = match self.policy {
			WalkPolicy::UnvisitedOnly => {
				let open: Vec<NodeIndex> = successors
					.iter()
					.copied()
					.filter(|n| !self.visited.contains(&edge_key(current, *n)))
					.collect();
				open.choose(rng).copied()
			}
			WalkPolicy::StopOnRepeat => successors
				.choose(rng)
				.copied()
				.filter(|n| !self.visited.contains(&edge_key(current, *n))),
		};

		match next {
			Some(node) => {
				self.visited.insert(edge_key(current, node));
				self.edges.push((current, node));
				self.path.push(node);
				Some(self.graph.word(node))
			}
			None => {
				log::debug!("Random walk ends at {} after {} step(s)", self.graph.word(current), self.edges.len());
				self.terminal = true;
				None
			}
		}
	}

	/// Runs the walk until it is terminal.
	pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		while self.step(rng).is_some() {}
	}

	/// Converts the walker state into a `Walk`.
	pub fn finish(self) -> Walk {
		let graph = self.graph;
		Walk {
			path: self.path.iter().map(|n| graph.word(*n).to_owned()).collect(),
			edges: self
				.edges
				.iter()
				.map(|(u, v)| (graph.word(*u).to_owned(), graph.word(*v).to_owned()))
				.collect(),
		}
	}
}

/// Performs one complete random walk from a random start node.
///
/// Returns `None` if the graph is empty.
pub fn random_walk<R: Rng + ?Sized>(graph: &WordGraph, policy: WalkPolicy, rng: &mut R) -> Option<Walk> {
	let mut walker = RandomWalker::start(graph, policy, rng)?;
	walker.run(rng);
	Some(walker.finish())
}
