use std::cmp::min;
use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use crate::error::{GraphError, Result};

/// Below this number of pairs, counting runs on the calling thread.
const PARALLEL_THRESHOLD: usize = 50_000;

/// Number of chunks per CPU core for parallel counting.
const CHUNK_FACTOR: usize = 8;

/// Occurrence count of one ordered pair and where it was first seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PairStat {
	count: usize,
	/// Index of the first pair occurrence in the whole token sequence.
	first: usize,
}

/// Occurrence counts of ordered word pairs.
///
/// Each key `(from, to)` records how many times `to` immediately follows
/// `from` in a token sequence. This is the raw material of a `WordGraph`:
/// every key becomes one edge, its count becomes the edge weight.
///
/// ## Invariants
/// - Every stored count is strictly positive
/// - `first` is the smallest pair position seen, across merges too
#[derive(Clone, Debug, Default)]
pub(crate) struct EdgeCounts {
	counts: HashMap<(String, String), PairStat>,
}

impl EdgeCounts {
	/// Records one occurrence of `to` following `from` at pair position `position`.
	pub fn add_pair(&mut self, from: &str, to: &str, position: usize) {
		let stat = self
			.counts
			.entry((from.to_owned(), to.to_owned()))
			.or_insert(PairStat { count: 0, first: position });
		stat.count += 1;
		stat.first = stat.first.min(position);
	}

	/// Records every consecutive pair of `tokens`.
	///
	/// A sequence of `n` tokens yields `n - 1` pairs; fewer than 2 tokens yield none.
	pub fn add_sequence(&mut self, tokens: &[String]) {
		self.add_sequence_at(tokens, 0);
	}

	/// Like `add_sequence`, for a slice whose first pair sits at `offset`
	/// in the full sequence.
	fn add_sequence_at(&mut self, tokens: &[String], offset: usize) {
		for (i, pair) in tokens.windows(2).enumerate() {
			self.add_pair(&pair[0], &pair[1], offset + i);
		}
	}

	/// Returns how many times `to` followed `from` (0 if never).
	#[cfg(test)]
	pub fn get(&self, from: &str, to: &str) -> usize {
		self.counts.get(&(from.to_owned(), to.to_owned())).map_or(0, |s| s.count)
	}

	/// Number of distinct ordered pairs.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Merges another counter into this one, summing shared pairs and
	/// keeping the earliest first position.
	pub fn merge(&mut self, other: Self) {
		for (pair, stat) in other.counts {
			let entry = self.counts.entry(pair).or_insert(PairStat { count: 0, first: stat.first });
			entry.count += stat.count;
			entry.first = entry.first.min(stat.first);
		}
	}

	/// Consumes the counter into `(from, to, count)` triples ordered by the
	/// first appearance of each pair.
	pub fn into_ordered(self) -> Vec<(String, String, usize)> {
		let mut pairs: Vec<((String, String), PairStat)> = self.counts.into_iter().collect();
		pairs.sort_unstable_by_key(|(_, stat)| stat.first);
		pairs.into_iter().map(|((from, to), stat)| (from, to, stat.count)).collect()
	}

	/// Counts all consecutive pairs of `tokens`.
	///
	/// Large inputs are split across worker threads (CPU cores * factor chunks);
	/// small ones are counted inline.
	///
	/// # Errors
	/// Returns `GraphError::Build` if a worker fails to report its partial counts.
	pub fn count(tokens: &[String]) -> Result<Self> {
		let pairs = tokens.len().saturating_sub(1);
		if pairs < PARALLEL_THRESHOLD {
			let mut counts = Self::default();
			counts.add_sequence(tokens);
			return Ok(counts);
		}
		Self::count_chunked(tokens, num_cpus::get() * CHUNK_FACTOR)
	}

	/// Counts pairs with `chunks` worker threads and merges their partial results.
	///
	/// Pair `i` is `(tokens[i], tokens[i + 1])`. A chunk owning pairs `start..end`
	/// receives `tokens[start..=end]`, so neighbouring chunks share exactly one
	/// boundary token and every pair is counted once.
	pub(crate) fn count_chunked(tokens: &[String], chunks: usize) -> Result<Self> {
		let pairs = tokens.len().saturating_sub(1);
		if pairs == 0 {
			return Ok(Self::default());
		}
		let chunk_size = pairs.div_ceil(chunks.max(1));

		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for start in (0..pairs).step_by(chunk_size) {
			let end = min(start + chunk_size, pairs);
			let chunk: Vec<String> = tokens[start..=end].to_vec();
			let tx = tx.clone();

			thread::spawn(move || {
				let mut partial = EdgeCounts::default();
				partial.add_sequence_at(&chunk, start);
				// The receiver only disappears if the build was abandoned
				let _ = tx.send(partial);
			});
			spawned += 1;
		}
		drop(tx);

		let mut total = EdgeCounts::default();
		let mut received = 0;
		for partial in rx.iter() {
			total.merge(partial);
			received += 1;
		}

		if received != spawned {
			return Err(GraphError::Build(format!(
				"only {received} of {spawned} counting workers reported"
			)));
		}
		log::debug!("Counted {pairs} pairs in {spawned} chunks");
		Ok(total)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::tokenizer::tokenize;

	#[test]
	fn counts_exact_occurrences() {
		let mut counts = EdgeCounts::default();
		counts.add_sequence(&tokenize("a b a b"));
		assert_eq!(counts.get("a", "b"), 2);
		assert_eq!(counts.get("b", "a"), 1);
		assert_eq!(counts.get("b", "b"), 0);
		assert_eq!(counts.len(), 2);
	}

	#[test]
	fn short_sequences_have_no_pairs() {
		let mut counts = EdgeCounts::default();
		counts.add_sequence(&tokenize("alone"));
		counts.add_sequence(&[]);
		assert_eq!(counts.len(), 0);
	}

	#[test]
	fn merge_sums_counts() {
		let mut left = EdgeCounts::default();
		left.add_pair("x", "y", 3);
		let mut right = EdgeCounts::default();
		right.add_pair("y", "z", 5);
		right.add_pair("x", "y", 0);
		left.merge(right);
		assert_eq!(left.get("x", "y"), 2);
		assert_eq!(left.get("y", "z"), 1);
		assert_eq!(
			left.into_ordered(),
			vec![("x".to_owned(), "y".to_owned(), 2), ("y".to_owned(), "z".to_owned(), 1)]
		);
	}

	#[test]
	fn ordered_by_first_appearance() {
		let mut counts = EdgeCounts::default();
		counts.add_sequence(&tokenize("c b a c b a b"));
		let ordered: Vec<(String, String, usize)> = counts.into_ordered();
		assert_eq!(
			ordered,
			vec![
				("c".to_owned(), "b".to_owned(), 2),
				("b".to_owned(), "a".to_owned(), 2),
				("a".to_owned(), "c".to_owned(), 1),
				("a".to_owned(), "b".to_owned(), 1),
			]
		);
	}

	#[test]
	fn chunked_counting_matches_sequential() {
		let tokens = tokenize(&"the cat saw the dog and the dog saw the cat ".repeat(37));
		let mut sequential = EdgeCounts::default();
		sequential.add_sequence(&tokens);

		for chunks in [1, 2, 3, 7, 64, 10_000] {
			let chunked = EdgeCounts::count_chunked(&tokens, chunks).unwrap();
			assert_eq!(chunked.len(), sequential.len(), "chunks = {chunks}");
			for (pair, stat) in &sequential.counts {
				assert_eq!(chunked.counts.get(pair), Some(stat), "{pair:?}, chunks = {chunks}");
			}
		}
	}

	#[test]
	fn count_small_input_inline() {
		let counts = EdgeCounts::count(&tokenize("one two one two")).unwrap();
		assert_eq!(counts.get("one", "two"), 2);
		assert_eq!(counts.get("two", "one"), 1);
	}
}
