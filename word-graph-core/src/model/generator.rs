use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::bridge::bridge_nodes;
use super::graph::WordGraph;
use super::tokenizer::tokenize;

/// One word of a generated text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
	pub word: String,
	/// `true` if the word is a bridge inserted by the generator.
	pub inserted: bool,
}

/// A bridge insertion between two adjacent words of the input.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Insertion {
	pub from: String,
	pub to: String,
	/// Every bridge word available for this pair, sorted.
	pub candidates: Vec<String>,
	/// The bridge that was actually inserted.
	pub chosen: String,
}

/// Result of `generate_new_text`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedText {
	pub segments: Vec<Segment>,
	pub insertions: Vec<Insertion>,
}

impl GeneratedText {
	/// Output words joined with single spaces.
	pub fn text(&self) -> String {
		self.segments.iter().map(|s| s.word.as_str()).collect::<Vec<_>>().join(" ")
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}
}

/// Rewrites `text` by inserting bridge words between adjacent words.
///
/// The input is tokenized like the corpus. For each adjacent pair `(w1, w2)`
/// having at least one bridge word, one of them is picked uniformly at random
/// and inserted between the two. Words absent from the graph never get a bridge.
///
/// # Notes
/// - Fewer than 2 words: the (possibly empty) input comes back unchanged.
/// - All randomness comes from `rng`, so a seeded generator reproduces output.
pub fn generate_new_text<R: Rng + ?Sized>(graph: &WordGraph, text: &str, rng: &mut R) -> GeneratedText {
	let words = tokenize(text);
	let mut generated = GeneratedText::default();

	for pair in words.windows(2) {
		let (w1, w2) = (&pair[0], &pair[1]);
		generated.segments.push(Segment { word: w1.clone(), inserted: false });

		let candidates: Vec<String> = match (graph.index_of(w1), graph.index_of(w2)) {
			(Ok(from), Ok(to)) => bridge_nodes(graph, from, to)
				.into_iter()
				.map(|x| graph.word(x).to_owned())
				.collect(),
			_ => Vec::new(),
		};

		if let Some(chosen) = candidates.choose(rng).cloned() {
			log::debug!("Bridge {w1} -> {chosen} -> {w2} ({} candidates)", candidates.len());
			generated.segments.push(Segment { word: chosen.clone(), inserted: true });
			generated.insertions.push(Insertion { from: w1.clone(), to: w2.clone(), candidates, chosen });
		}
	}

	if let Some(last) = words.last() {
		generated.segments.push(Segment { word: last.clone(), inserted: false });
	}

	generated
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn inserts_bridge_between_pair() {
		let graph = WordGraph::from_text("the quick fox").unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		let generated = generate_new_text(&graph, "The fox", &mut rng);
		assert_eq!(generated.text(), "the quick fox");
		assert_eq!(
			generated.segments,
			vec![
				Segment { word: "the".into(), inserted: false },
				Segment { word: "quick".into(), inserted: true },
				Segment { word: "fox".into(), inserted: false },
			]
		);
		assert_eq!(generated.insertions.len(), 1);
		assert_eq!(generated.insertions[0].candidates, vec!["quick"]);
	}

	#[test]
	fn unbridgeable_text_is_unchanged() {
		let graph = WordGraph::from_text("the quick fox").unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		let generated = generate_new_text(&graph, "Seek, a NEW life!", &mut rng);
		assert_eq!(generated.text(), "seek a new life");
		assert!(generated.insertions.is_empty());
		assert!(generated.segments.iter().all(|s| !s.inserted));
	}

	#[test]
	fn short_inputs() {
		let graph = WordGraph::from_text("the quick fox").unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		assert!(generate_new_text(&graph, "", &mut rng).is_empty());
		assert_eq!(generate_new_text(&graph, "  ?! ", &mut rng).text(), "");
		assert_eq!(generate_new_text(&graph, "Fox", &mut rng).text(), "fox");
	}

	#[test]
	fn chosen_bridge_is_a_candidate_and_reproducible() {
		let graph = WordGraph::from_text("a x b a y b a z b").unwrap();
		let first = generate_new_text(&graph, "a b a b", &mut StdRng::seed_from_u64(42));
		let second = generate_new_text(&graph, "a b a b", &mut StdRng::seed_from_u64(42));
		assert_eq!(first, second);

		// a b a b -> three pairs: (a, b) and (a, b) have bridges, (b, a) has none
		assert_eq!(first.insertions.len(), 2);
		for insertion in &first.insertions {
			assert_eq!(insertion.candidates, vec!["x", "y", "z"]);
			assert!(insertion.candidates.contains(&insertion.chosen));
		}
		assert_eq!(first.segments.len(), 6);
	}

	#[test]
	fn every_candidate_gets_picked_eventually() {
		let graph = WordGraph::from_text("a x b a y b").unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		let mut seen = std::collections::HashSet::new();
		for _ in 0..200 {
			let generated = generate_new_text(&graph, "a b", &mut rng);
			seen.insert(generated.insertions[0].chosen.clone());
		}
		assert_eq!(seen.len(), 2);
	}
}
