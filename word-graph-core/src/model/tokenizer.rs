use once_cell::sync::Lazy;
use regex::Regex;

/// Any character that is neither a word character nor whitespace.
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));

/// A maximal run of word characters.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Splits raw text into an ordered sequence of lowercase word tokens.
///
/// - Every character that is not a word character or whitespace becomes a space
/// - The result is split into maximal runs of word characters
/// - Each token is lowercased
///
/// Word characters follow Unicode rules (letters, digits, marks, `_`).
/// Returns an empty vector if the input contains no word character.
pub fn tokenize(text: &str) -> Vec<String> {
	let cleaned = PUNCTUATION.replace_all(text, " ");
	let lowered = cleaned.to_lowercase();
	WORD.find_iter(&lowered).map(|m| m.as_str().to_owned()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_punctuation_and_lowercases() {
		assert_eq!(
			tokenize("The quick, brown FOX! Jumps... over?"),
			vec!["the", "quick", "brown", "fox", "jumps", "over"]
		);
	}

	#[test]
	fn punctuation_splits_words() {
		// Apostrophes and hyphens are not word characters
		assert_eq!(tokenize("don't well-known"), vec!["don", "t", "well", "known"]);
	}

	#[test]
	fn keeps_digits_and_underscores() {
		assert_eq!(tokenize("route_66 in 1926"), vec!["route_66", "in", "1926"]);
	}

	#[test]
	fn line_breaks_are_whitespace() {
		assert_eq!(tokenize("end of line\nstart\tof next"), vec!["end", "of", "line", "start", "of", "next"]);
	}

	#[test]
	fn unicode_words() {
		assert_eq!(tokenize("Crème BRÛLÉE"), vec!["crème", "brûlée"]);
	}

	#[test]
	fn empty_and_degenerate_input() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("   ").is_empty());
		assert!(tokenize("?! ... ,;").is_empty());
	}
}
