use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{GraphError, Result};

/// Reads a whole UTF-8 text file into memory.
///
/// Unlike a line-based reader, line breaks are kept: they are plain
/// whitespace for the tokenizer, so words on consecutive lines stay adjacent.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|source| GraphError::Io { path: path.to_path_buf(), source })?;
	Ok(contents)
}

/// Trims and lowercases a query word so lookups are case-insensitive.
pub(crate) fn normalize_word(word: &str) -> String {
	word.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn read_file_keeps_line_breaks() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "first line\nsecond line").unwrap();
		let contents = read_file(file.path()).unwrap();
		assert_eq!(contents, "first line\nsecond line");
	}

	#[test]
	fn read_file_reports_path() {
		let err = read_file("/definitely/not/here.txt").unwrap_err();
		match err {
			GraphError::Io { path, .. } => assert_eq!(path, Path::new("/definitely/not/here.txt")),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn normalize_word_lowercases_and_trims() {
		assert_eq!(normalize_word("  The "), "the");
		assert_eq!(normalize_word("ÉCOLE"), "école");
	}
}
