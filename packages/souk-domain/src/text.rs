use std::collections::HashSet;

pub const MAX_QUERY_TOKENS: usize = 6;

const MIN_TOKEN_CHARS: usize = 2;
const STOPWORDS: &[&str] = &[
	"a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "in", "into", "is", "it",
	"its", "of", "on", "or", "so", "than", "that", "the", "this", "to", "with", "brand", "condition",
	"excellent", "great", "mint", "new", "sale", "sell", "selling", "used",
];

/// A free-text query after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedQuery {
	/// Lowercased, punctuation replaced with spaces, whitespace collapsed.
	pub normalized: String,
	pub tokens: Vec<String>,
}
impl NormalizedQuery {
	pub fn new(raw: &str, max_tokens: usize) -> Self {
		let normalized = normalize_text(raw);
		let tokens = tokenize_normalized(&normalized, max_tokens);

		Self { normalized, tokens }
	}

	pub fn is_empty(&self) -> bool {
		self.normalized.is_empty()
	}
}

pub fn is_stopword(token: &str) -> bool {
	STOPWORDS.contains(&token)
}

pub fn normalize_text(raw: &str) -> String {
	let mut spaced = String::with_capacity(raw.len());

	for ch in raw.chars().flat_map(char::to_lowercase) {
		if ch.is_alphanumeric() {
			spaced.push(ch);
		} else {
			spaced.push(' ');
		}
	}

	let mut out = String::with_capacity(spaced.len());

	for part in spaced.split_whitespace() {
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(part);
	}

	out
}

pub fn tokenize(raw: &str, max_tokens: usize) -> Vec<String> {
	tokenize_normalized(&normalize_text(raw), max_tokens)
}

/// Joins tokens back into text that tokenizes to the same list.
pub fn tokens_to_string(tokens: &[String]) -> String {
	tokens.join(" ")
}

fn tokenize_normalized(normalized: &str, max_tokens: usize) -> Vec<String> {
	if max_tokens == 0 {
		return Vec::new();
	}

	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in normalized.split(' ') {
		if token.chars().count() < MIN_TOKEN_CHARS || is_stopword(token) {
			continue;
		}
		if seen.insert(token) {
			out.push(token.to_string());
		}
		if out.len() >= max_tokens {
			break;
		}
	}

	// A query made only of stopwords or single characters still searches for something.
	if out.is_empty() && !normalized.is_empty() {
		out.push(normalized.to_string());
	}

	out
}

#[cfg(test)]
mod tests {
	use crate::text::{
		MAX_QUERY_TOKENS, NormalizedQuery, is_stopword, normalize_text, tokenize, tokens_to_string,
	};

	#[test]
	fn normalize_replaces_punctuation_and_collapses_whitespace() {
		assert_eq!(normalize_text("  iPhone-13,   PRO!! max "), "iphone 13 pro max");
		assert_eq!(normalize_text("...!!"), "");
		assert_eq!(normalize_text(""), "");
	}

	#[test]
	fn tokenize_drops_stopwords_short_tokens_and_duplicates() {
		let tokens = tokenize("The used Bike for sale, bike x helmet", MAX_QUERY_TOKENS);

		assert_eq!(tokens, vec!["bike".to_string(), "helmet".to_string()]);
	}

	#[test]
	fn tokenize_caps_token_count() {
		let tokens = tokenize("one two three four five six seven eight", MAX_QUERY_TOKENS);

		assert_eq!(tokens.len(), MAX_QUERY_TOKENS);
		assert_eq!(tokens.last().map(String::as_str), Some("six"));
	}

	#[test]
	fn tokenize_falls_back_to_whole_query_when_everything_is_filtered() {
		assert_eq!(tokenize("The NEW sale", MAX_QUERY_TOKENS), vec!["the new sale".to_string()]);
		assert_eq!(tokenize("x", MAX_QUERY_TOKENS), vec!["x".to_string()]);
		assert!(tokenize("  ?! ", MAX_QUERY_TOKENS).is_empty());
	}

	#[test]
	fn tokenize_is_idempotent() {
		for raw in [
			"Vintage Leica M6 camera, mint condition!",
			"the a an",
			"sofa sofa SOFA couch",
			"Ünïcode Straße 42",
			"a b c d e f g h i j k",
		] {
			let first = tokenize(raw, MAX_QUERY_TOKENS);
			let second = tokenize(&tokens_to_string(&first), MAX_QUERY_TOKENS);

			assert_eq!(first, second, "Tokenization was not idempotent for {raw:?}.");
		}
	}

	#[test]
	fn normalized_query_tracks_both_forms() {
		let query = NormalizedQuery::new("Mountain-Bike (26\")", MAX_QUERY_TOKENS);

		assert_eq!(query.normalized, "mountain bike 26");
		assert_eq!(query.tokens, vec!["mountain".to_string(), "bike".to_string(), "26".to_string()]);
		assert!(!query.is_empty());
		assert!(NormalizedQuery::new("", MAX_QUERY_TOKENS).is_empty());
	}

	#[test]
	fn stopwords_include_marketplace_filler() {
		for word in ["used", "new", "sale", "condition", "the", "for"] {
			assert!(is_stopword(word), "Expected {word:?} to be a stopword.");
		}

		assert!(!is_stopword("bike"));
	}
}
