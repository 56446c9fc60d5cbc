//! Textual relevance between a normalized query and a listing.
//!
//! The score mixes a character-bigram Dice coefficient (tolerant of typos and partial words) with
//! fuzzy token coverage, then rewards verbatim phrase containment.

use std::collections::{HashMap, HashSet};

use crate::text::{NormalizedQuery, normalize_text};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
	pub dice: f32,
	pub token: f32,
	pub substring_bonus: f32,
}
impl Default for ScoringWeights {
	fn default() -> Self {
		Self { dice: 0.6, token: 0.4, substring_bonus: 0.2 }
	}
}

/// Normalized `title + " " + description`, the text every listing is scored against.
pub fn document_text(title: &str, description: &str) -> String {
	normalize_text(&format!("{title} {description}"))
}

pub fn bigrams(text: &str) -> Vec<(char, char)> {
	let chars: Vec<char> = text.chars().collect();

	chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Sørensen-Dice coefficient over the multisets of adjacent-character bigrams.
pub fn dice_coefficient(left: &str, right: &str) -> f32 {
	if left.is_empty() || right.is_empty() {
		return 0.0;
	}
	if left == right {
		return 1.0;
	}

	let left_bigrams = bigrams(left);
	let right_bigrams = bigrams(right);

	if left_bigrams.is_empty() || right_bigrams.is_empty() {
		return 0.0;
	}

	let mut remaining: HashMap<(char, char), usize> = HashMap::new();

	for bigram in &left_bigrams {
		*remaining.entry(*bigram).or_insert(0) += 1;
	}

	let mut matched = 0_usize;

	for bigram in &right_bigrams {
		if let Some(count) = remaining.get_mut(bigram)
			&& *count > 0
		{
			*count -= 1;
			matched += 1;
		}
	}

	(2 * matched) as f32 / (left_bigrams.len() + right_bigrams.len()) as f32
}

/// True when `left` and `right` are equal or one insertion, deletion or substitution apart.
pub fn edit_distance_one(left: &str, right: &str) -> bool {
	if left == right {
		return true;
	}

	let left: Vec<char> = left.chars().collect();
	let right: Vec<char> = right.chars().collect();
	let (shorter, longer) = if left.len() <= right.len() { (left, right) } else { (right, left) };

	if longer.len() - shorter.len() > 1 {
		return false;
	}

	let same_len = shorter.len() == longer.len();
	let mut i = 0;
	let mut j = 0;
	let mut edits = 0;

	while i < shorter.len() && j < longer.len() {
		if shorter[i] == longer[j] {
			i += 1;
			j += 1;

			continue;
		}

		edits += 1;

		if edits > 1 {
			return false;
		}
		if same_len {
			i += 1;
		}

		j += 1;
	}

	// Whatever is left over on the longer side is one trailing insertion.
	edits + (longer.len() - j) - (shorter.len() - i) <= 1
}

/// Share of query tokens found in the document, verbatim or within one edit.
pub fn token_coverage(query_tokens: &[String], document: &str) -> f32 {
	if query_tokens.is_empty() {
		return 0.0;
	}

	let document_tokens: HashSet<&str> = document.split_whitespace().collect();

	if document_tokens.is_empty() {
		return 0.0;
	}

	let matched = query_tokens
		.iter()
		.filter(|token| {
			document_tokens.contains(token.as_str())
				|| document_tokens.iter().any(|candidate| edit_distance_one(token, candidate))
		})
		.count();

	matched as f32 / query_tokens.len() as f32
}

/// Relevance of a normalized document to a query, clamped to `[0, 1]`.
pub fn relevance_score(query: &NormalizedQuery, document: &str, weights: &ScoringWeights) -> f32 {
	if query.is_empty() || document.is_empty() {
		return 0.0;
	}

	let dice = dice_coefficient(&query.normalized, document);
	let coverage = token_coverage(&query.tokens, document);
	let mut score = weights.dice * dice + weights.token * coverage;

	if document.contains(query.normalized.as_str()) {
		score += weights.substring_bonus;
	}
	if !score.is_finite() {
		return 0.0;
	}

	score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
	use crate::{
		similarity::{
			ScoringWeights, bigrams, dice_coefficient, document_text, edit_distance_one,
			relevance_score, token_coverage,
		},
		text::{MAX_QUERY_TOKENS, NormalizedQuery},
	};

	fn score(query: &str, title: &str, description: &str) -> f32 {
		let query = NormalizedQuery::new(query, MAX_QUERY_TOKENS);

		relevance_score(&query, &document_text(title, description), &ScoringWeights::default())
	}

	#[test]
	fn bigrams_are_adjacent_pairs() {
		assert_eq!(bigrams("abc"), vec![('a', 'b'), ('b', 'c')]);
		assert!(bigrams("a").is_empty());
	}

	#[test]
	fn dice_identities() {
		for text in ["a", "ab", "iphone 13", "night night"] {
			assert_eq!(dice_coefficient(text, text), 1.0);
			assert_eq!(dice_coefficient(text, ""), 0.0);
			assert_eq!(dice_coefficient("", text), 0.0);
		}

		assert_eq!(dice_coefficient("ab", "cd"), 0.0);
	}

	#[test]
	fn dice_counts_bigram_multiplicity() {
		// "aaa" has {aa, aa}; "aa" has {aa}. One shared pair out of three.
		let value = dice_coefficient("aaa", "aa");

		assert!((value - 2.0 / 3.0).abs() < 1e-6, "Unexpected dice value {value}.");
	}

	#[test]
	fn edit_distance_one_detects_single_edits() {
		assert!(edit_distance_one("bike", "bike"));
		assert!(edit_distance_one("bike", "bikes"));
		assert!(edit_distance_one("bikes", "bike"));
		assert!(edit_distance_one("bike", "hike"));
		assert!(edit_distance_one("bike", "bke"));
		assert!(edit_distance_one("", "a"));
		assert!(edit_distance_one("iphone", "iphne"));
	}

	#[test]
	fn edit_distance_one_rejects_two_or_more_edits() {
		assert!(!edit_distance_one("bike", "bk"));
		assert!(!edit_distance_one("bike", "hikes"));
		assert!(!edit_distance_one("bike", "kibe"));
		assert!(!edit_distance_one("abc", "cab"));
		assert!(!edit_distance_one("", "ab"));
		assert!(!edit_distance_one("table", "tablets"));
	}

	#[test]
	fn token_coverage_counts_fuzzy_matches() {
		let tokens = vec!["iphnoe".to_string(), "charger".to_string(), "case".to_string()];
		let coverage = token_coverage(&tokens, "iphone charger cable");

		// "iphnoe" is a transposition (two edits) so only "charger" matches.
		assert!((coverage - 1.0 / 3.0).abs() < 1e-6, "Unexpected coverage {coverage}.");
		assert_eq!(token_coverage(&[], "anything"), 0.0);
	}

	#[test]
	fn relevant_listing_scores_above_half() {
		let value = score("iphone 13", "iPhone 13 Pro Max 256GB", "Unlocked, battery health 91%.");

		assert!(value > 0.5, "Expected a strong match, got {value}.");
	}

	#[test]
	fn unrelated_listing_scores_near_zero() {
		let value = score("xyz123nonsense", "Wooden dining table", "Solid oak, seats six.");

		assert!(value < 0.1, "Expected a weak match, got {value}.");
	}

	#[test]
	fn typo_still_scores_better_than_unrelated_text() {
		let typo = score("mountian bike", "Mountain bike 29er", "Hydraulic brakes.");
		let unrelated = score("mountian bike", "Espresso machine", "Barely descaled.");

		assert!(typo > unrelated, "Expected {typo} > {unrelated}.");
	}

	#[test]
	fn score_stays_in_unit_interval() {
		let heavy = ScoringWeights { dice: 1.0, token: 1.0, substring_bonus: 1.0 };
		let query = NormalizedQuery::new("desk", MAX_QUERY_TOKENS);

		assert_eq!(relevance_score(&query, "desk", &heavy), 1.0);
		assert_eq!(relevance_score(&query, "", &heavy), 0.0);
		assert_eq!(
			relevance_score(&NormalizedQuery::default(), "desk", &ScoringWeights::default()),
			0.0
		);

		for (query, document) in
			[("a", "a"), ("lamp lamp lamp", "lamp"), ("z", "zzzzzz"), ("standing desk", "desk")]
		{
			let query = NormalizedQuery::new(query, MAX_QUERY_TOKENS);
			let value = relevance_score(&query, document, &ScoringWeights::default());

			assert!((0.0..=1.0).contains(&value), "Score {value} out of range.");
		}
	}
}
