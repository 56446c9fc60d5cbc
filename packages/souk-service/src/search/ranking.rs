use std::cmp::Ordering;

use souk_domain::{
	listing::Listing,
	similarity::{ScoringWeights, document_text, relevance_score},
	text::NormalizedQuery,
};

#[derive(Debug, Clone)]
pub struct ScoredListing {
	pub listing: Listing,
	pub score: f32,
}

pub fn score_candidates(
	candidates: Vec<Listing>,
	query: &NormalizedQuery,
	weights: &ScoringWeights,
) -> Vec<ScoredListing> {
	candidates
		.into_iter()
		.map(|listing| {
			let document = document_text(&listing.title, &listing.description);
			let score = relevance_score(query, &document, weights);

			ScoredListing { listing, score }
		})
		.collect()
}

/// Boosted first, then score, then recency. `listing_id` makes the order total.
pub fn rank_scored(items: &mut [ScoredListing]) {
	items.sort_by(|left, right| {
		right
			.listing
			.boosted
			.cmp(&left.listing.boosted)
			.then_with(|| cmp_f32_desc(left.score, right.score))
			.then_with(|| right.listing.created_at.cmp(&left.listing.created_at))
			.then_with(|| left.listing.listing_id.cmp(&right.listing.listing_id))
	});
}

fn cmp_f32_desc(left: f32, right: f32) -> Ordering {
	right.total_cmp(&left)
}
