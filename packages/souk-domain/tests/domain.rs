use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

use souk_domain::{
	filter::ListingFilter,
	listing::{Condition, Listing, ListingStatus},
	query::QuerySpec,
	similarity::{ScoringWeights, document_text, relevance_score},
	sort::{SortMode, SortSpec},
	text::{MAX_QUERY_TOKENS, NormalizedQuery},
};

const BASE: OffsetDateTime = datetime!(2026-03-01 09:00 UTC);

fn listing(title: &str, price: i64, age_hours: i64, boosted: bool) -> Listing {
	Listing {
		listing_id: Uuid::new_v4(),
		title: title.to_string(),
		description: String::new(),
		category: "home".to_string(),
		subcategory: None,
		price,
		location: "Lisbon".to_string(),
		condition: Condition::Fair,
		seller_rating: None,
		created_at: BASE - Duration::hours(age_hours),
		boosted,
		boosted_at: boosted.then_some(BASE),
		status: ListingStatus::Active,
	}
}

#[test]
fn listing_serializes_with_public_field_names() {
	let item = listing("Oak chair", 4_500, 1, true);
	let value = serde_json::to_value(&item).expect("Failed to encode listing.");

	assert_eq!(value["id"], serde_json::json!(item.listing_id));
	assert_eq!(value["condition"], "fair");
	assert_eq!(value["status"], "active");
	assert!(value.get("sellerRating").is_some());
	assert!(value.get("listingId").is_none());

	let decoded: Listing = serde_json::from_value(value).expect("Failed to decode listing.");

	assert_eq!(decoded, item);
}

#[test]
fn every_sort_mode_keeps_boosted_listings_first() {
	let mut items = vec![
		listing("cheap", 100, 1, false),
		listing("boosted pricey", 9_000, 30, true),
		listing("pricey", 8_000, 2, false),
		listing("boosted cheap", 50, 40, true),
	];

	for mode in [
		SortMode::Newest,
		SortMode::Oldest,
		SortMode::PriceLow,
		SortMode::PriceHigh,
		SortMode::RatingHigh,
	] {
		let spec = SortSpec::for_mode(mode);

		items.sort_by(|left, right| spec.compare(left, right));

		assert!(items[0].boosted && items[1].boosted, "Boosted listings not first for {mode:?}.");
		assert!(!items[2].boosted && !items[3].boosted);
	}
}

#[test]
fn price_sort_breaks_ties_by_recency() {
	let older = listing("older", 500, 10, false);
	let newer = listing("newer", 500, 1, false);
	let mut items = vec![older.clone(), newer.clone()];
	let spec = SortSpec::for_mode(SortMode::PriceLow);

	items.sort_by(|left, right| spec.compare(left, right));

	assert_eq!(items[0].listing_id, newer.listing_id);
}

#[test]
fn rating_sort_puts_missing_ratings_last() {
	let mut rated = listing("rated", 100, 5, false);
	let unrated = listing("unrated", 100, 1, false);
	let mut low = listing("low", 100, 3, false);

	rated.seller_rating = Some(4.9);
	low.seller_rating = Some(1.0);

	let mut items = vec![unrated, low, rated];
	let spec = SortSpec::for_mode(SortMode::RatingHigh);

	items.sort_by(|left, right| spec.compare(left, right));

	let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();

	assert_eq!(titles, vec!["rated", "low", "unrated"]);
}

#[test]
fn filtered_listings_score_by_relevance() {
	let spec = QuerySpec { text: Some("Standing desk!".to_string()), ..Default::default() };
	let query = NormalizedQuery::new(spec.text.as_deref().unwrap_or(""), MAX_QUERY_TOKENS);
	let filter = ListingFilter::build(&spec, &query).expect("Expected filter.");
	let exact = listing("Standing desk, electric", 30_000, 1, false);
	let partial = listing("Desk lamp", 2_000, 1, false);
	let unrelated = listing("Bicycle", 20_000, 1, false);

	assert!(filter.matches(&exact));
	assert!(filter.matches(&partial));
	assert!(!filter.matches(&unrelated));

	let weights = ScoringWeights::default();
	let exact_score =
		relevance_score(&query, &document_text(&exact.title, &exact.description), &weights);
	let partial_score =
		relevance_score(&query, &document_text(&partial.title, &partial.description), &weights);

	assert!(exact_score > partial_score, "Expected {exact_score} > {partial_score}.");
}
