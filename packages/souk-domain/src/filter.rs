use crate::{
	Result,
	listing::{Condition, Listing, ListingStatus},
	pattern::SafePattern,
	query::QuerySpec,
	text::NormalizedQuery,
};

/// Storage-agnostic search predicate.
///
/// Backends either evaluate it in-process through [`ListingFilter::matches`] or compile it to
/// their own query language. Substring conditions are always [`SafePattern`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
	pub status: ListingStatus,
	pub category: Option<String>,
	pub subcategory: Option<String>,
	pub condition: Option<Condition>,
	pub location: Option<SafePattern>,
	pub min_price: Option<i64>,
	pub max_price: Option<i64>,
	/// Any token may match the title or the description.
	pub text: Vec<SafePattern>,
}
impl ListingFilter {
	pub fn build(spec: &QuerySpec, query: &NormalizedQuery) -> Result<Self> {
		let location = match non_blank(spec.location.as_deref()) {
			Some(location) => Some(SafePattern::substring(location)?),
			None => None,
		};
		let text = if spec.has_text() {
			query
				.tokens
				.iter()
				.map(|token| SafePattern::substring(token))
				.collect::<Result<Vec<_>>>()?
		} else {
			Vec::new()
		};

		Ok(Self {
			status: ListingStatus::Active,
			category: non_blank(spec.category.as_deref()).map(str::to_string),
			subcategory: non_blank(spec.subcategory.as_deref()).map(str::to_string),
			condition: spec.condition,
			location,
			min_price: spec.min_price,
			max_price: spec.max_price,
			text,
		})
	}

	pub fn matches(&self, listing: &Listing) -> bool {
		if listing.status != self.status {
			return false;
		}
		if let Some(category) = self.category.as_deref()
			&& listing.category != category
		{
			return false;
		}
		if let Some(subcategory) = self.subcategory.as_deref()
			&& listing.subcategory.as_deref() != Some(subcategory)
		{
			return false;
		}
		if let Some(condition) = self.condition
			&& listing.condition != condition
		{
			return false;
		}
		if let Some(location) = self.location.as_ref()
			&& !location.is_match(&listing.location)
		{
			return false;
		}
		if self.min_price.is_some_and(|min| listing.price < min) {
			return false;
		}
		if self.max_price.is_some_and(|max| listing.price > max) {
			return false;
		}
		if self.text.is_empty() {
			return true;
		}

		self.text
			.iter()
			.any(|pattern| pattern.is_match(&listing.title) || pattern.is_match(&listing.description))
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;
	use uuid::Uuid;

	use crate::{
		filter::ListingFilter,
		listing::{Condition, Listing, ListingStatus},
		query::QuerySpec,
		text::{MAX_QUERY_TOKENS, NormalizedQuery},
	};

	fn listing(title: &str, price: i64) -> Listing {
		Listing {
			listing_id: Uuid::new_v4(),
			title: title.to_string(),
			description: "Pickup only.".to_string(),
			category: "electronics".to_string(),
			subcategory: Some("phones".to_string()),
			price,
			location: "Berlin, Kreuzberg".to_string(),
			condition: Condition::Good,
			seller_rating: Some(4.5),
			created_at: datetime!(2026-01-10 12:00 UTC),
			boosted: false,
			boosted_at: None,
			status: ListingStatus::Active,
		}
	}

	fn build(spec: &QuerySpec) -> ListingFilter {
		let query = NormalizedQuery::new(spec.text.as_deref().unwrap_or(""), MAX_QUERY_TOKENS);

		ListingFilter::build(spec, &query).expect("Expected filter.")
	}

	#[test]
	fn inactive_listings_never_match() {
		let filter = build(&QuerySpec::default());
		let mut sold = listing("iPhone 12", 30_000);

		assert!(filter.matches(&sold));

		sold.status = ListingStatus::Sold;

		assert!(!filter.matches(&sold));
	}

	#[test]
	fn price_bounds_are_inclusive() {
		let filter = build(&QuerySpec {
			min_price: Some(100),
			max_price: Some(200),
			..Default::default()
		});

		assert!(filter.matches(&listing("Lamp", 100)));
		assert!(filter.matches(&listing("Lamp", 200)));
		assert!(!filter.matches(&listing("Lamp", 99)));
		assert!(!filter.matches(&listing("Lamp", 201)));
	}

	#[test]
	fn location_is_case_insensitive_substring() {
		let filter = build(&QuerySpec { location: Some("kreuz".to_string()), ..Default::default() });
		let mut item = listing("Lamp", 100);

		assert!(filter.matches(&item));

		item.location = "Hamburg".to_string();

		assert!(!filter.matches(&item));
	}

	#[test]
	fn location_metacharacters_are_literal() {
		let filter = build(&QuerySpec { location: Some(".*".to_string()), ..Default::default() });

		assert!(!filter.matches(&listing("Lamp", 100)));
	}

	#[test]
	fn text_matches_any_token_in_title_or_description() {
		let filter = build(&QuerySpec { text: Some("pickup tablet".to_string()), ..Default::default() });

		assert_eq!(filter.text.len(), 2);
		assert!(filter.matches(&listing("Desk", 100)));

		let filter = build(&QuerySpec { text: Some("tablet".to_string()), ..Default::default() });

		assert!(!filter.matches(&listing("Desk", 100)));
		assert!(filter.matches(&listing("Samsung TABLET", 100)));
	}

	#[test]
	fn exact_fields_must_match() {
		let filter = build(&QuerySpec {
			category: Some("electronics".to_string()),
			subcategory: Some("laptops".to_string()),
			..Default::default()
		});

		assert!(!filter.matches(&listing("Phone", 100)));

		let filter = build(&QuerySpec {
			condition: Some(Condition::Good),
			category: Some("  ".to_string()),
			..Default::default()
		});

		assert!(filter.category.is_none());
		assert!(filter.matches(&listing("Phone", 100)));
	}
}
