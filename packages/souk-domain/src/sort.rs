use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, listing::Listing};

/// Client-facing sort choice. `Newest` is the default and the only mode that uses relevance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
	#[default]
	Newest,
	Oldest,
	PriceLow,
	PriceHigh,
	RatingHigh,
}
impl SortMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Newest => "newest",
			Self::Oldest => "oldest",
			Self::PriceLow => "price-low",
			Self::PriceHigh => "price-high",
			Self::RatingHigh => "rating-high",
		}
	}

	pub fn is_default(self) -> bool {
		self == Self::Newest
	}
}
impl FromStr for SortMode {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"newest" => Ok(Self::Newest),
			"oldest" => Ok(Self::Oldest),
			"price-low" | "price_low" => Ok(Self::PriceLow),
			"price-high" | "price_high" => Ok(Self::PriceHigh),
			"rating-high" | "rating_high" => Ok(Self::RatingHigh),
			_ => Err(Error::UnknownValue { field: "sort", value: raw.to_string() }),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
	CreatedAtDesc,
	CreatedAtAsc,
	PriceAsc,
	PriceDesc,
	SellerRatingDesc,
}

/// Storage-level ordering. Ties always fall back to `created_at` desc, then `listing_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
	pub boosted_first: bool,
	pub key: SortKey,
}
impl SortSpec {
	/// Order used when the requested page is read straight from storage.
	pub fn for_mode(mode: SortMode) -> Self {
		let key = match mode {
			SortMode::Newest => SortKey::CreatedAtDesc,
			SortMode::Oldest => SortKey::CreatedAtAsc,
			SortMode::PriceLow => SortKey::PriceAsc,
			SortMode::PriceHigh => SortKey::PriceDesc,
			SortMode::RatingHigh => SortKey::SellerRatingDesc,
		};

		Self { boosted_first: true, key }
	}

	/// Plain recency, used to pick the candidate window for relevance ranking.
	pub fn recency() -> Self {
		Self { boosted_first: false, key: SortKey::CreatedAtDesc }
	}

	pub fn compare(&self, left: &Listing, right: &Listing) -> Ordering {
		let boosted =
			if self.boosted_first { right.boosted.cmp(&left.boosted) } else { Ordering::Equal };

		boosted
			.then_with(|| match self.key {
				SortKey::CreatedAtDesc => right.created_at.cmp(&left.created_at),
				SortKey::CreatedAtAsc => left.created_at.cmp(&right.created_at),
				SortKey::PriceAsc => left.price.cmp(&right.price),
				SortKey::PriceDesc => right.price.cmp(&left.price),
				SortKey::SellerRatingDesc =>
					cmp_rating_desc(left.seller_rating, right.seller_rating),
			})
			.then_with(|| right.created_at.cmp(&left.created_at))
			.then_with(|| left.listing_id.cmp(&right.listing_id))
	}
}

/// Missing ratings sort after every rated listing.
fn cmp_rating_desc(left: Option<f32>, right: Option<f32>) -> Ordering {
	match (left, right) {
		(Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}
