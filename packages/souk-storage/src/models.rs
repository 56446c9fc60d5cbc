use std::str::FromStr;

use time::OffsetDateTime;
use uuid::Uuid;

use souk_domain::listing::{Condition, Listing, ListingStatus};

use crate::Error;

pub const LISTING_COLUMNS: &str = "listing_id, title, description, category, subcategory, price, \
	location, condition, seller_rating, created_at, boosted, boosted_at, status";

#[derive(Debug, sqlx::FromRow)]
pub struct ListingRow {
	pub listing_id: Uuid,
	pub title: String,
	pub description: String,
	pub category: String,
	pub subcategory: Option<String>,
	pub price: i64,
	pub location: String,
	pub condition: String,
	pub seller_rating: Option<f32>,
	pub created_at: OffsetDateTime,
	pub boosted: bool,
	pub boosted_at: Option<OffsetDateTime>,
	pub status: String,
}
impl TryFrom<ListingRow> for Listing {
	type Error = Error;

	fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
		let condition = Condition::from_str(&row.condition)
			.map_err(|err| Error::InvalidData(format!("listing {}: {err}", row.listing_id)))?;
		let status = ListingStatus::from_str(&row.status)
			.map_err(|err| Error::InvalidData(format!("listing {}: {err}", row.listing_id)))?;

		Ok(Self {
			listing_id: row.listing_id,
			title: row.title,
			description: row.description,
			category: row.category,
			subcategory: row.subcategory,
			price: row.price,
			location: row.location,
			condition,
			seller_rating: row.seller_rating,
			created_at: row.created_at,
			boosted: row.boosted,
			boosted_at: row.boosted_at,
			status,
		})
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct SearchCacheRow {
	pub cache_key: String,
	pub payload: serde_json::Value,
	pub created_at: OffsetDateTime,
	pub last_accessed_at: OffsetDateTime,
	pub expires_at: OffsetDateTime,
	pub hit_count: i64,
}
