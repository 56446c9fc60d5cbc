use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
	Active,
	Sold,
	Pending,
	Deleted,
}
impl ListingStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Active => "active",
			Self::Sold => "sold",
			Self::Pending => "pending",
			Self::Deleted => "deleted",
		}
	}
}
impl FromStr for ListingStatus {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"active" => Ok(Self::Active),
			"sold" => Ok(Self::Sold),
			"pending" => Ok(Self::Pending),
			"deleted" => Ok(Self::Deleted),
			_ => Err(Error::UnknownValue { field: "status", value: raw.to_string() }),
		}
	}
}
impl fmt::Display for ListingStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
	New,
	LikeNew,
	Good,
	Fair,
	Poor,
}
impl Condition {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::New => "new",
			Self::LikeNew => "like-new",
			Self::Good => "good",
			Self::Fair => "fair",
			Self::Poor => "poor",
		}
	}
}
impl FromStr for Condition {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"new" => Ok(Self::New),
			"like-new" | "like_new" => Ok(Self::LikeNew),
			"good" => Ok(Self::Good),
			"fair" => Ok(Self::Fair),
			"poor" => Ok(Self::Poor),
			_ => Err(Error::UnknownValue { field: "condition", value: raw.to_string() }),
		}
	}
}
impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A marketplace item as seen by search. Search never mutates listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
	#[serde(rename = "id")]
	pub listing_id: Uuid,
	pub title: String,
	pub description: String,
	pub category: String,
	#[serde(default)]
	pub subcategory: Option<String>,
	/// Integer price in minor currency units.
	pub price: i64,
	pub location: String,
	pub condition: Condition,
	#[serde(default)]
	pub seller_rating: Option<f32>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(default)]
	pub boosted: bool,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub boosted_at: Option<OffsetDateTime>,
	pub status: ListingStatus,
}
impl Listing {
	pub fn is_active(&self) -> bool {
		self.status == ListingStatus::Active
	}
}
