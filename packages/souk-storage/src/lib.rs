pub mod cache;
pub mod db;
pub mod listings;
pub mod memory;
pub mod models;
pub mod schema;

mod error;

pub use error::Error;

use std::{future::Future, pin::Pin};

use serde_json::Value;
use time::Duration;

use souk_domain::{filter::ListingFilter, listing::Listing, sort::SortSpec};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read side of the listing catalog as seen by search.
pub trait ListingStore
where
	Self: Send + Sync,
{
	/// Number of listings matching `filter`, independent of any paging.
	fn count<'a>(&'a self, filter: &'a ListingFilter) -> BoxFuture<'a, Result<u64>>;

	/// Listings matching `filter` in `sort` order, starting at `skip`, at most `limit` items.
	fn find<'a>(
		&'a self,
		filter: &'a ListingFilter,
		sort: SortSpec,
		skip: u64,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<Listing>>>;
}

/// Key-value store for serialized search result pages.
pub trait SearchCache
where
	Self: Send + Sync,
{
	/// Backend label used in logs.
	fn kind(&self) -> &'static str;

	/// Returns the stored value unless it is missing or expired.
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>>;

	/// Stores `value` under `key`, replacing any previous entry, for `ttl`.
	fn set<'a>(&'a self, key: &'a str, value: &'a Value, ttl: Duration) -> BoxFuture<'a, Result<()>>;

	/// Removes every entry whose key starts with `prefix` and returns how many were removed.
	fn invalidate_prefix<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<u64>>;
}
