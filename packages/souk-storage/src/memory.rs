use std::{fs, path::Path, sync::RwLock};

use souk_domain::{filter::ListingFilter, listing::Listing, sort::SortSpec};

use crate::{BoxFuture, Error, ListingStore, Result};

/// Process-local listing catalog evaluated with [`ListingFilter::matches`].
#[derive(Default)]
pub struct MemoryListingStore {
	listings: RwLock<Vec<Listing>>,
}
impl MemoryListingStore {
	pub fn new(listings: Vec<Listing>) -> Self {
		Self { listings: RwLock::new(listings) }
	}

	/// Loads a JSON array of listings.
	pub fn from_seed_file(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|source| Error::ReadSeed { path: path.to_path_buf(), source })?;
		let listings: Vec<Listing> = serde_json::from_str(&raw)
			.map_err(|source| Error::ParseSeed { path: path.to_path_buf(), source })?;

		Ok(Self::new(listings))
	}

	/// Inserts `listing`, replacing any listing with the same id.
	pub fn upsert(&self, listing: Listing) {
		let mut listings = self.listings.write().unwrap_or_else(|err| err.into_inner());

		match listings.iter_mut().find(|existing| existing.listing_id == listing.listing_id) {
			Some(existing) => *existing = listing,
			None => listings.push(listing),
		}
	}

	pub fn len(&self) -> usize {
		self.listings.read().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn count_matching(&self, filter: &ListingFilter) -> u64 {
		let listings = self.listings.read().unwrap_or_else(|err| err.into_inner());

		listings.iter().filter(|listing| filter.matches(listing)).count() as u64
	}

	fn find_matching(
		&self,
		filter: &ListingFilter,
		sort: SortSpec,
		skip: u64,
		limit: u64,
	) -> Vec<Listing> {
		let mut matched: Vec<Listing> = {
			let listings = self.listings.read().unwrap_or_else(|err| err.into_inner());

			listings.iter().filter(|listing| filter.matches(listing)).cloned().collect()
		};

		matched.sort_by(|left, right| sort.compare(left, right));

		let skip = usize::try_from(skip).unwrap_or(usize::MAX);
		let limit = usize::try_from(limit).unwrap_or(usize::MAX);

		matched.into_iter().skip(skip).take(limit).collect()
	}
}
impl ListingStore for MemoryListingStore {
	fn count<'a>(&'a self, filter: &'a ListingFilter) -> BoxFuture<'a, Result<u64>> {
		let count = self.count_matching(filter);

		Box::pin(async move { Ok(count) })
	}

	fn find<'a>(
		&'a self,
		filter: &'a ListingFilter,
		sort: SortSpec,
		skip: u64,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<Listing>>> {
		let listings = self.find_matching(filter, sort, skip, limit);

		Box::pin(async move { Ok(listings) })
	}
}

#[cfg(test)]
mod tests {
	use time::{Duration, macros::datetime};
	use uuid::Uuid;

	use souk_domain::{
		filter::ListingFilter,
		listing::{Condition, Listing, ListingStatus},
		query::QuerySpec,
		sort::{SortMode, SortSpec},
		text::NormalizedQuery,
	};

	use crate::memory::MemoryListingStore;

	fn listing(idx: i64, boosted: bool, status: ListingStatus) -> Listing {
		Listing {
			listing_id: Uuid::new_v4(),
			title: format!("Item {idx}"),
			description: String::new(),
			category: "misc".to_string(),
			subcategory: None,
			price: 1_000 + idx,
			location: "Madrid".to_string(),
			condition: Condition::Good,
			seller_rating: None,
			created_at: datetime!(2026-01-01 0:00 UTC) + Duration::minutes(idx),
			boosted,
			boosted_at: None,
			status,
		}
	}

	fn active_filter() -> ListingFilter {
		ListingFilter::build(&QuerySpec::default(), &NormalizedQuery::default())
			.expect("Expected filter.")
	}

	#[test]
	fn find_sorts_and_pages() {
		let store = MemoryListingStore::new(vec![
			listing(1, false, ListingStatus::Active),
			listing(2, true, ListingStatus::Active),
			listing(3, false, ListingStatus::Active),
			listing(4, false, ListingStatus::Deleted),
		]);
		let filter = active_filter();
		let sort = SortSpec::for_mode(SortMode::PriceHigh);

		assert_eq!(store.count_matching(&filter), 3);

		let titles: Vec<String> = store
			.find_matching(&filter, sort, 0, 10)
			.into_iter()
			.map(|listing| listing.title)
			.collect();

		assert_eq!(titles, vec!["Item 2", "Item 3", "Item 1"]);
		assert_eq!(store.find_matching(&filter, sort, 2, 10).len(), 1);
		assert!(store.find_matching(&filter, sort, 3, 10).is_empty());
	}

	#[test]
	fn upsert_replaces_by_id() {
		let store = MemoryListingStore::default();
		let mut item = listing(1, false, ListingStatus::Active);

		store.upsert(item.clone());

		item.status = ListingStatus::Sold;

		store.upsert(item);

		assert_eq!(store.len(), 1);
		assert_eq!(store.count_matching(&active_filter()), 0);
	}
}
