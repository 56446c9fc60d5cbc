//! Postgres-backed listing reads.
//!
//! Filters compile to a parameterized `WHERE` clause; substring conditions use `~*` with the
//! already escaped [`SafePattern`] source, so user text never reaches the regex engine unescaped.

use sqlx::{PgPool, Postgres, QueryBuilder};

use souk_domain::{
	filter::ListingFilter,
	listing::Listing,
	pattern::SafePattern,
	sort::{SortKey, SortSpec},
};

use crate::{
	BoxFuture, Error, ListingStore, Result,
	models::{LISTING_COLUMNS, ListingRow},
};

#[derive(Clone)]
pub struct PgListingStore {
	pool: PgPool,
}
impl PgListingStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	pub async fn count_matching(&self, filter: &ListingFilter) -> Result<u64> {
		let mut builder = QueryBuilder::<Postgres>::new("SELECT count(*) FROM listings");

		push_filter(&mut builder, filter);

		let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;

		u64::try_from(count).map_err(|_| Error::InvalidData(format!("negative count {count}")))
	}

	pub async fn find_matching(
		&self,
		filter: &ListingFilter,
		sort: SortSpec,
		skip: u64,
		limit: u64,
	) -> Result<Vec<Listing>> {
		let offset = to_sql_bound("skip", skip)?;
		let limit = to_sql_bound("limit", limit)?;
		let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {LISTING_COLUMNS} FROM listings"));

		push_filter(&mut builder, filter);
		push_order(&mut builder, sort);

		builder.push(" LIMIT ");
		builder.push_bind(limit);
		builder.push(" OFFSET ");
		builder.push_bind(offset);

		let rows: Vec<ListingRow> = builder.build_query_as().fetch_all(&self.pool).await?;

		rows.into_iter().map(Listing::try_from).collect()
	}
}
impl ListingStore for PgListingStore {
	fn count<'a>(&'a self, filter: &'a ListingFilter) -> BoxFuture<'a, Result<u64>> {
		Box::pin(self.count_matching(filter))
	}

	fn find<'a>(
		&'a self,
		filter: &'a ListingFilter,
		sort: SortSpec,
		skip: u64,
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<Listing>>> {
		Box::pin(self.find_matching(filter, sort, skip, limit))
	}
}

/// Inserts or replaces a listing. Search never writes; seeding and tests do.
pub async fn upsert_listing(pool: &PgPool, listing: &Listing) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO listings (
	listing_id,
	title,
	description,
	category,
	subcategory,
	price,
	location,
	condition,
	seller_rating,
	created_at,
	boosted,
	boosted_at,
	status
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
ON CONFLICT (listing_id) DO UPDATE SET
	title = EXCLUDED.title,
	description = EXCLUDED.description,
	category = EXCLUDED.category,
	subcategory = EXCLUDED.subcategory,
	price = EXCLUDED.price,
	location = EXCLUDED.location,
	condition = EXCLUDED.condition,
	seller_rating = EXCLUDED.seller_rating,
	created_at = EXCLUDED.created_at,
	boosted = EXCLUDED.boosted,
	boosted_at = EXCLUDED.boosted_at,
	status = EXCLUDED.status",
	)
	.bind(listing.listing_id)
	.bind(listing.title.as_str())
	.bind(listing.description.as_str())
	.bind(listing.category.as_str())
	.bind(listing.subcategory.as_deref())
	.bind(listing.price)
	.bind(listing.location.as_str())
	.bind(listing.condition.as_str())
	.bind(listing.seller_rating)
	.bind(listing.created_at)
	.bind(listing.boosted)
	.bind(listing.boosted_at)
	.bind(listing.status.as_str())
	.execute(pool)
	.await?;

	Ok(())
}

pub(crate) fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListingFilter) {
	builder.push(" WHERE status = ");
	builder.push_bind(filter.status.as_str());

	if let Some(category) = filter.category.as_ref() {
		builder.push(" AND category = ");
		builder.push_bind(category.clone());
	}
	if let Some(subcategory) = filter.subcategory.as_ref() {
		builder.push(" AND subcategory = ");
		builder.push_bind(subcategory.clone());
	}
	if let Some(condition) = filter.condition {
		builder.push(" AND condition = ");
		builder.push_bind(condition.as_str());
	}
	if let Some(location) = filter.location.as_ref() {
		push_pattern(builder, "location", location);
	}
	if let Some(min_price) = filter.min_price {
		builder.push(" AND price >= ");
		builder.push_bind(min_price);
	}
	if let Some(max_price) = filter.max_price {
		builder.push(" AND price <= ");
		builder.push_bind(max_price);
	}
	if filter.text.is_empty() {
		return;
	}

	builder.push(" AND (");

	for (idx, pattern) in filter.text.iter().enumerate() {
		if idx > 0 {
			builder.push(" OR");
		}

		builder.push(" title ~* ");
		builder.push_bind(pattern.as_regex_source().to_string());
		builder.push(" OR description ~* ");
		builder.push_bind(pattern.as_regex_source().to_string());
	}

	builder.push(")");
}

pub(crate) fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: SortSpec) {
	builder.push(" ORDER BY ");

	if sort.boosted_first {
		builder.push("boosted DESC, ");
	}

	builder.push(match sort.key {
		SortKey::CreatedAtDesc => "created_at DESC",
		SortKey::CreatedAtAsc => "created_at ASC",
		SortKey::PriceAsc => "price ASC",
		SortKey::PriceDesc => "price DESC",
		SortKey::SellerRatingDesc => "seller_rating DESC NULLS LAST",
	});

	if sort.key != SortKey::CreatedAtDesc {
		builder.push(", created_at DESC");
	}

	builder.push(", listing_id ASC");
}

fn push_pattern(builder: &mut QueryBuilder<'_, Postgres>, column: &'static str, pattern: &SafePattern) {
	builder.push(" AND ");
	builder.push(column);
	builder.push(" ~* ");
	builder.push_bind(pattern.as_regex_source().to_string());
}

fn to_sql_bound(label: &str, value: u64) -> Result<i64> {
	i64::try_from(value).map_err(|_| Error::InvalidArgument(format!("{label} is out of range.")))
}
