use std::{collections::HashMap, sync::Mutex};

use serde_json::Value;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};

use crate::{BoxFuture, Result, SearchCache, models::SearchCacheRow};

struct MemoryEntry {
	value: Value,
	expires_at: OffsetDateTime,
}

/// Process-local cache. Expired entries are dropped lazily on read and swept on write.
#[derive(Default)]
pub struct MemoryCache {
	entries: Mutex<HashMap<String, MemoryEntry>>,
	max_entries: Option<usize>,
}
impl MemoryCache {
	pub fn new(max_entries: Option<usize>) -> Self {
		Self { entries: Mutex::new(HashMap::new()), max_entries }
	}

	pub fn get_at(&self, key: &str, now: OffsetDateTime) -> Option<Value> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		match entries.get(key) {
			Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	pub fn set_at(&self, key: &str, value: Value, ttl: Duration, now: OffsetDateTime) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.retain(|_, entry| entry.expires_at > now);

		if let Some(max) = self.max_entries
			&& !entries.contains_key(key)
			&& entries.len() >= max
		{
			// Evict whatever expires first.
			let oldest = entries
				.iter()
				.min_by_key(|(_, entry)| entry.expires_at)
				.map(|(existing, _)| existing.clone());

			if let Some(oldest) = oldest {
				entries.remove(&oldest);
			}
		}

		entries.insert(key.to_string(), MemoryEntry { value, expires_at: now + ttl });
	}

	pub fn remove_prefix(&self, prefix: &str) -> u64 {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let before = entries.len();

		entries.retain(|key, _| !key.starts_with(prefix));

		(before - entries.len()) as u64
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl SearchCache for MemoryCache {
	fn kind(&self) -> &'static str {
		"memory"
	}

	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
		let value = self.get_at(key, OffsetDateTime::now_utc());

		Box::pin(async move { Ok(value) })
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a Value, ttl: Duration) -> BoxFuture<'a, Result<()>> {
		self.set_at(key, value.clone(), ttl, OffsetDateTime::now_utc());

		Box::pin(async move { Ok(()) })
	}

	fn invalidate_prefix<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<u64>> {
		let removed = self.remove_prefix(prefix);

		Box::pin(async move { Ok(removed) })
	}
}

/// Cache rows in the `search_cache` table, shared by every process using the same database.
#[derive(Clone)]
pub struct PgCache {
	pool: PgPool,
}
impl PgCache {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}

	pub async fn fetch(&self, key: &str, now: OffsetDateTime) -> Result<Option<Value>> {
		let row: Option<SearchCacheRow> = sqlx::query_as(
			"\
SELECT cache_key, payload, created_at, last_accessed_at, expires_at, hit_count
FROM search_cache
WHERE cache_key = $1 AND expires_at > $2",
		)
		.bind(key)
		.bind(now)
		.fetch_optional(&self.pool)
		.await?;
		let Some(row) = row else {
			return Ok(None);
		};

		sqlx::query(
			"\
UPDATE search_cache
SET last_accessed_at = $1, hit_count = hit_count + 1
WHERE cache_key = $2",
		)
		.bind(now)
		.bind(row.cache_key.as_str())
		.execute(&self.pool)
		.await?;

		Ok(Some(row.payload))
	}

	pub async fn store(
		&self,
		key: &str,
		value: &Value,
		now: OffsetDateTime,
		expires_at: OffsetDateTime,
	) -> Result<()> {
		sqlx::query(
			"\
INSERT INTO search_cache (cache_key, payload, created_at, last_accessed_at, expires_at, hit_count)
VALUES ($1, $2, $3, $3, $4, 0)
ON CONFLICT (cache_key) DO UPDATE SET
	payload = EXCLUDED.payload,
	created_at = EXCLUDED.created_at,
	last_accessed_at = EXCLUDED.last_accessed_at,
	expires_at = EXCLUDED.expires_at,
	hit_count = 0",
		)
		.bind(key)
		.bind(value)
		.bind(now)
		.bind(expires_at)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	pub async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
		let pattern = format!("{}%", escape_like(prefix));
		let result = sqlx::query("DELETE FROM search_cache WHERE cache_key LIKE $1 ESCAPE '\\'")
			.bind(pattern)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	pub async fn purge_expired(&self, now: OffsetDateTime) -> Result<u64> {
		let result = sqlx::query("DELETE FROM search_cache WHERE expires_at <= $1")
			.bind(now)
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}
}
impl SearchCache for PgCache {
	fn kind(&self) -> &'static str {
		"postgres"
	}

	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Value>>> {
		Box::pin(self.fetch(key, OffsetDateTime::now_utc()))
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a Value, ttl: Duration) -> BoxFuture<'a, Result<()>> {
		let now = OffsetDateTime::now_utc();

		Box::pin(self.store(key, value, now, now + ttl))
	}

	fn invalidate_prefix<'a>(&'a self, prefix: &'a str) -> BoxFuture<'a, Result<u64>> {
		Box::pin(self.delete_prefix(prefix))
	}
}

/// Escapes `LIKE` metacharacters so `prefix` only matches literally.
pub fn escape_like(prefix: &str) -> String {
	let mut out = String::with_capacity(prefix.len());

	for ch in prefix.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

#[cfg(test)]
mod tests {
	use time::{Duration, macros::datetime};

	use crate::cache::{MemoryCache, escape_like};

	#[test]
	fn entries_expire_after_ttl() {
		let cache = MemoryCache::new(None);
		let now = datetime!(2026-05-01 12:00 UTC);

		cache.set_at("listings:search?q=desk", serde_json::json!({ "total": 1 }), Duration::seconds(300), now);

		assert!(cache.get_at("listings:search?q=desk", now + Duration::seconds(299)).is_some());
		assert!(cache.get_at("listings:search?q=desk", now + Duration::seconds(300)).is_none());
		assert!(cache.is_empty());
	}

	#[test]
	fn prefix_invalidation_only_touches_matching_keys() {
		let cache = MemoryCache::new(None);
		let now = datetime!(2026-05-01 12:00 UTC);
		let ttl = Duration::seconds(60);

		cache.set_at("listings:search?page=1", serde_json::json!(1), ttl, now);
		cache.set_at("listings:search?page=2", serde_json::json!(2), ttl, now);
		cache.set_at("profiles:search?page=1", serde_json::json!(3), ttl, now);

		assert_eq!(cache.remove_prefix("listings:"), 2);
		assert_eq!(cache.len(), 1);
		assert!(cache.get_at("profiles:search?page=1", now).is_some());
	}

	#[test]
	fn bounded_cache_evicts_soonest_expiry() {
		let cache = MemoryCache::new(Some(2));
		let now = datetime!(2026-05-01 12:00 UTC);

		cache.set_at("a", serde_json::json!("a"), Duration::seconds(10), now);
		cache.set_at("b", serde_json::json!("b"), Duration::seconds(60), now);
		cache.set_at("c", serde_json::json!("c"), Duration::seconds(60), now);

		assert_eq!(cache.len(), 2);
		assert!(cache.get_at("a", now).is_none());
		assert!(cache.get_at("b", now).is_some());
		assert!(cache.get_at("c", now).is_some());
	}

	#[test]
	fn overwrite_keeps_a_single_entry() {
		let cache = MemoryCache::new(Some(1));
		let now = datetime!(2026-05-01 12:00 UTC);

		cache.set_at("a", serde_json::json!(1), Duration::seconds(10), now);
		cache.set_at("a", serde_json::json!(2), Duration::seconds(10), now);

		assert_eq!(cache.get_at("a", now), Some(serde_json::json!(2)));
	}

	#[test]
	fn like_metacharacters_are_escaped() {
		assert_eq!(escape_like("listings:"), "listings:");
		assert_eq!(escape_like("a_b%c\\"), "a\\_b\\%c\\\\");
	}
}
