use serde::{Deserialize, Serialize};

use crate::{SoukService, search::namespace_prefix};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidateResponse {
	/// False when the cache backend failed; stale pages then expire with their TTL.
	pub invalidated: bool,
	pub removed: u64,
}

impl SoukService {
	/// Drops every cached search page. Called by listing write paths after a mutation.
	pub async fn invalidate_listings(&self) -> InvalidateResponse {
		let prefix = namespace_prefix(&self.cfg.search.cache.namespace);
		let cache_kind = self.cache.kind();

		match self.cache.invalidate_prefix(&prefix).await {
			Ok(removed) => {
				tracing::info!(cache_kind, removed, "Search cache invalidated.");

				InvalidateResponse { invalidated: true, removed }
			},
			Err(err) => {
				tracing::warn!(error = %err, cache_kind, "Cache invalidation failed.");

				InvalidateResponse { invalidated: false, removed: 0 }
			},
		}
	}
}
