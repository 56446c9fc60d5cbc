mod cache;
mod fetch;
mod paging;
mod ranking;

pub use cache::{build_cache_key, cache_key_hash, namespace_prefix};
pub use fetch::FetchPlan;
pub use paging::total_pages;
pub use ranking::ScoredListing;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use souk_domain::{
	filter::ListingFilter,
	listing::{Condition, Listing},
	query::QuerySpec,
	similarity::ScoringWeights,
	sort::SortMode,
	text::NormalizedQuery,
};

use crate::{Error, Result, SoukService};

/// Raw query-string parameters. Every field is optional and parsed leniently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	pub q: Option<String>,
	pub category: Option<String>,
	pub subcategory: Option<String>,
	pub location: Option<String>,
	pub condition: Option<String>,
	#[serde(alias = "min_price")]
	pub min_price: Option<String>,
	#[serde(alias = "max_price")]
	pub max_price: Option<String>,
	#[serde(alias = "sort")]
	pub sort_by: Option<String>,
	pub page: Option<String>,
	pub limit: Option<String>,
}
impl SearchRequest {
	/// Builds a request from decoded query pairs. The first occurrence of a key wins; unknown
	/// keys are ignored.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut req = Self::default();

		for (key, value) in pairs {
			let slot = match key.as_ref() {
				"q" => &mut req.q,
				"category" => &mut req.category,
				"subcategory" => &mut req.subcategory,
				"location" => &mut req.location,
				"condition" => &mut req.condition,
				"minPrice" | "min_price" => &mut req.min_price,
				"maxPrice" | "max_price" => &mut req.max_price,
				"sortBy" | "sort" => &mut req.sort_by,
				"page" => &mut req.page,
				"limit" => &mut req.limit,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into());
			}
		}

		req
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub listings: Vec<Listing>,
	pub total: u64,
	pub page: u32,
	pub total_pages: u64,
	/// Relevance ranking only saw the first `max_candidates` matches, so deep pages may be short.
	pub candidate_window_truncated: bool,
}

impl SoukService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let spec = self.parse_request(&req)?;

		self.search_spec(&spec).await
	}

	/// Turns raw parameters into a [`QuerySpec`], falling back to defaults for anything
	/// unparseable. Only an over-long query is an error.
	pub fn parse_request(&self, req: &SearchRequest) -> Result<QuerySpec> {
		let cfg = &self.cfg.search;
		let text = trimmed(req.q.as_deref());

		if let Some(text) = text.as_deref()
			&& text.chars().count() > cfg.max_query_chars as usize
		{
			return Err(Error::QueryTooLong { max_chars: cfg.max_query_chars });
		}

		let page = parse_lenient::<u32>(req.page.as_deref()).unwrap_or(1).max(1);
		let limit = parse_lenient::<u32>(req.limit.as_deref())
			.unwrap_or(cfg.default_limit)
			.clamp(1, cfg.max_limit);

		Ok(QuerySpec {
			text,
			category: trimmed(req.category.as_deref()),
			subcategory: trimmed(req.subcategory.as_deref()),
			location: trimmed(req.location.as_deref()),
			condition: parse_lenient::<Condition>(req.condition.as_deref()),
			min_price: parse_lenient::<i64>(req.min_price.as_deref()),
			max_price: parse_lenient::<i64>(req.max_price.as_deref()),
			sort: parse_lenient::<SortMode>(req.sort_by.as_deref()).unwrap_or_default(),
			page,
			limit,
		})
	}

	pub async fn search_spec(&self, spec: &QuerySpec) -> Result<SearchResponse> {
		let cfg = &self.cfg.search;

		if let Some(text) = spec.text.as_deref()
			&& text.chars().count() > cfg.max_query_chars as usize
		{
			return Err(Error::QueryTooLong { max_chars: cfg.max_query_chars });
		}

		let query = NormalizedQuery::new(spec.text.as_deref().unwrap_or(""), cfg.max_tokens as usize);
		let filter = ListingFilter::build(spec, &query)?;
		let cache_key = if cfg.cache.enabled {
			Some(build_cache_key(&cfg.cache.namespace, spec, &query))
		} else {
			None
		};

		if let Some(key) = cache_key.as_deref()
			&& let Some(cached) = self.read_cached(key).await
		{
			return Ok(cached);
		}

		let response = self.execute(spec, &query, &filter).await?;

		if let Some(key) = cache_key.as_deref() {
			self.store_cached(key, &response).await;
		}

		Ok(response)
	}

	async fn execute(
		&self,
		spec: &QuerySpec,
		query: &NormalizedQuery,
		filter: &ListingFilter,
	) -> Result<SearchResponse> {
		let cfg = &self.cfg.search;
		let plan = FetchPlan::for_query(spec, query, &cfg.candidates);
		let candidates = fetch::fetch_candidates(self.store.as_ref(), filter, &plan).await?;
		let candidate_count = candidates.listings.len();
		let listings = if plan.scored {
			let weights = ScoringWeights {
				dice: cfg.scoring.dice_weight,
				token: cfg.scoring.token_weight,
				substring_bonus: cfg.scoring.substring_bonus,
			};
			let mut scored = ranking::score_candidates(candidates.listings, query, &weights);

			ranking::rank_scored(&mut scored);

			paging::page_slice(scored, spec.skip(), u64::from(spec.limit))
				.into_iter()
				.map(|item| item.listing)
				.collect()
		} else {
			candidates.listings
		};

		tracing::info!(
			candidate_count,
			total = candidates.total,
			scored = plan.scored,
			truncated = candidates.truncated,
			page = spec.page,
			returned = listings.len(),
			"Search completed."
		);

		Ok(SearchResponse {
			listings,
			total: candidates.total,
			page: spec.page,
			total_pages: total_pages(candidates.total, spec.limit),
			candidate_window_truncated: candidates.truncated,
		})
	}

	async fn read_cached(&self, key: &str) -> Option<SearchResponse> {
		let cache_cfg = &self.cfg.search.cache;
		let cache_kind = self.cache.kind();

		match self.cache.get(key).await {
			Ok(Some(value)) => {
				let payload_size = cache::payload_size(&value).unwrap_or_default();

				match cache::decode_payload(value) {
					Ok(response) => {
						tracing::info!(
							cache_kind,
							cache_key_hash = cache_key_hash(key),
							hit = true,
							payload_size,
							ttl_seconds = cache_cfg.ttl_seconds,
							"Cache hit."
						);

						Some(response)
					},
					Err(err) => {
						tracing::warn!(
							error = %err,
							cache_kind,
							cache_key_hash = cache_key_hash(key),
							"Cache payload decode failed."
						);

						None
					},
				}
			},
			Ok(None) => {
				tracing::info!(
					cache_kind,
					cache_key_hash = cache_key_hash(key),
					hit = false,
					payload_size = 0_u64,
					ttl_seconds = cache_cfg.ttl_seconds,
					"Cache miss."
				);

				None
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_kind,
					cache_key_hash = cache_key_hash(key),
					"Cache read failed."
				);

				None
			},
		}
	}

	async fn store_cached(&self, key: &str, response: &SearchResponse) {
		let cache_cfg = &self.cfg.search.cache;
		let cache_kind = self.cache.kind();
		let payload = match cache::encode_payload(response) {
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_kind,
					cache_key_hash = cache_key_hash(key),
					"Cache payload encode failed."
				);

				return;
			},
		};
		let payload_size = match cache::payload_size(&payload) {
			Ok(size) => size,
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_kind,
					cache_key_hash = cache_key_hash(key),
					"Cache payload encode failed."
				);

				return;
			},
		};

		if let Some(max) = cache_cfg.max_payload_bytes
			&& payload_size as u64 > max
		{
			tracing::warn!(
				cache_kind,
				cache_key_hash = cache_key_hash(key),
				hit = false,
				payload_size,
				ttl_seconds = cache_cfg.ttl_seconds,
				"Cache payload skipped due to size."
			);

			return;
		}

		let ttl = time::Duration::seconds(cache_cfg.ttl_seconds);

		match self.cache.set(key, &payload, ttl).await {
			Ok(()) => {
				tracing::info!(
					cache_kind,
					cache_key_hash = cache_key_hash(key),
					hit = false,
					payload_size,
					ttl_seconds = cache_cfg.ttl_seconds,
					"Cache stored."
				);
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					cache_kind,
					cache_key_hash = cache_key_hash(key),
					"Cache write failed."
				);
			},
		}
	}
}

fn trimmed(value: Option<&str>) -> Option<String> {
	value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

fn parse_lenient<T>(value: Option<&str>) -> Option<T>
where
	T: FromStr,
{
	value.map(str::trim).and_then(|value| value.parse().ok())
}
