use souk_config::SearchCandidates;
use souk_domain::{
	filter::ListingFilter,
	listing::Listing,
	query::QuerySpec,
	sort::SortSpec,
	text::NormalizedQuery,
};
use souk_storage::ListingStore;

use crate::Result;

/// What to read from storage for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
	pub sort: SortSpec,
	pub skip: u64,
	pub limit: u64,
	/// Candidates are scored in-process and the page is cut from the ranked window.
	pub scored: bool,
	/// The window was cut short by `max_candidates`.
	pub window_capped: bool,
}
impl FetchPlan {
	pub fn for_query(spec: &QuerySpec, query: &NormalizedQuery, cfg: &SearchCandidates) -> Self {
		let skip = spec.skip();
		let limit = u64::from(spec.limit);

		if !spec.sort.is_default() || !spec.has_text() || query.is_empty() {
			return Self {
				sort: SortSpec::for_mode(spec.sort),
				skip,
				limit,
				scored: false,
				window_capped: false,
			};
		}

		let wanted = skip.saturating_add(limit).saturating_add(u64::from(cfg.window_padding));
		let max_candidates = u64::from(cfg.max_candidates);

		Self {
			sort: SortSpec::recency(),
			skip: 0,
			limit: wanted.min(max_candidates),
			scored: true,
			window_capped: wanted > max_candidates,
		}
	}
}

#[derive(Debug)]
pub struct Candidates {
	pub listings: Vec<Listing>,
	pub total: u64,
	pub truncated: bool,
}

pub async fn fetch_candidates(
	store: &dyn ListingStore,
	filter: &ListingFilter,
	plan: &FetchPlan,
) -> Result<Candidates> {
	let total = store.count(filter).await?;
	let listings = if plan.skip >= total && !plan.scored {
		Vec::new()
	} else {
		store.find(filter, plan.sort, plan.skip, plan.limit).await?
	};
	let truncated = plan.window_capped && total > plan.limit;

	Ok(Candidates { listings, total, truncated })
}

#[cfg(test)]
mod tests {
	use souk_config::SearchCandidates;
	use souk_domain::{
		query::QuerySpec,
		sort::{SortMode, SortSpec},
		text::{MAX_QUERY_TOKENS, NormalizedQuery},
	};

	use crate::search::fetch::FetchPlan;

	fn plan(spec: &QuerySpec, cfg: &SearchCandidates) -> FetchPlan {
		let query = NormalizedQuery::new(spec.text.as_deref().unwrap_or(""), MAX_QUERY_TOKENS);

		FetchPlan::for_query(spec, &query, cfg)
	}

	#[test]
	fn browsing_reads_the_page_directly() {
		let spec = QuerySpec { page: 3, limit: 20, ..Default::default() };
		let plan = plan(&spec, &SearchCandidates::default());

		assert!(!plan.scored);
		assert_eq!(plan.sort, SortSpec::for_mode(SortMode::Newest));
		assert_eq!((plan.skip, plan.limit), (40, 20));
	}

	#[test]
	fn non_default_sort_skips_scoring() {
		let spec = QuerySpec {
			text: Some("lamp".to_string()),
			sort: SortMode::PriceLow,
			..Default::default()
		};

		assert!(!plan(&spec, &SearchCandidates::default()).scored);
	}

	#[test]
	fn text_search_reads_a_padded_window() {
		let spec = QuerySpec { text: Some("lamp".to_string()), page: 2, ..Default::default() };
		let plan = plan(&spec, &SearchCandidates::default());

		assert!(plan.scored);
		assert!(!plan.window_capped);
		assert_eq!(plan.sort, SortSpec::recency());
		assert_eq!((plan.skip, plan.limit), (0, 240));
	}

	#[test]
	fn deep_pages_hit_the_candidate_cap() {
		let cfg = SearchCandidates { max_candidates: 1_000, window_padding: 200 };
		let spec = QuerySpec { text: Some("lamp".to_string()), page: 45, ..Default::default() };
		let plan = plan(&spec, &cfg);

		assert!(plan.window_capped);
		assert_eq!(plan.limit, 1_000);
	}

	#[test]
	fn punctuation_only_text_is_browsing() {
		let spec = QuerySpec { text: Some("?!".to_string()), ..Default::default() };

		assert!(!plan(&spec, &SearchCandidates::default()).scored);
	}
}
