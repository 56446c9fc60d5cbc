use crate::{listing::Condition, sort::SortMode};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// A validated search request. Built by the service layer from lenient client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
	pub text: Option<String>,
	pub category: Option<String>,
	pub subcategory: Option<String>,
	pub location: Option<String>,
	pub condition: Option<Condition>,
	pub min_price: Option<i64>,
	pub max_price: Option<i64>,
	pub sort: SortMode,
	pub page: u32,
	pub limit: u32,
}
impl QuerySpec {
	pub fn skip(&self) -> u64 {
		u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
	}

	pub fn has_text(&self) -> bool {
		self.text.as_deref().map(|text| !text.trim().is_empty()).unwrap_or(false)
	}
}
impl Default for QuerySpec {
	fn default() -> Self {
		Self {
			text: None,
			category: None,
			subcategory: None,
			location: None,
			condition: None,
			min_price: None,
			max_price: None,
			sort: SortMode::default(),
			page: DEFAULT_PAGE,
			limit: DEFAULT_LIMIT,
		}
	}
}
