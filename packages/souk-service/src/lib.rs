pub mod invalidate;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use invalidate::InvalidateResponse;
pub use search::{SearchRequest, SearchResponse};

use std::sync::Arc;

use souk_config::Config;
use souk_storage::{ListingStore, SearchCache};

/// Listing search over an injected catalog and result cache.
pub struct SoukService {
	pub cfg: Config,
	pub store: Arc<dyn ListingStore>,
	pub cache: Arc<dyn SearchCache>,
}
impl SoukService {
	pub fn new(cfg: Config, store: Arc<dyn ListingStore>, cache: Arc<dyn SearchCache>) -> Self {
		Self { cfg, store, cache }
	}
}
