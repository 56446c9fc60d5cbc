use std::sync::Arc;

use color_eyre::eyre;

use souk_config::Config;
use souk_service::SoukService;
use souk_storage::{
	ListingStore, SearchCache,
	cache::{MemoryCache, PgCache},
	db::Db,
	listings::PgListingStore,
	memory::MemoryListingStore,
};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SoukService>,
}
impl AppState {
	/// Builds the configured storage and cache backends. Postgres is connected at most once.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let needs_postgres =
			config.storage.backend == "postgres" || config.search.cache.backend == "postgres";
		let db = if needs_postgres {
			let Some(postgres) = config.storage.postgres.as_ref() else {
				return Err(eyre::eyre!("storage.postgres is required for the postgres backend."));
			};
			let db = Db::connect(postgres).await?;

			db.ensure_schema().await?;

			Some(db)
		} else {
			None
		};
		let store: Arc<dyn ListingStore> = match (config.storage.backend.as_str(), db.as_ref()) {
			("postgres", Some(db)) => Arc::new(PgListingStore::new(db.pool.clone())),
			_ => match config.storage.memory.as_ref().and_then(|memory| memory.seed_path.as_ref()) {
				Some(path) => {
					let store = MemoryListingStore::from_seed_file(path)?;

					tracing::info!(listings = store.len(), "Loaded listing seed file.");

					Arc::new(store)
				},
				None => Arc::new(MemoryListingStore::default()),
			},
		};
		let cache: Arc<dyn SearchCache> = match (config.search.cache.backend.as_str(), db.as_ref()) {
			("postgres", Some(db)) => Arc::new(PgCache::new(db.pool.clone())),
			_ => Arc::new(MemoryCache::new(
				config.search.cache.max_entries.map(|max| max as usize),
			)),
		};

		Ok(Self::from_service(SoukService::new(config, store, cache)))
	}

	pub fn from_service(service: SoukService) -> Self {
		Self { service: Arc::new(service) }
	}
}
