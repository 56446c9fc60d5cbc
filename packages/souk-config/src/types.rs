use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	/// Either "postgres" or "memory".
	pub backend: String,
	pub postgres: Option<Postgres>,
	pub memory: Option<MemoryStorage>,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct MemoryStorage {
	/// Optional JSON file holding an array of listings loaded at startup.
	pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub max_query_chars: u32,
	pub default_limit: u32,
	pub max_limit: u32,
	pub max_tokens: u32,
	pub candidates: SearchCandidates,
	pub scoring: SearchScoring,
	pub cache: SearchCache,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			max_query_chars: 100,
			default_limit: 20,
			max_limit: 100,
			max_tokens: 6,
			candidates: SearchCandidates::default(),
			scoring: SearchScoring::default(),
			cache: SearchCache::default(),
		}
	}
}

/// Bounds the superset fetched for in-process relevance ranking.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchCandidates {
	pub max_candidates: u32,
	pub window_padding: u32,
}
impl Default for SearchCandidates {
	fn default() -> Self {
		Self { max_candidates: 1_000, window_padding: 200 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchScoring {
	pub dice_weight: f32,
	pub token_weight: f32,
	pub substring_bonus: f32,
}
impl Default for SearchScoring {
	fn default() -> Self {
		Self { dice_weight: 0.6, token_weight: 0.4, substring_bonus: 0.2 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchCache {
	pub enabled: bool,
	/// Either "memory" or "postgres".
	pub backend: String,
	pub ttl_seconds: i64,
	pub namespace: String,
	pub max_entries: Option<u32>,
	pub max_payload_bytes: Option<u64>,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self {
			enabled: true,
			backend: "memory".to_string(),
			ttl_seconds: 300,
			namespace: "listings".to_string(),
			max_entries: Some(10_000),
			max_payload_bytes: Some(262_144),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}
