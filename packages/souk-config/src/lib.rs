mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, MemoryStorage, Postgres, Search, SearchCache, SearchCandidates, SearchScoring,
	Security, Service, Storage,
};

use std::{fs, path::Path};

/// Hard ceiling for `search.max_limit`; page sizes never exceed it.
pub const MAX_PAGE_LIMIT: u32 = 100;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in
		[("service.http_bind", &cfg.service.http_bind), ("service.admin_bind", &cfg.service.admin_bind)]
	{
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	match cfg.storage.backend.as_str() {
		"postgres" => {
			let Some(postgres) = cfg.storage.postgres.as_ref() else {
				return Err(Error::Validation {
					message: "storage.postgres is required when storage.backend is postgres."
						.to_string(),
				});
			};

			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.postgres.dsn must be non-empty.".to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
		},
		"memory" => {},
		_ => {
			return Err(Error::Validation {
				message: "storage.backend must be one of postgres or memory.".to_string(),
			});
		},
	}

	let search = &cfg.search;

	if search.max_query_chars == 0 {
		return Err(Error::Validation {
			message: "search.max_query_chars must be greater than zero.".to_string(),
		});
	}
	if search.max_limit == 0 || search.max_limit > MAX_PAGE_LIMIT {
		return Err(Error::Validation {
			message: format!("search.max_limit must be in the range 1-{MAX_PAGE_LIMIT}."),
		});
	}
	if search.default_limit == 0 || search.default_limit > search.max_limit {
		return Err(Error::Validation {
			message: "search.default_limit must be in the range 1-search.max_limit.".to_string(),
		});
	}
	if search.max_tokens == 0 {
		return Err(Error::Validation {
			message: "search.max_tokens must be greater than zero.".to_string(),
		});
	}
	if search.candidates.max_candidates == 0 {
		return Err(Error::Validation {
			message: "search.candidates.max_candidates must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("search.scoring.dice_weight", search.scoring.dice_weight),
		("search.scoring.token_weight", search.scoring.token_weight),
		("search.scoring.substring_bonus", search.scoring.substring_bonus),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if weight < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	let cache = &search.cache;

	if cache.ttl_seconds <= 0 {
		return Err(Error::Validation {
			message: "search.cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cache.namespace.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.cache.namespace must be non-empty.".to_string(),
		});
	}
	if cache.namespace.contains(':') {
		return Err(Error::Validation {
			message: "search.cache.namespace must not contain ':'.".to_string(),
		});
	}

	match cache.backend.as_str() {
		"memory" => {},
		"postgres" =>
			if cfg.storage.postgres.is_none() {
				return Err(Error::Validation {
					message: "search.cache.backend postgres requires storage.postgres.".to_string(),
				});
			},
		_ => {
			return Err(Error::Validation {
				message: "search.cache.backend must be one of memory or postgres.".to_string(),
			});
		},
	}

	if let Some(max) = cache.max_entries
		&& max == 0
	{
		return Err(Error::Validation {
			message: "search.cache.max_entries must be greater than zero.".to_string(),
		});
	}
	if let Some(max) = cache.max_payload_bytes
		&& max == 0
	{
		return Err(Error::Validation {
			message: "search.cache.max_payload_bytes must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.storage.backend = cfg.storage.backend.trim().to_ascii_lowercase();
	cfg.search.cache.backend = cfg.search.cache.backend.trim().to_ascii_lowercase();
	cfg.search.cache.namespace = cfg.search.cache.namespace.trim().to_string();

	if let Some(memory) = cfg.storage.memory.as_mut()
		&& memory.seed_path.as_ref().map(|path| path.as_os_str().is_empty()).unwrap_or(false)
	{
		memory.seed_path = None;
	}
}
