//! Cache keys and payloads for search result pages.
//!
//! A key is the namespace plus every query field that affects the result, sorted by field name
//! and URL-encoded, so the same logical query always maps to the same key.

use serde_json::Value;

use souk_domain::{query::QuerySpec, text::NormalizedQuery};

use crate::{Error, Result, search::SearchResponse};

const CACHE_KEY_HASH_CHARS: usize = 12;

pub fn namespace_prefix(namespace: &str) -> String {
	format!("{namespace}:")
}

pub fn build_cache_key(namespace: &str, spec: &QuerySpec, query: &NormalizedQuery) -> String {
	let mut fields: Vec<(&str, String)> = Vec::new();

	if let Some(category) = non_blank(spec.category.as_deref()) {
		fields.push(("category", category.to_string()));
	}
	if let Some(condition) = spec.condition {
		fields.push(("condition", condition.as_str().to_string()));
	}

	fields.push(("limit", spec.limit.to_string()));

	if let Some(location) = non_blank(spec.location.as_deref()) {
		fields.push(("location", location.to_string()));
	}
	if let Some(max_price) = spec.max_price {
		fields.push(("max_price", max_price.to_string()));
	}
	if let Some(min_price) = spec.min_price {
		fields.push(("min_price", min_price.to_string()));
	}

	fields.push(("page", spec.page.to_string()));

	if spec.has_text() && !query.is_empty() {
		fields.push(("q", query.normalized.clone()));
	}

	fields.push(("sort", spec.sort.as_str().to_string()));

	if let Some(subcategory) = non_blank(spec.subcategory.as_deref()) {
		fields.push(("subcategory", subcategory.to_string()));
	}

	fields.sort_by(|left, right| left.0.cmp(right.0));

	let encoded = fields
		.iter()
		.map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
		.collect::<Vec<_>>()
		.join("&");

	format!("{}search?{encoded}", namespace_prefix(namespace))
}

/// Short, log-safe fingerprint of a cache key. Raw queries never reach the logs.
pub fn cache_key_hash(key: &str) -> String {
	let mut hex = blake3::hash(key.as_bytes()).to_hex().to_string();

	hex.truncate(CACHE_KEY_HASH_CHARS);

	hex
}

pub fn encode_payload(response: &SearchResponse) -> Result<Value> {
	serde_json::to_value(response).map_err(|err| Error::Storage {
		message: format!("Failed to encode cache payload: {err}"),
	})
}

pub fn decode_payload(value: Value) -> Result<SearchResponse> {
	serde_json::from_value(value)
		.map_err(|err| Error::Storage { message: format!("Invalid cache payload: {err}") })
}

pub fn payload_size(value: &Value) -> Result<usize> {
	serde_json::to_vec(value).map(|raw| raw.len()).map_err(|err| Error::Storage {
		message: format!("Failed to encode cache payload: {err}"),
	})
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
