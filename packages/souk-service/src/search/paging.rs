/// `ceil(total / limit)`; zero when `limit` is zero.
pub fn total_pages(total: u64, limit: u32) -> u64 {
	if limit == 0 {
		return 0;
	}

	total.div_ceil(u64::from(limit))
}

/// The `[skip, skip + limit)` slice of an already ranked window.
pub fn page_slice<T>(items: Vec<T>, skip: u64, limit: u64) -> Vec<T> {
	let skip = usize::try_from(skip).unwrap_or(usize::MAX);
	let limit = usize::try_from(limit).unwrap_or(usize::MAX);

	items.into_iter().skip(skip).take(limit).collect()
}
