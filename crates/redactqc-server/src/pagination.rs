use redactqc_core::limits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::dto::PageQuery;

/// Resolve a query's `page`/`page_size` into 1-based page number and a
/// `(limit, offset)` pair, clamping page_size to `[1, MAX_PAGE_SIZE]` per
/// §4.7.
pub fn resolve(query: &PageQuery) -> (i64, i64, i64) {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE as i64)
        .clamp(1, MAX_PAGE_SIZE as i64);
    let offset = (page - 1) * page_size;
    (page, page_size, offset)
}
