//! Projection of a collection into the page shown to the user.
//!
//! The projection is recomputed from the canonical collection on every call
//! and holds no state of its own.

use serde::Serialize;

use crate::record::date;
use crate::sync::EnrichedItem;

/// One page of a filtered, sorted collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<EnrichedItem>,
    /// 1-based, always within `1..=total_pages`
    pub current_page: usize,
    pub total_pages: usize,
    /// Number of items matching the search before pagination
    pub total_items: usize,
}

/// Filter by title, sort newest first, and cut out the requested page.
///
/// An out-of-range `page` is clamped, so a shrinking result set never leaves
/// the user on an empty page. A `page_size` of zero is treated as one.
pub fn project(items: &[EnrichedItem], search: &str, page: usize, page_size: usize) -> Page {
    let query = search.trim().to_lowercase();

    let mut matching: Vec<&EnrichedItem> = items
        .iter()
        .filter(|item| matches_query(item, &query))
        .collect();

    // Stable, so equal dates keep their index order.
    matching.sort_by_cached_key(|item| std::cmp::Reverse(sort_key(item)));

    let page_size = page_size.max(1);
    let total_items = matching.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let current_page = page.clamp(1, total_pages);

    let start = (current_page - 1) * page_size;
    let items = matching
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    Page {
        items,
        current_page,
        total_pages,
        total_items,
    }
}

fn matches_query(item: &EnrichedItem, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    item.detail
        .as_ref()
        .is_some_and(|d| d.title().to_lowercase().contains(query))
}

/// Missing and unparseable dates sort as the epoch.
fn sort_key(item: &EnrichedItem) -> i64 {
    item.detail
        .as_ref()
        .and_then(|d| date::parse_millis(d.date()))
        .unwrap_or(0)
}
