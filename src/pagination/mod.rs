//! Paging over the snapshot store.
//!
//! A page is described by a 1-based `page` number and a `per_page` size, both
//! read from the inspection endpoint's query string. Bad input never fails a
//! request: unparsable values fall back to defaults and pages past the end are
//! simply empty.
//!
//! Paging is read-only and deterministic for a given `(page, per_page, total)`.

use crate::models::PageView;
use crate::store::SnapshotStore;
use std::ops::Range;
use url::form_urlencoded;

/// Page served when `page` is missing or invalid.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when `per_page` is missing or invalid.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Largest page size accepted by default.
pub const DEFAULT_MAX_PER_PAGE: usize = 500;

/// Fallback and bound for the requested page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationDefaults {
    pub per_page: usize,
    pub max_per_page: usize,
}

impl Default for PaginationDefaults {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }
}

/// A normalized page request. `page >= 1` and `per_page >= 1` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Creates a request, raising zero values to 1.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Builds a request from a raw query string such as `page=2&per_page=50`.
    pub fn from_query(query: Option<&str>, defaults: &PaginationDefaults) -> Self {
        let mut page = None;
        let mut per_page = None;

        if let Some(query) = query {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                match key.as_ref() {
                    "page" if page.is_none() => page = Some(value.into_owned()),
                    "per_page" if per_page.is_none() => per_page = Some(value.into_owned()),
                    _ => {}
                }
            }
        }

        Self::from_params(page.as_deref(), per_page.as_deref(), defaults)
    }

    /// Builds a request from the textual `page` and `per_page` values.
    ///
    /// - a missing or non-integer `page` becomes 1, and so does any value below 1
    /// - a missing, non-integer or non-positive `per_page` becomes the default
    /// - a `per_page` above the maximum is clamped to the maximum
    pub fn from_params(
        page: Option<&str>,
        per_page: Option<&str>,
        defaults: &PaginationDefaults,
    ) -> Self {
        let page = page
            .and_then(parse_integer)
            .map(|p| usize::try_from(p.max(1)).unwrap_or(DEFAULT_PAGE))
            .unwrap_or(DEFAULT_PAGE);

        let per_page = per_page
            .and_then(parse_integer)
            .filter(|pp| *pp > 0)
            .map(|pp| usize::try_from(pp).unwrap_or(defaults.max_per_page))
            .unwrap_or(defaults.per_page)
            .min(defaults.max_per_page.max(1));

        Self::new(page, per_page)
    }

    /// Index of the first snapshot on this page, before clamping to the store.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }
}

fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Number of pages needed for `total` items, `ceil(total / per_page)`.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total / per_page + usize::from(total % per_page != 0)
}

/// Index range of the page within a sequence of `total` items.
///
/// Both ends are clamped to `total`, so an out-of-range page yields an empty
/// range at the end of the sequence.
pub fn page_bounds(total: usize, request: &PageRequest) -> Range<usize> {
    let start = request.offset().min(total);
    let end = start.saturating_add(request.per_page).min(total);
    start..end
}

/// Computes the page described by `request` from `store`.
///
/// `path` is the inspection endpoint path used to build navigation links.
pub fn paginate(store: &SnapshotStore, request: PageRequest, path: &str) -> PageView {
    let (total, data) = store.page(|total| page_bounds(total, &request));

    let total_page = total_pages(total, request.per_page);
    let has_prev = request.page > 1;
    let has_next = request.page < total_page;

    let prev_page_url = if has_prev {
        page_url(path, request.page - 1, request.per_page)
    } else {
        String::new()
    };
    let next_page_url = if has_next {
        page_url(path, request.page + 1, request.per_page)
    } else {
        String::new()
    };

    PageView {
        total,
        total_page,
        current_page: request.page,
        per_page: request.per_page,
        has_next,
        has_prev,
        next_page_url,
        prev_page_url,
        data,
    }
}

fn page_url(path: &str, page: usize, per_page: usize) -> String {
    format!("{}?page={}&per_page={}", path, page, per_page)
}
