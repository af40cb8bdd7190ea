//! The page projection served by the inspection endpoint.

use super::snapshot::RequestSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One page of captured requests plus navigation metadata.
///
/// Computed fresh for every inspection request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    /// Number of snapshots in the store when the page was computed.
    pub total: usize,
    /// `ceil(total / per_page)`; zero for an empty store.
    pub total_page: usize,
    /// 1-based page number actually served.
    pub current_page: usize,
    pub per_page: usize,
    pub has_next: bool,
    pub has_prev: bool,
    /// Link to the next page, empty when `has_next` is false.
    pub next_page_url: String,
    /// Link to the previous page, empty when `has_prev` is false.
    pub prev_page_url: String,
    /// Snapshots on this page, newest first.
    pub data: Vec<Arc<RequestSnapshot>>,
}

impl PageView {
    /// Offset of the first snapshot on this page within the store.
    pub fn offset(&self) -> usize {
        self.current_page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(self.total)
    }
}
