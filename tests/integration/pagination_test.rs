//! Pagination behaviour of the inspection endpoint.

use super::{default_inspector, fetch_page, get_path, test_app};
use request_inspector::{Inspector, InspectorConfig};

async fn record_paths(app: &axum::Router, count: usize) {
    for i in 0..count {
        get_path(app, &format!("/items/{}", i)).await;
    }
}

#[tokio::test]
async fn test_newest_first_ordering() {
    let inspector = default_inspector();
    let app = test_app(&inspector);
    record_paths(&app, 6).await;

    let page = fetch_page(&app, "per_page=10").await;
    let urls: Vec<&str> = page.data.iter().map(|s| s.request_url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["/items/5", "/items/4", "/items/3", "/items/2", "/items/1", "/items/0"]
    );
    assert_eq!(page.total_page, 1);
    assert!(!page.has_next);
    assert!(!page.has_prev);
}

#[tokio::test]
async fn test_navigation_links() {
    let inspector = default_inspector();
    let app = test_app(&inspector);
    record_paths(&app, 5).await;

    let page = fetch_page(&app, "page=2&per_page=2").await;
    assert_eq!(page.total, 5);
    assert_eq!(page.total_page, 3);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.per_page, 2);
    assert!(page.has_prev);
    assert!(page.has_next);
    assert_eq!(page.prev_page_url, "/_inspector?page=1&per_page=2");
    assert_eq!(page.next_page_url, "/_inspector?page=3&per_page=2");
    assert_eq!(page.data[0].request_url, "/items/2");
    assert_eq!(page.data[1].request_url, "/items/1");

    let last = fetch_page(&app, "page=3&per_page=2").await;
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].request_url, "/items/0");
    assert!(!last.has_next);
    assert!(last.next_page_url.is_empty());
}

#[tokio::test]
async fn test_invalid_parameters_fall_back_to_defaults() {
    let inspector = default_inspector();
    let app = test_app(&inspector);
    record_paths(&app, 3).await;

    let page = fetch_page(&app, "page=first&per_page=many").await;
    assert_eq!(page.current_page, 1);
    assert_eq!(page.per_page, 20);
    assert_eq!(page.data.len(), 3);

    let page = fetch_page(&app, "page=-2&per_page=0").await;
    assert_eq!(page.current_page, 1);
    assert_eq!(page.per_page, 20);
    assert!(!page.has_prev);
}

#[tokio::test]
async fn test_out_of_range_page_is_empty_not_an_error() {
    let inspector = default_inspector();
    let app = test_app(&inspector);
    record_paths(&app, 3).await;

    let page = fetch_page(&app, "page=50&per_page=2").await;
    assert!(page.data.is_empty());
    assert_eq!(page.total, 3);
    assert!(page.has_prev);
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_capacity_evicts_oldest() {
    let inspector = Inspector::new(InspectorConfig {
        capacity: 3,
        ..Default::default()
    })
    .unwrap();
    let app = test_app(&inspector);
    record_paths(&app, 5).await;

    let page = fetch_page(&app, "").await;
    assert_eq!(page.total, 3);
    let urls: Vec<&str> = page.data.iter().map(|s| s.request_url.as_str()).collect();
    assert_eq!(urls, vec!["/items/4", "/items/3", "/items/2"]);
}

#[tokio::test]
async fn test_per_page_is_clamped_to_maximum() {
    let inspector = Inspector::new(InspectorConfig {
        default_per_page: 2,
        max_per_page: 3,
        ..Default::default()
    })
    .unwrap();
    let app = test_app(&inspector);
    record_paths(&app, 5).await;

    let page = fetch_page(&app, "per_page=100").await;
    assert_eq!(page.per_page, 3);
    assert_eq!(page.data.len(), 3);

    let page = fetch_page(&app, "").await;
    assert_eq!(page.per_page, 2);
    assert_eq!(page.total_page, 3);
}
