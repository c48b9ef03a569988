//! End-to-end tests for the query service over real temporary directories.

use leadstats::cache::Clock;
use leadstats::config::Config;
use leadstats::service::{CategoriesQuery, QueryService};
use leadstats::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn write_us_fixture(root: &Path) {
    let merged = root.join("US_Merged");
    fs::create_dir_all(&merged).unwrap();
    fs::write(
        merged.join("restaurants.csv"),
        "Name,Phone,Address\n\
         Joe's,555-0001,\"12 Main St, Austin, Texas\"\n\
         Maria's,555-0002,\"9 Oak St, Dallas, Texas\"\n\
         Lou's,555-0003,\"3 Pine St, Fresno, California\"\n",
    )
    .unwrap();
    fs::write(merged.join("schools.csv"), "Name,Email,Website\n").unwrap();
}

fn service(root: &Path) -> QueryService {
    QueryService::new(Config::new(root))
}

#[tokio::test]
async fn test_country_listing_includes_empty_categories() {
    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());
    let service = service(temp.path());

    let response = service
        .list_categories(&CategoriesQuery::new("US"))
        .await
        .unwrap();

    assert_eq!(response.total_categories, 2);
    assert_eq!(response.pagination.total_pages, 1);
    assert!(!response.pagination.has_next_page);

    // Sorted by display name: Restaurants before Schools
    assert_eq!(response.categories[0].name, "restaurants");
    assert_eq!(response.categories[0].records, 3);
    assert!(response.categories[0].flags.has_phone);
    assert!(!response.categories[0].flags.has_email);
    assert_eq!(response.categories[0].file_name.as_deref(), Some("restaurants.csv"));
    assert!(response.categories[0].file_size.unwrap() > 0);

    // A header-only file is a real category with zero records
    assert_eq!(response.categories[1].name, "schools");
    assert_eq!(response.categories[1].records, 0);
    assert!(response.categories[1].flags.has_email);
    assert!(response.categories[1].flags.has_website);
}

#[tokio::test]
async fn test_repeated_query_is_served_from_memory() {
    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());
    let service = service(temp.path());

    let mut query = CategoriesQuery::new("US");
    query.state = Some("Texas".to_string());

    let first = service.list_categories(&query).await.unwrap();
    let scanned = service.files_scanned();
    assert_eq!(scanned, 2);

    let second = service.list_categories(&query).await.unwrap();
    assert_eq!(service.files_scanned(), scanned);
    assert_eq!(second.total_categories, first.total_categories);

    // A different signature is a separate entry
    query.state = Some("California".to_string());
    service.list_categories(&query).await.unwrap();
    assert!(service.files_scanned() > scanned);
}

#[tokio::test]
async fn test_memory_entries_expire_after_ttl() {
    struct ManualClock {
        base: Instant,
        offset: Mutex<Duration>,
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }
    }

    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());

    let clock = Arc::new(ManualClock {
        base: Instant::now(),
        offset: Mutex::new(Duration::ZERO),
    });
    let config = Config::new(temp.path()).with_memory_ttl(Duration::from_secs(60));
    let service = QueryService::with_clock(config, clock.clone());

    let mut query = CategoriesQuery::new("US");
    query.state = Some("Texas".to_string());

    service.list_categories(&query).await.unwrap();
    let scanned = service.files_scanned();

    *clock.offset.lock().unwrap() += Duration::from_secs(61);
    service.list_categories(&query).await.unwrap();
    assert!(service.files_scanned() > scanned);
}

#[tokio::test]
async fn test_country_blob_invalidated_by_new_file() {
    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());
    let service = service(temp.path());

    let response = service
        .list_categories(&CategoriesQuery::new("US"))
        .await
        .unwrap();
    assert_eq!(response.total_categories, 2);
    let scanned = service.files_scanned();

    // A new file changes the directory's file count, so the persisted
    // country blob must be discarded and rebuilt
    fs::write(
        temp.path().join("US_Merged").join("gyms.csv"),
        "Name,Email\nIron Gym,iron@x.com\n",
    )
    .unwrap();

    let mut query = CategoriesQuery::new("US");
    // New page parameter avoids the still-fresh memory entry
    query.page = Some(1);
    query.limit = Some(50);
    let response = service.list_categories(&query).await.unwrap();
    assert_eq!(response.total_categories, 3);
    assert!(service.files_scanned() > scanned);
    assert!(response.categories.iter().any(|c| c.name == "gyms"));
}

#[tokio::test]
async fn test_pagination_envelope_on_last_page() {
    let temp = TempDir::new().unwrap();
    let merged = temp.path().join("US_Merged");
    fs::create_dir_all(&merged).unwrap();
    for i in 0..45 {
        fs::write(
            merged.join(format!("category_{i:02}.csv")),
            "Name,Phone\nOne,555\n",
        )
        .unwrap();
    }
    let service = service(temp.path());

    let mut query = CategoriesQuery::new("US");
    query.page = Some(3);
    query.limit = Some(20);
    let response = service.list_categories(&query).await.unwrap();

    assert_eq!(response.pagination.total, 45);
    assert_eq!(response.pagination.total_pages, 3);
    assert_eq!(response.categories.len(), 5);
    assert!(!response.pagination.has_next_page);
    assert!(response.pagination.has_prev_page);
}

#[tokio::test]
async fn test_location_with_unknown_category_is_empty_not_error() {
    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());
    let service = service(temp.path());

    let mut query = CategoriesQuery::new("US");
    query.state = Some("Texas".to_string());
    query.category = Some("gyms".to_string());
    let response = service.list_categories(&query).await.unwrap();

    assert_eq!(response.total_categories, 0);
    assert!(response.categories.is_empty());
    assert_eq!(response.pagination.total, 0);
}

#[tokio::test]
async fn test_precomputed_state_blob_serves_queries_without_scanning() {
    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());
    let service = service(temp.path());

    let targets: &[&str] = &["Texas", "California"];
    let stats = service
        .build_merged_cache("US", Some(targets), false)
        .await
        .unwrap();
    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.blobs_written, 2);

    let mut query = CategoriesQuery::new("US");
    query.state = Some("Texas".to_string());
    let response = service.list_categories(&query).await.unwrap();

    // Served from the disk blob; the on-demand counter never moves
    assert_eq!(service.files_scanned(), 0);
    assert_eq!(response.state, "Texas");
    assert_eq!(response.total_categories, 1);
    assert_eq!(response.categories[0].name, "restaurants");
    assert_eq!(response.categories[0].records, 2);
}

#[tokio::test]
async fn test_unknown_country_is_not_found() {
    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());
    let service = service(temp.path());

    let result = service.list_categories(&CategoriesQuery::new("FR")).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn test_blank_country_is_a_validation_error() {
    let temp = TempDir::new().unwrap();
    write_us_fixture(temp.path());
    let service = service(temp.path());

    let result = service.list_categories(&CategoriesQuery::new("  ")).await;
    assert!(matches!(result, Err(Error::Validation { .. })));
}
