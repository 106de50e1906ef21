//! Shared test harness for sales store backends
//!
//! Provides a fixed sample dataset, helpers for building request
//! parameters, and the `sales_store_tests!` macro which generates the
//! behavioural test-suite for any [`SalesStore`] factory.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! async fn make_store(rows: Vec<RawRow>) -> StoreFixture { ... }
//! sales_store_tests!(make_store);
//! ```

#![allow(dead_code)]

use sales_query::core::{RawRow, SalesQueryParams, SalesStore};
use serde_json::json;
use std::sync::Arc;

/// A store under test plus whatever must outlive it (temp dirs, ...)
pub struct StoreFixture {
    pub store: Arc<dyn SalesStore>,
    pub guard: Option<Box<dyn std::any::Any + Send>>,
}

impl StoreFixture {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self { store, guard: None }
    }

    pub fn with_guard(mut self, guard: impl std::any::Any + Send) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }
}

#[allow(clippy::too_many_arguments)]
pub fn sale(
    id: &str,
    date: &str,
    name: &str,
    phone: &str,
    gender: &str,
    age: i64,
    region: &str,
    category: &str,
    tags: Option<&str>,
    quantity: i64,
    total: f64,
    final_amount: f64,
    payment: &str,
) -> RawRow {
    let row = json!({
        "Transaction ID": id,
        "Date": date,
        "Customer ID": format!("CUST-{}", id),
        "Customer Name": name,
        "Phone Number": phone,
        "Gender": gender,
        "Age": age,
        "Customer Region": region,
        "Customer Type": "Regular",
        "Product ID": format!("PROD-{}", id),
        "Product Name": format!("{} item", category),
        "Brand": "Acme",
        "Product Category": category,
        "Tags": tags,
        "Quantity": quantity,
        "Price per Unit": total / quantity as f64,
        "Discount Percentage": ((total - final_amount) / total * 100.0).round(),
        "Total Amount": total,
        "Final Amount": final_amount,
        "Payment Method": payment,
        "Order Status": "Completed",
        "Delivery Type": "Standard",
    });
    row.as_object().cloned().expect("row is an object")
}

/// Ten rows covering every filter dimension
///
/// Store, salesperson and employee columns are intentionally absent so the
/// normalizer's null handling is exercised.
pub fn sample_rows() -> Vec<RawRow> {
    vec![
        sale(
            "T001",
            "2023-01-05",
            "Ada Lovelace",
            "+91 98765 43210",
            "Female",
            17,
            "North",
            "Electronics",
            Some("Electronics,Sale"),
            2,
            200.0,
            180.0,
            "Cash",
        ),
        sale(
            "T002",
            "2023-02-11",
            "Alan Turing",
            "+91 91234 56789",
            "Male",
            22,
            "South",
            "Clothing",
            Some("casual,Sale"),
            1,
            50.0,
            50.0,
            "Card",
        ),
        sale(
            "T003",
            "2023-03-20",
            "Grace Hopper",
            "+91 99887 77665",
            "Female",
            40,
            "East",
            "Electronics",
            Some("Electronics,gadgets"),
            3,
            300.0,
            270.5,
            "UPI",
        ),
        sale(
            "T004",
            "2023-01-25",
            "Edsger Dijkstra",
            "+91 90000 11111",
            "Male",
            35,
            "North",
            "Beauty",
            Some("organic, skincare"),
            5,
            125.0,
            100.25,
            "Cash",
        ),
        sale(
            "T005",
            "2023-04-02",
            "Barbara Liskov",
            "+91 93333 22222",
            "Female",
            29,
            "West",
            "Electronics",
            Some("Electronics, Sale, gadgets"),
            1,
            999.99,
            899.99,
            "Card",
        ),
        sale(
            "T006",
            "2023-02-28",
            "Donald Knuth",
            "+91 94444 33333",
            "Male",
            55,
            "Northeast",
            "Clothing",
            Some("formal"),
            4,
            400.0,
            360.0,
            "Net Banking",
        ),
        sale(
            "T007",
            "2023-03-03",
            "Ada Byron",
            "+91 95555 44444",
            "Female",
            61,
            "South",
            "Beauty",
            Some("Sale,organic"),
            2,
            80.0,
            72.0,
            "UPI",
        ),
        sale(
            "T008",
            "2023-05-15",
            "Linus Torvalds",
            "+91 96666 55555",
            "Male",
            45,
            "East",
            "Electronics",
            Some("Electronics"),
            6,
            600.0,
            600.0,
            "Cash",
        ),
        sale(
            "T009",
            "2023-05-15",
            "Ken Thompson",
            "+91 97777 66666",
            "Male",
            52,
            "West",
            "Clothing",
            Some("casual"),
            2,
            90.0,
            81.0,
            "Card",
        ),
        sale(
            "T010",
            "2023-06-01",
            "Radia Perlman",
            "100%_match",
            "Female",
            33,
            "North",
            "Electronics",
            None,
            1,
            150.0,
            135.0,
            "Debit Card",
        ),
    ]
}

/// Build raw parameters the way the HTTP layer would
pub fn params(pairs: &[(&str, &str)]) -> SalesQueryParams {
    SalesQueryParams::from_pairs(pairs.iter().copied())
}

/// Transaction ids of the returned items, in order
pub fn ids(items: &[sales_query::core::SalesRecord]) -> Vec<String> {
    items
        .iter()
        .map(|r| r.transaction_id.as_str().unwrap_or_default().to_string())
        .collect()
}

/// Generate the behavioural suite for a store factory
///
/// `$factory` is an `async fn(Vec<RawRow>) -> StoreFixture`.
#[macro_export]
macro_rules! sales_store_tests {
    ($factory:path) => {
        mod sales_store_suite {
            use super::*;
            use sales_query::core::{SalesQueryService, SalesStats};
            use serde_json::json;
            use std::collections::HashSet;

            async fn service() -> (SalesQueryService, StoreFixture) {
                let fixture = $factory(sample_rows()).await;
                (SalesQueryService::new(fixture.store.clone()), fixture)
            }

            #[tokio::test]
            async fn empty_filters_return_everything() {
                let (svc, _f) = service().await;
                let res = svc.list_sales(&params(&[])).await.unwrap();
                assert_eq!(res.total_items, 10);
                assert_eq!(res.items.len(), 10);
                assert_eq!(res.page, 1);
                assert_eq!(res.page_size, 10);
                assert_eq!(res.total_pages, 1);
            }

            #[tokio::test]
            async fn count_equals_rows_summed_over_pages() {
                let (svc, _f) = service().await;
                let first = svc.list_sales(&params(&[("page_size", "3")])).await.unwrap();
                assert_eq!(first.total_pages, 4);

                let mut seen = HashSet::new();
                let mut total = 0;
                for page in 1..=first.total_pages {
                    let p = page.to_string();
                    let res = svc
                        .list_sales(&params(&[("page_size", "3"), ("page", &p)]))
                        .await
                        .unwrap();
                    assert!(res.items.len() <= 3);
                    if page == first.total_pages {
                        assert_eq!(res.items.len(), 1);
                    }
                    total += res.items.len() as u64;
                    seen.extend(ids(&res.items));
                }
                assert_eq!(total, first.total_items);
                assert_eq!(seen.len(), 10);
            }

            #[tokio::test]
            async fn stats_cover_filtered_set_not_page() {
                let (svc, _f) = service().await;
                let small = svc
                    .list_sales(&params(&[
                        ("customer_region", "North,South"),
                        ("page_size", "1"),
                    ]))
                    .await
                    .unwrap();
                let large = svc
                    .list_sales(&params(&[
                        ("customer_region", "North,South"),
                        ("page_size", "1000"),
                    ]))
                    .await
                    .unwrap();

                assert_eq!(small.items.len(), 1);
                assert_eq!(large.items.len(), 5);
                assert_eq!(small.stats, large.stats);
                assert_eq!(
                    large.stats,
                    SalesStats {
                        total_quantity: 11,
                        total_amount: 537.25,
                        total_discount: 67.75,
                    }
                );
            }

            #[tokio::test]
            async fn membership_is_exact_match() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[
                        ("customer_region", "North"),
                        ("sort_by", "date"),
                        ("sort_order", "asc"),
                    ]))
                    .await
                    .unwrap();
                assert_eq!(ids(&res.items), vec!["T001", "T004", "T010"]);

                let res = svc
                    .list_sales(&params(&[("customer_region", "north")]))
                    .await
                    .unwrap();
                assert_eq!(res.total_items, 0);
            }

            #[tokio::test]
            async fn tags_require_every_tag() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("tags", "Electronics,Sale"), ("sort_order", "asc")]))
                    .await
                    .unwrap();
                assert_eq!(ids(&res.items), vec!["T001", "T005"]);
            }

            #[tokio::test]
            async fn age_range_is_inclusive() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("age_min", "18")]))
                    .await
                    .unwrap();
                assert_eq!(res.total_items, 9);
                assert!(!ids(&res.items).contains(&"T001".to_string()));

                let res = svc
                    .list_sales(&params(&[
                        ("age_min", "22"),
                        ("age_max", "40"),
                        ("sort_order", "asc"),
                    ]))
                    .await
                    .unwrap();
                let mut got = ids(&res.items);
                got.sort();
                assert_eq!(got, vec!["T002", "T003", "T004", "T005", "T010"]);
            }

            #[tokio::test]
            async fn name_search_is_case_insensitive() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("search_name", "ADA"), ("sort_order", "asc")]))
                    .await
                    .unwrap();
                assert_eq!(ids(&res.items), vec!["T001", "T007"]);
            }

            #[tokio::test]
            async fn search_wildcards_match_literally() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("search_phone", "%_")]))
                    .await
                    .unwrap();
                assert_eq!(ids(&res.items), vec!["T010"]);
            }

            #[tokio::test]
            async fn date_range_compares_strings() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[
                        ("date_from", "2023-02-01"),
                        ("date_to", "2023-03-31"),
                        ("sort_order", "asc"),
                    ]))
                    .await
                    .unwrap();
                assert_eq!(ids(&res.items), vec!["T002", "T006", "T007", "T003"]);
            }

            #[tokio::test]
            async fn default_sort_is_date_desc_with_stable_ties() {
                let (svc, _f) = service().await;
                let res = svc.list_sales(&params(&[("page_size", "3")])).await.unwrap();
                assert_eq!(ids(&res.items), vec!["T010", "T008", "T009"]);
            }

            #[tokio::test]
            async fn unknown_sort_field_falls_back_to_date() {
                let (svc, _f) = service().await;
                let fallback = svc
                    .list_sales(&params(&[("sort_by", "price")]))
                    .await
                    .unwrap();
                let default = svc.list_sales(&params(&[])).await.unwrap();
                assert_eq!(ids(&fallback.items), ids(&default.items));
            }

            #[tokio::test]
            async fn unknown_sort_order_falls_back_to_desc() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("sort_by", "quantity"), ("sort_order", "sideways")]))
                    .await
                    .unwrap();
                assert_eq!(res.items[0].transaction_id, json!("T008"));
            }

            #[tokio::test]
            async fn quantity_ascending_keeps_insertion_order_for_ties() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("sort_by", "quantity"), ("sort_order", "ASC")]))
                    .await
                    .unwrap();
                assert_eq!(&ids(&res.items)[..3], &["T002", "T005", "T010"]);
                let quantities: Vec<i64> = res
                    .items
                    .iter()
                    .map(|r| r.quantity.as_i64().unwrap())
                    .collect();
                assert!(quantities.windows(2).all(|w| w[0] <= w[1]));
            }

            #[tokio::test]
            async fn customer_name_sort() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[
                        ("sort_by", "customer_name"),
                        ("sort_order", "asc"),
                        ("page_size", "2"),
                    ]))
                    .await
                    .unwrap();
                assert_eq!(ids(&res.items), vec!["T007", "T001"]);
            }

            #[tokio::test]
            async fn page_past_the_end_is_empty() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("page", "5"), ("page_size", "5")]))
                    .await
                    .unwrap();
                assert!(res.items.is_empty());
                assert_eq!(res.total_items, 10);
                assert_eq!(res.total_pages, 2);
            }

            #[tokio::test]
            async fn huge_page_numbers_return_an_empty_page() {
                let (svc, _f) = service().await;
                for (page, page_size) in [
                    ("4611686018427387904", "3"),
                    ("9223372036854775807", "1000"),
                    ("3074457345618258603", "3"),
                ] {
                    let res = svc
                        .list_sales(&params(&[("page", page), ("page_size", page_size)]))
                        .await
                        .unwrap();
                    assert!(res.items.is_empty(), "page={} page_size={}", page, page_size);
                    assert_eq!(res.total_items, 10);
                    assert_eq!(res.page.to_string(), page);
                }
            }

            #[tokio::test]
            async fn no_match_returns_zeroed_envelope() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("search_name", "zzz")]))
                    .await
                    .unwrap();
                assert!(res.items.is_empty());
                assert_eq!(res.total_items, 0);
                assert_eq!(res.total_pages, 1);
                assert_eq!(res.stats, SalesStats::default());
            }

            #[tokio::test]
            async fn records_are_normalized() {
                let (svc, _f) = service().await;
                let res = svc
                    .list_sales(&params(&[("search_name", "lovelace")]))
                    .await
                    .unwrap();
                let record = &res.items[0];
                assert_eq!(record.transaction_id, json!("T001"));
                assert_eq!(record.customer_region, json!("North"));
                assert_eq!(record.age, json!(17));
                assert_eq!(record.final_amount, json!(180.0));
                assert_eq!(record.tags, json!("Electronics,Sale"));
                assert!(record.employee_name.is_null());
                assert!(record.store_location.is_null());
            }

            #[tokio::test]
            async fn filter_metadata_is_sorted_and_deduplicated() {
                let (svc, _f) = service().await;
                let meta = svc.filter_metadata().await.unwrap();
                assert_eq!(
                    meta.customer_region,
                    vec!["East", "North", "Northeast", "South", "West"]
                );
                assert_eq!(meta.gender, vec!["Female", "Male"]);
                assert_eq!(meta.product_category, vec!["Beauty", "Clothing", "Electronics"]);
                assert_eq!(
                    meta.payment_method,
                    vec!["Card", "Cash", "Debit Card", "Net Banking", "UPI"]
                );
                assert_eq!(
                    meta.tags,
                    vec![
                        "Electronics",
                        "Sale",
                        "casual",
                        "formal",
                        "gadgets",
                        "organic",
                        "skincare",
                    ]
                );
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn filter_metadata_converges_under_concurrent_first_access() {
                let (svc, _f) = service().await;
                let handles: Vec<_> = (0..8)
                    .map(|_| {
                        let svc = svc.clone();
                        tokio::spawn(async move { svc.filter_metadata().await.unwrap() })
                    })
                    .collect();

                let mut results = Vec::new();
                for handle in handles {
                    results.push(handle.await.unwrap());
                }
                assert!(results.windows(2).all(|w| w[0] == w[1]));
                assert!(results.windows(2).all(|w| std::sync::Arc::ptr_eq(&w[0], &w[1])));
            }

            #[tokio::test]
            async fn empty_table() {
                let fixture = $factory(Vec::new()).await;
                let svc = SalesQueryService::new(fixture.store.clone());

                let res = svc.list_sales(&params(&[])).await.unwrap();
                assert!(res.items.is_empty());
                assert_eq!(res.total_items, 0);
                assert_eq!(res.total_pages, 1);
                assert_eq!(
                    serde_json::to_value(res.stats).unwrap(),
                    json!({"total_quantity": 0, "total_amount": 0.0, "total_discount": 0.0})
                );

                let meta = svc.filter_metadata().await.unwrap();
                assert!(meta.customer_region.is_empty());
                assert!(meta.tags.is_empty());
            }
        }
    };
}
