use campus::utils::listing::ListQuery;
use campus::utils::pagination::{PageMeta, PageRequest, PageWindow};

#[test]
fn test_listing_always_filters_soft_deleted_rows() {
    let query = ListQuery::new("departments", "id, code, name", "is_deleted");

    let window = PageWindow {
        page: 1,
        page_size: 10,
    };

    assert!(query.count_sql().contains("WHERE is_deleted = FALSE"));
    assert!(query.data_sql(&window).contains("WHERE is_deleted = FALSE"));
}

#[test]
fn test_keyword_matches_any_designated_column() {
    let query = ListQuery::new("departments", "id", "is_deleted")
        .keyword(&["code", "name"], Some("abc"));

    assert_eq!(
        query.count_sql(),
        "SELECT COUNT(*) FROM departments WHERE is_deleted = FALSE \
         AND (code ILIKE $1 OR name ILIKE $1)"
    );
}

#[test]
fn test_absent_and_blank_keywords_are_no_filter() {
    let absent = ListQuery::new("departments", "id", "is_deleted").keyword(&["code"], None);
    let blank = ListQuery::new("departments", "id", "is_deleted").keyword(&["code"], Some(""));

    assert_eq!(absent.count_sql(), blank.count_sql());
    assert!(!absent.count_sql().contains("ILIKE"));
}

#[test]
fn test_status_filter_binds_after_keyword() {
    let query = ListQuery::new("accounts a", "a.id", "a.is_deleted")
        .keyword(&["a.email"], Some("jo"))
        .equals("a.status", Some("active"));

    assert!(query.count_sql().ends_with("AND a.status = $2"));
}

#[test]
fn test_window_maths_flow_into_sql() {
    let params = PageRequest {
        page: Some(4),
        page_size: Some(25),
    };
    let window = params.window().unwrap();

    let query = ListQuery::new("students", "id", "is_deleted").order_by("id");

    assert!(query.data_sql(&window).ends_with("LIMIT 25 OFFSET 75"));
}

#[test]
fn test_page_request_rejects_non_positive_values() {
    for (page, page_size) in [(Some(0), Some(10)), (Some(-1), Some(10)), (Some(1), Some(0)), (Some(1), Some(-3))] {
        let params = PageRequest { page, page_size };
        assert!(params.window().is_err(), "page={:?} page_size={:?}", page, page_size);
    }
}

#[test]
fn test_total_pages_is_ceiling_of_total_over_page_size() {
    let window = PageWindow {
        page: 1,
        page_size: 7,
    };

    assert_eq!(PageMeta::new(0, &window).total_pages, 0);
    assert_eq!(PageMeta::new(7, &window).total_pages, 1);
    assert_eq!(PageMeta::new(8, &window).total_pages, 2);
    assert_eq!(PageMeta::new(49, &window).total_pages, 7);
    assert_eq!(PageMeta::new(50, &window).total_pages, 8);
}
