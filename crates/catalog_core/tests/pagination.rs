use catalog_core::db::open_db_in_memory;
use catalog_core::{NewProduct, PageRequest, ProductService, SqliteProductRepository};
use rusqlite::Connection;

fn service_over(conn: &Connection) -> ProductService<SqliteProductRepository<'_>> {
    let repo = SqliteProductRepository::try_new(conn).unwrap();
    ProductService::new(repo)
}

fn seed_products(service: &ProductService<SqliteProductRepository<'_>>, count: i64) {
    for index in 1..=count {
        service
            .create(NewProduct::new(format!("product-{index:02}"), index as f64))
            .unwrap();
    }
}

#[test]
fn empty_store_lists_no_data_and_default_meta() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let page = service.find_all(PageRequest::default()).unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.meta.page, 1);
    assert_eq!(page.meta.limit, 10);
    assert_eq!(page.meta.total_products, 0);
    assert_eq!(page.meta.last_page, 0);
}

#[test]
fn last_page_rounds_up_to_cover_the_remainder() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);
    seed_products(&service, 7);

    let first = service.find_all(PageRequest::new(1, 3)).unwrap();
    assert_eq!(first.data.len(), 3);
    assert_eq!(first.meta.total_products, 7);
    assert_eq!(first.meta.last_page, 3);

    let tail = service.find_all(PageRequest::new(3, 3)).unwrap();
    assert_eq!(tail.data.len(), 1);
    assert_eq!(tail.data[0].id, 7);
}

#[test]
fn page_past_the_end_is_empty_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);
    seed_products(&service, 4);

    let page = service.find_all(PageRequest::new(9, 10)).unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.meta.page, 9);
    assert_eq!(page.meta.total_products, 4);
    assert_eq!(page.meta.last_page, 1);
}

#[test]
fn pages_walk_the_store_in_id_order_without_gaps() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);
    seed_products(&service, 6);

    let mut ids = Vec::new();
    for page_number in 1..=3 {
        let page = service.find_all(PageRequest::new(page_number, 2)).unwrap();
        ids.extend(page.data.iter().map(|product| product.id));
    }

    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn removed_products_disappear_from_data_and_count() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);
    seed_products(&service, 5);

    service.remove(2).unwrap();
    service.remove(4).unwrap();

    let page = service.find_all(PageRequest::default()).unwrap();
    let ids: Vec<_> = page.data.iter().map(|product| product.id).collect();

    assert_eq!(ids, vec![1, 3, 5]);
    assert_eq!(page.meta.total_products, 3);
    assert_eq!(page.meta.last_page, 1);
}

#[test]
fn pages_fill_across_tombstones() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);
    seed_products(&service, 5);

    service.remove(1).unwrap();
    service.remove(2).unwrap();

    let first = service.find_all(PageRequest::new(1, 2)).unwrap();
    let ids: Vec<_> = first.data.iter().map(|product| product.id).collect();

    assert_eq!(ids, vec![3, 4]);
    assert_eq!(first.meta.last_page, 2);

    let second = service.find_all(PageRequest::new(2, 2)).unwrap();
    let tail_ids: Vec<_> = second.data.iter().map(|product| product.id).collect();
    assert_eq!(tail_ids, vec![5]);
}

#[test]
fn degenerate_page_and_limit_inputs_are_normalized() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);
    seed_products(&service, 3);

    let page = service.find_all(PageRequest::new(0, 0)).unwrap();

    assert_eq!(page.meta.page, 1);
    assert_eq!(page.meta.limit, 10);
    assert_eq!(page.data.len(), 3);
}

#[test]
fn page_meta_serializes_with_camel_case_keys() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);
    seed_products(&service, 2);

    let meta = service.find_all(PageRequest::default()).unwrap().meta;
    let json = serde_json::to_value(meta).unwrap();

    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["totalProducts"], 2);
    assert_eq!(json["lastPage"], 1);
}

#[test]
fn page_request_deserializes_missing_fields_as_defaults() {
    let partial: PageRequest = serde_json::from_str(r#"{"page": 3}"#).unwrap();
    assert_eq!(partial, PageRequest::new(3, 10));

    let empty: PageRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, PageRequest::default());
}
