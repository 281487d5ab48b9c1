//! Integration tests for parsing property payloads.
//!
//! The fixture mirrors a `property/query` response captured from a staging account.

use roomkit_core::response::RawResponse;
use roomkit_properties::{Property, PropertyStatus};
use std::fs;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_property_page() -> serde_json::Value {
    let fixture_path = fixtures_dir().join("property_list.json");
    let raw = fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read property fixture at {}: {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&raw).expect("fixture is valid JSON")
}

#[test]
fn test_deserialize_property_page() {
    let page = RawResponse::from_body(200, load_property_page())
        .into_paginated::<Property>()
        .expect("page decodes");

    assert_eq!(page.len(), 2);
    assert_eq!(page.meta.total, 2);
    assert!(!page.has_next_page());
}

#[test]
fn test_full_property_fields() {
    let page = RawResponse::from_body(200, load_property_page())
        .into_paginated::<Property>()
        .unwrap();
    let loft = &page.data[0];

    assert_eq!(loft.name, "Harbour Loft");
    assert_eq!(loft.status, Some(PropertyStatus::Active));
    assert_eq!(loft.bathrooms, Some(1.5));
    assert_eq!(loft.channel_ids.len(), 1);

    let address = loft.address.as_ref().expect("address present");
    assert_eq!(address.city.as_deref(), Some("Porto"));
    assert_eq!(address.country.as_deref(), Some("PT"));
    assert!(loft.created_at.is_some());
}

#[test]
fn test_sparse_property_ignores_unknown_fields() {
    let page = RawResponse::from_body(200, load_property_page())
        .into_paginated::<Property>()
        .unwrap();
    let cabin = &page.data[1];

    assert_eq!(cabin.status, Some(PropertyStatus::Draft));
    assert!(!cabin.is_bookable());
    assert!(cabin.address.is_none());
    assert!(cabin.channel_ids.is_empty());
}
