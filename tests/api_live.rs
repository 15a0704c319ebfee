//! Live TIGERweb tests. Run with: `cargo test --features online`
#![cfg(feature = "online")]

use county_spotlight::select::by_geoid;
use county_spotlight::{Client, CountySource, OutFields, Query};

#[test]
fn california_has_58_counties() {
    let client = Client::default();
    let fc = client.fetch_collection(&Query::state("06").unwrap()).unwrap();
    assert_eq!(fc.len(), 58);
    let s = by_geoid(&fc, "06109").unwrap();
    assert!(s.feature.name.starts_with("Tuolumne"));
    assert_eq!(s.feature.state_name, "California");
    assert!(s.feature.geometry.is_some());
}

#[test]
fn national_attribute_table_is_complete() {
    let client = Client::default();
    let fc = client
        .fetch_collection(
            &Query::all()
                .with_out_fields(OutFields::attributes())
                .attributes_only(),
        )
        .unwrap();
    // 3,143 counties and equivalents in the 50 states + DC, plus territories.
    assert!(fc.len() >= 3143, "got {}", fc.len());
}
