//! Flattening a plain struct into path/value pairs.
//!
//! Run with: cargo run --example simple

use serde_flatpath::{flatten, flatten_with_options, impl_inspect, FlattenOptions};
use std::collections::BTreeMap;
use std::error::Error;

struct Address {
    street: String,
    city: String,
}
impl_inspect!(Address { street, city });

struct User {
    id: u32,
    name: String,
    address: Address,
    roles: Vec<&'static str>,
    nickname: Option<String>,
    quotas: BTreeMap<String, u64>,
}
impl_inspect!(User { id, name, address, roles, nickname, quotas });

fn main() -> Result<(), Box<dyn Error>> {
    let user = User {
        id: 42,
        name: "Alice Johnson".to_string(),
        address: Address {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
        },
        roles: vec!["admin", "ops"],
        nickname: None,
        quotas: BTreeMap::from([("disk_gb".to_string(), 50), ("seats".to_string(), 3)]),
    };

    let map = flatten(&user)?;
    println!("Default output:\n{}\n", map);

    let options = FlattenOptions::new()
        .with_include_nulls(true)
        .with_include_empty_collections(true);
    let map = flatten_with_options(&user, options)?;
    println!("With nulls:\n{}\n", map);

    assert_eq!(map.get("address.city"), Some("Springfield"));
    assert_eq!(map.get("nickname"), Some("<null>"));
    println!("JSON: {}", serde_json::to_string_pretty(&map)?);

    Ok(())
}
