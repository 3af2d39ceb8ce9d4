//! Flattening serde types and dynamic values.
//!
//! Run with: cargo run --example serde_values

use serde::Serialize;
use serde_flatpath::{flatten, to_flat_map, to_flat_map_with_options, to_value, value, FlattenOptions};
use std::collections::HashMap;
use std::error::Error;

#[derive(Serialize)]
struct Order {
    id: u64,
    lines: Vec<Line>,
    status: Status,
    coupon: Option<String>,
}

#[derive(Serialize)]
struct Line {
    sku: String,
    qty: u32,
    price: f64,
}

#[derive(Serialize)]
enum Status {
    Shipped { carrier: String, tracking: String },
}

#[derive(Serialize, PartialEq, Eq, Hash)]
struct Region {
    code: &'static str,
}

fn main() -> Result<(), Box<dyn Error>> {
    let order = Order {
        id: 1001,
        lines: vec![
            Line {
                sku: "A-1".to_string(),
                qty: 2,
                price: 9.5,
            },
            Line {
                sku: "B-7".to_string(),
                qty: 1,
                price: 120.0,
            },
        ],
        status: Status::Shipped {
            carrier: "DHL".to_string(),
            tracking: "JD0002".to_string(),
        },
        coupon: None,
    };

    println!("Order:\n{}\n", to_flat_map(&order)?);

    let options = FlattenOptions::new().with_include_nulls(true);
    println!("With nulls:\n{}\n", to_flat_map_with_options(&order, options)?);

    // struct keys have no text of their own
    let mut sales = HashMap::new();
    sales.insert(Region { code: "EU" }, 12);
    println!("Struct keys:\n{}\n", to_flat_map(&sales)?);

    let value = to_value(&order)?;
    println!("Value type: {:?}", value.as_object().map(|o| o.type_name()));

    let config = value!(Config {
        "name": "edge",
        "ports": [80, 443],
        "limits": { "rps": 100 }
    });
    println!("Dynamic:\n{}", flatten(&config)?);

    Ok(())
}
