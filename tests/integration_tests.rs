use chrono::{NaiveDate, TimeZone, Utc};
use num_bigint::BigInt;
use serde::Serialize;
use serde_flatpath::{
    flatten, flatten_with_options, impl_inspect, to_flat_map, to_flat_map_with_options, FlatMap,
    FlattenOptions, MemberOrder, MemberSelection, Value,
};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

fn pairs(map: &FlatMap) -> Vec<(&str, &str)> {
    map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

#[allow(non_snake_case)]
struct Inner {
    Prop5: BTreeMap<String, i32>,
    Prop6: Option<String>,
}
impl_inspect!(Inner { Prop5, Prop6 });

#[allow(non_snake_case)]
struct Root {
    Prop1: String,
    Prop2: Inner,
    Prop3: Vec<String>,
    Prop4: Vec<f64>,
}
impl_inspect!(Root { Prop1, Prop2, Prop3, Prop4 });

fn root() -> Root {
    Root {
        Prop1: "one".to_string(),
        Prop2: Inner {
            Prop5: BTreeMap::from([("Key3".to_string(), 3), ("Key4".to_string(), 4)]),
            Prop6: None,
        },
        Prop3: Vec::new(),
        Prop4: vec![1.5, -0.25],
    }
}

#[test]
fn test_every_leaf_in_pre_order() {
    let map = flatten(&root()).unwrap();
    assert_eq!(
        pairs(&map),
        vec![
            ("Prop1", "one"),
            ("Prop2.Prop5.Key3", "3"),
            ("Prop2.Prop5.Key4", "4"),
            ("Prop4[0]", "1.5"),
            ("Prop4[1]", "-0.25"),
        ]
    );
}

#[test]
fn test_sentinels_when_included() {
    let options = FlattenOptions::new()
        .with_include_nulls(true)
        .with_include_empty_collections(true);
    let map = flatten_with_options(&root(), options).unwrap();
    assert_eq!(map.get("Prop2.Prop6"), Some("<null>"));
    assert_eq!(map.get("Prop3"), Some("<empty>"));

    let keys: Vec<_> = map.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "Prop1",
            "Prop2.Prop5.Key3",
            "Prop2.Prop5.Key4",
            "Prop2.Prop6",
            "Prop3",
            "Prop4[0]",
            "Prop4[1]",
        ]
    );
}

#[test]
fn test_custom_sentinels() {
    let options = FlattenOptions::new()
        .with_include_nulls(true)
        .with_include_empty_collections(true)
        .with_null_sentinel("null")
        .with_empty_sentinel("[]");
    let map = flatten_with_options(&root(), options).unwrap();
    assert_eq!(map.get("Prop2.Prop6"), Some("null"));
    assert_eq!(map.get("Prop3"), Some("[]"));
}

#[allow(non_snake_case)]
struct Listing {
    Items: Vec<&'static str>,
    Count: usize,
}
impl_inspect!(Listing { Items, Count });

#[test]
fn test_sequence_indexing() {
    let listing = Listing {
        Items: vec!["a", "b", "c"],
        Count: 3,
    };
    let map = flatten(&listing).unwrap();
    assert_eq!(
        pairs(&map),
        vec![
            ("Items[0]", "a"),
            ("Items[1]", "b"),
            ("Items[2]", "c"),
            ("Count", "3"),
        ]
    );
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Coord {
    x: i32,
    y: i32,
}
impl_inspect!(Coord { x, y });

#[allow(non_snake_case)]
struct Grid {
    Map: BTreeMap<Coord, &'static str>,
}
impl_inspect!(Grid { Map });

#[test]
fn test_complex_keys_get_type_tokens() {
    let grid = Grid {
        Map: BTreeMap::from([
            (Coord { x: 0, y: 0 }, "origin"),
            (Coord { x: 1, y: 0 }, "east"),
        ]),
    };
    let map = flatten(&grid).unwrap();
    assert_eq!(
        pairs(&map),
        vec![("Map.Coord`0", "origin"), ("Map.Coord`1", "east")]
    );
}

#[test]
fn test_nested_maps_restart_counters() {
    let mut outer = BTreeMap::new();
    outer.insert("a", BTreeMap::from([(Coord { x: 0, y: 0 }, 1)]));
    outer.insert("b", BTreeMap::from([(Coord { x: 0, y: 0 }, 2)]));
    let map = flatten(&outer).unwrap();
    assert_eq!(pairs(&map), vec![("a.Coord`0", "1"), ("b.Coord`0", "2")]);
}

struct Branches {
    left: Rc<Vec<i32>>,
    right: Rc<Vec<i32>>,
}
impl_inspect!(Branches { left, right });

#[test]
fn test_diamond_is_written_per_branch() {
    let shared = Rc::new(vec![7, 8]);
    let branches = Branches {
        left: Rc::clone(&shared),
        right: shared,
    };
    let map = flatten(&branches).unwrap();
    assert_eq!(
        pairs(&map),
        vec![
            ("left[0]", "7"),
            ("left[1]", "8"),
            ("right[0]", "7"),
            ("right[1]", "8"),
        ]
    );
}

struct Profile {
    zeta: u8,
    alpha: u8,
    token: String,
}

impl Profile {
    const SCHEMA: u32 = 2;
}

impl_inspect!(Profile {
    zeta, alpha;
    private: token;
    static: SCHEMA => Profile::SCHEMA
});

fn profile() -> Profile {
    Profile {
        zeta: 1,
        alpha: 2,
        token: "t".to_string(),
    }
}

#[test]
fn test_member_selection() {
    let public = flatten(&profile()).unwrap();
    assert_eq!(pairs(&public), vec![("zeta", "1"), ("alpha", "2")]);

    let with_private = FlattenOptions::new()
        .with_member_selection(MemberSelection::default().with_non_public(true));
    let map = flatten_with_options(&profile(), with_private).unwrap();
    assert_eq!(map.get("token"), Some("t"));
    assert!(!map.contains_key("SCHEMA"));

    let statics_only = FlattenOptions::new().with_member_selection(
        MemberSelection::default()
            .with_instance(false)
            .with_statics(true),
    );
    let map = flatten_with_options(&profile(), statics_only).unwrap();
    assert_eq!(pairs(&map), vec![("SCHEMA", "2")]);
}

#[test]
fn test_member_order() {
    let options = FlattenOptions::new()
        .with_member_selection(MemberSelection::all())
        .with_member_order(MemberOrder::Alphabetical);
    let map = flatten_with_options(&profile(), options).unwrap();
    let keys: Vec<_> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["SCHEMA", "alpha", "token", "zeta"]);
}

struct Money {
    cents: i64,
}
impl_inspect!(Money { cents });

struct Invoice {
    total: Money,
    lines: Vec<Money>,
}
impl_inspect!(Invoice { total, lines });

#[test]
fn test_converters_turn_objects_into_scalars() {
    let invoice = Invoice {
        total: Money { cents: 350 },
        lines: vec![Money { cents: 100 }, Money { cents: 250 }],
    };

    let plain = flatten(&invoice).unwrap();
    assert_eq!(plain.get("total.cents"), Some("350"));

    let options = FlattenOptions::new()
        .with_converter(|m: &Money| format!("${}.{:02}", m.cents / 100, m.cents % 100));
    let map = flatten_with_options(&invoice, options).unwrap();
    assert_eq!(
        pairs(&map),
        vec![("total", "$3.50"), ("lines[0]", "$1.00"), ("lines[1]", "$2.50")]
    );
}

#[test]
fn test_converters_apply_to_map_keys() {
    let prices = BTreeMap::from([(Coord { x: 2, y: 3 }, 10)]);
    let options = FlattenOptions::new().with_converter(|c: &Coord| format!("{}x{}", c.x, c.y));
    let map = flatten_with_options(&prices, options).unwrap();
    assert_eq!(map.get("2x3"), Some("10"));
}

struct Reading {
    day: NaiveDate,
    flag: bool,
    bytes: Vec<u8>,
    label: Option<Box<String>>,
}
impl_inspect!(Reading { day, flag, bytes, label });

#[test]
fn test_converters_replace_self_rendering_values() {
    let reading = Reading {
        day: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        flag: true,
        bytes: vec![1, 2],
        label: Some(Box::new("north gate".to_string())),
    };
    let options = FlattenOptions::new()
        .with_converter(|d: &NaiveDate| d.format("%d/%m/%Y").to_string())
        .with_converter(|b: &bool| (if *b { "yes" } else { "no" }).to_string())
        .with_converter(|v: &Vec<u8>| v.iter().map(|b| format!("{:02x}", b)).collect::<String>())
        .with_converter(|s: &String| s.to_uppercase());
    let map = flatten_with_options(&reading, options).unwrap();
    assert_eq!(
        pairs(&map),
        vec![
            ("day", "29/02/2024"),
            ("flag", "yes"),
            ("bytes", "0102"),
            ("label", "NORTH GATE"),
        ]
    );
}

#[test]
fn test_converted_empty_collection_is_written() {
    let reading = Reading {
        day: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        flag: false,
        bytes: Vec::new(),
        label: None,
    };
    let options = FlattenOptions::new().with_converter(|v: &Vec<u8>| format!("{} bytes", v.len()));
    let map = flatten_with_options(&reading, options).unwrap();
    assert_eq!(map.get("bytes"), Some("0 bytes"));
    assert!(!map.contains_key("label"));
}

#[test]
fn test_converters_apply_to_scalar_map_keys() {
    let by_day = BTreeMap::from([(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 4)]);
    let options = FlattenOptions::new().with_converter(|d: &NaiveDate| d.format("%b %-d").to_string());
    let map = flatten_with_options(&by_day, options).unwrap();
    assert_eq!(pairs(&map), vec![("Mar 1", "4")]);
}

#[test]
fn test_keys_with_equal_text_keep_both_entries() {
    let map = Value::Map(vec![
        (Value::from(1), Value::from("int key")),
        (Value::from("1"), Value::from("string key")),
    ]);
    let out = flatten(&map).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(pairs(&out), vec![("1", "int key"), ("String`0", "string key")]);
}

#[test]
fn test_converted_keys_never_overwrite() {
    let prices = BTreeMap::from([(Coord { x: 1, y: 2 }, 10), (Coord { x: 3, y: 4 }, 20)]);
    let options = FlattenOptions::new().with_converter(|_: &Coord| "coord".to_string());
    let map = flatten_with_options(&prices, options).unwrap();
    assert_eq!(pairs(&map), vec![("coord", "10"), ("Coord`0", "20")]);
}

struct Event {
    day: NaiveDate,
    at: chrono::DateTime<Utc>,
    big: BigInt,
    ratio: f64,
    flag: bool,
    letter: char,
}
impl_inspect!(Event { day, at, big, ratio, flag, letter });

#[test]
fn test_scalar_forms() {
    let event = Event {
        day: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        at: Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap(),
        big: BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap(),
        ratio: f64::NAN,
        flag: false,
        letter: 'z',
    };
    let map = flatten(&event).unwrap();
    assert_eq!(map.get("day"), Some("2024-02-29"));
    assert_eq!(map.get("at"), Some("2024-02-29T12:30:00+00:00"));
    assert_eq!(map.get("big"), Some("123456789012345678901234567890"));
    assert_eq!(map.get("ratio"), Some("NaN"));
    assert_eq!(map.get("flag"), Some("false"));
    assert_eq!(map.get("letter"), Some("z"));
}

#[derive(Serialize)]
struct Order {
    id: u32,
    customer: Customer,
    lines: Vec<Line>,
    notes: Option<String>,
    status: Status,
}

#[derive(Serialize)]
struct Customer {
    name: String,
}

#[derive(Serialize)]
struct Line {
    sku: String,
    qty: u16,
}

#[derive(Serialize)]
enum Status {
    Shipped { carrier: String },
}

fn order() -> Order {
    Order {
        id: 9,
        customer: Customer {
            name: "Ada".to_string(),
        },
        lines: vec![Line {
            sku: "A-1".to_string(),
            qty: 2,
        }],
        notes: None,
        status: Status::Shipped {
            carrier: "DHL".to_string(),
        },
    }
}

#[test]
fn test_serde_bridge() {
    let map = to_flat_map(&order()).unwrap();
    assert_eq!(
        pairs(&map),
        vec![
            ("id", "9"),
            ("customer.name", "Ada"),
            ("lines[0].sku", "A-1"),
            ("lines[0].qty", "2"),
            ("status.Shipped.carrier", "DHL"),
        ]
    );

    let options = FlattenOptions::new().with_include_nulls(true);
    let map = to_flat_map_with_options(&order(), options).unwrap();
    assert_eq!(map.get("notes"), Some("<null>"));
}

#[test]
fn test_serde_struct_keys() {
    #[derive(Serialize, PartialEq, Eq, Hash)]
    struct Tile {
        x: i32,
    }

    let mut tiles = HashMap::new();
    tiles.insert(Tile { x: 1 }, "grass");
    let map = to_flat_map(&tiles).unwrap();
    assert_eq!(pairs(&map), vec![("Tile`0", "grass")]);
}

#[test]
fn test_output_serializes_and_displays() {
    let map = flatten(&Listing {
        Items: vec!["a"],
        Count: 1,
    })
    .unwrap();
    assert_eq!(
        serde_json::to_string(&map).unwrap(),
        r#"{"Items[0]":"a","Count":"1"}"#
    );
    assert_eq!(map.to_string(), "Items[0]: a\nCount: 1");
}
