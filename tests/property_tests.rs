//! Property-based tests over generated graphs.
//!
//! These cover the path and ordering guarantees that hold for any input,
//! complementing the example-driven integration tests.

use proptest::prelude::*;
use serde_flatpath::{
    flatten, flatten_with, flatten_with_options, to_flat_map, to_value, FlattenOptions, FnFilter,
    PathFilter,
};

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

proptest! {
    #[test]
    fn prop_vec_elements_are_indexed(items in prop::collection::vec(any::<i64>(), 0..32)) {
        let map = flatten(&items).unwrap();
        prop_assert_eq!(map.len(), items.len());
        for (i, (key, value)) in map.iter().enumerate() {
            prop_assert_eq!(key, &format!("[{}]", i));
            prop_assert_eq!(value, &items[i].to_string());
        }
    }

    #[test]
    fn prop_string_keys_are_used_verbatim(
        entries in prop::collection::btree_map(key_strategy(), any::<u32>(), 0..16)
    ) {
        let map = flatten(&entries).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        let expected: Vec<_> = entries.keys().cloned().collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_integers_keep_their_text(n in any::<i64>(), u in any::<u64>()) {
        let map = flatten(&(n, u)).unwrap();
        prop_assert_eq!(map.get("[0]").unwrap().parse::<i64>().unwrap(), n);
        prop_assert_eq!(map.get("[1]").unwrap().parse::<u64>().unwrap(), u);
    }

    #[test]
    fn prop_finite_floats_round_trip(x in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let map = flatten(&x).unwrap();
        prop_assert_eq!(map.get("").unwrap().parse::<f64>().unwrap(), x);
    }

    #[test]
    fn prop_nested_vec_key_count(
        grid in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..8), 1..8)
    ) {
        let map = flatten(&grid).unwrap();
        let total: usize = grid.iter().map(Vec::len).sum();
        prop_assert_eq!(map.len(), total);
        let last_row = grid.len() - 1;
        let last_col = grid[last_row].len() - 1;
        let last_key = format!("[{}][{}]", last_row, last_col);
        prop_assert_eq!(map.keys().last(), Some(&last_key));
    }

    #[test]
    fn prop_empty_rows_only_appear_with_sentinel(
        grid in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..4), 0..8)
    ) {
        let plain = flatten(&grid).unwrap();
        let options = FlattenOptions::new().with_include_empty_collections(true);
        let with_empty = flatten_with_options(&grid, options).unwrap();

        let empty_rows = grid.iter().filter(|row| row.is_empty()).count();
        let root_empty = usize::from(grid.is_empty());
        prop_assert_eq!(with_empty.len(), plain.len() + empty_rows + root_empty);
    }

    #[test]
    fn prop_filters_never_add_keys(
        entries in prop::collection::btree_map(key_strategy(), prop::collection::vec(any::<i16>(), 0..4), 0..8),
        excluded in key_strategy(),
    ) {
        let all = flatten(&entries).unwrap();

        let by_path = PathFilter::new().exclude(excluded.clone());
        let pruned = flatten_with(&entries, FlattenOptions::default(), Some(&by_path)).unwrap();
        prop_assert!(pruned.keys().all(|k| all.contains_key(k)));
        let excluded_prefix = format!("{}[", excluded);
        prop_assert!(!pruned.keys().any(|k| k == &excluded || k.starts_with(&excluded_prefix)));

        let odd = FnFilter::new().emit(|ctx, default| default && ctx.index.map_or(true, |i| i % 2 == 0));
        let thinned = flatten_with(&entries, FlattenOptions::default(), Some(&odd)).unwrap();
        prop_assert!(thinned.len() <= all.len());
        prop_assert!(thinned.keys().all(|k| all.contains_key(k)));
    }

    #[test]
    fn prop_serde_bridge_matches_value_tree(
        entries in prop::collection::btree_map(key_strategy(), prop::option::of(any::<i32>()), 0..8)
    ) {
        let direct = to_flat_map(&entries).unwrap();
        let via_value = flatten(&to_value(&entries).unwrap()).unwrap();
        prop_assert_eq!(&direct, &via_value);
        prop_assert_eq!(direct, flatten(&entries).unwrap());
    }

    #[test]
    fn prop_output_is_stable(items in prop::collection::vec(key_strategy(), 0..16)) {
        prop_assert_eq!(flatten(&items).unwrap(), flatten(&items).unwrap());
    }
}
