//! # serde_flatpath
//!
//! Flattens arbitrary, possibly self-referential object graphs into an
//! ordered map from paths to strings.
//!
//! ```text
//! customer.name        : Ada
//! customer.tags[0]     : vip
//! lines[1].sku         : B-2
//! routes.Point`0       : north
//! ```
//!
//! ## Key Features
//!
//! - **Paths**: members join with `.`, sequence elements use `[i]`, map
//!   entries use the key's text or a ``TypeName`n`` token for structured keys
//! - **Cycle detection**: re-entering a container that is still being walked
//!   fails with [`Error::Cycle`] instead of recursing forever
//! - **Filters**: prune subtrees, decide which leaves are written and rewrite
//!   their text through the [`Filter`] hooks
//! - **Serde bridge**: any `T: Serialize` can be flattened through [`Value`]
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_flatpath::{flatten, impl_inspect};
//!
//! struct Address { city: String }
//! impl_inspect!(Address { city });
//!
//! struct Customer { name: String, address: Address, tags: Vec<&'static str> }
//! impl_inspect!(Customer { name, address, tags });
//!
//! let customer = Customer {
//!     name: "Ada".into(),
//!     address: Address { city: "London".into() },
//!     tags: vec!["vip", "beta"],
//! };
//!
//! let map = flatten(&customer).unwrap();
//! assert_eq!(map.get("address.city"), Some("London"));
//! assert_eq!(map.get("tags[1]"), Some("beta"));
//! ```
//!
//! ### Shared and cyclic graphs
//!
//! A value reached twice through different branches (a diamond) is written
//! once per branch. A value reached again from inside itself is a cycle:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use serde_flatpath::{flatten, impl_inspect, Error};
//!
//! struct Node { id: u32, next: RefCell<Option<Rc<Node>>> }
//! impl_inspect!(Node { id, next });
//!
//! let node = Rc::new(Node { id: 1, next: RefCell::new(None) });
//! *node.next.borrow_mut() = Some(node.clone());
//!
//! assert!(matches!(flatten(&node), Err(Error::Cycle(_))));
//! # node.next.borrow_mut().take();
//! ```
//!
//! ### Serde types
//!
//! ```rust
//! use serde::Serialize;
//! use serde_flatpath::to_flat_map;
//!
//! #[derive(Serialize)]
//! struct Line { sku: String, qty: u32 }
//!
//! let lines = vec![Line { sku: "A-1".into(), qty: 2 }];
//! let map = to_flat_map(&lines).unwrap();
//! assert_eq!(map.get("[0].qty"), Some("2"));
//! ```
//!
//! ## Logging
//!
//! Calls emit `tracing` events: `debug` when a call starts, finishes or
//! aborts, and `trace` for pruned nodes, ignored values and skipped members.
//! No subscriber is installed by this crate.

#[macro_use]
mod macros;

pub mod context;
pub mod engine;
pub mod error;
pub mod filter;
mod impls;
pub mod inspect;
pub mod map;
pub mod member;
pub mod options;
pub mod path;
pub mod scalar;
pub mod ser;
pub mod shape;
pub mod tracker;
pub mod value;

pub use context::{NodeContext, ParentFrame};
pub use engine::Flattener;
pub use error::{CycleError, Error, FilterError, Result};
pub use filter::{Filter, FilterChain, FnFilter, NoFilter, PathFilter};
pub use inspect::{Inspect, MapView, Node, ObjectView, SequenceView};
pub use map::FlatMap;
pub use member::{Member, MemberKind, MemberOrder, MemberSelection, MemberValue, Scope, Visibility};
pub use options::{FlattenOptions, EMPTY_SENTINEL, NULL_SENTINEL};
pub use scalar::{Converters, Scalar};
pub use ser::{to_value, ValueSerializer};
pub use shape::Shape;
pub use value::{Number, Value};

use serde::Serialize;

/// Flattens `root` with default options.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use serde_flatpath::flatten;
///
/// let scores = BTreeMap::from([("alice", 3), ("bob", 5)]);
/// let map = flatten(&scores).unwrap();
/// assert_eq!(map.to_string(), "alice: 3\nbob: 5");
/// ```
///
/// # Errors
///
/// Returns [`Error::Cycle`] if the graph loops back on itself and
/// [`Error::DepthLimitExceeded`] if it nests deeper than the default limit.
pub fn flatten<T>(root: &T) -> Result<FlatMap>
where
    T: ?Sized + Inspect,
{
    flatten_with(root, FlattenOptions::default(), None)
}

/// Flattens `root` with the given options.
///
/// # Examples
///
/// ```rust
/// use serde_flatpath::{flatten_with_options, FlattenOptions};
///
/// let values = vec![Some(1), None];
/// let options = FlattenOptions::new().with_include_nulls(true);
/// let map = flatten_with_options(&values, options).unwrap();
/// assert_eq!(map.get("[1]"), Some("<null>"));
/// ```
///
/// # Errors
///
/// See [`flatten`].
pub fn flatten_with_options<T>(root: &T, options: FlattenOptions) -> Result<FlatMap>
where
    T: ?Sized + Inspect,
{
    flatten_with(root, options, None)
}

/// Flattens `root` with the given options and an optional filter.
///
/// # Examples
///
/// ```rust
/// use serde_flatpath::{flatten_with, impl_inspect, FlattenOptions, FnFilter};
///
/// #[allow(non_snake_case)]
/// struct Flags { Prop1: bool, Prop2: bool }
/// impl_inspect!(Flags { Prop1, Prop2 });
///
/// let filter = FnFilter::new()
///     .descend(|ctx| ctx.path != "Prop2")
///     .format(|ctx, raw| if ctx.path == "Prop1" { "Included".into() } else { raw });
///
/// let map = flatten_with(&Flags { Prop1: true, Prop2: false }, FlattenOptions::default(), Some(&filter)).unwrap();
/// assert_eq!(map.get("Prop1"), Some("Included"));
/// assert!(!map.contains_key("Prop2"));
/// ```
///
/// # Errors
///
/// See [`flatten`]; additionally [`Error::Filter`] if a filter hook fails.
pub fn flatten_with<T>(root: &T, options: FlattenOptions, filter: Option<&dyn Filter>) -> Result<FlatMap>
where
    T: ?Sized + Inspect,
{
    let flattener = Flattener::new(options);
    match filter {
        Some(filter) => flattener.with_filter(filter).flatten(&root),
        None => flattener.flatten(&root),
    }
}

/// Flattens any `T: Serialize` with default options.
///
/// # Errors
///
/// Returns an error if `T`'s `Serialize` impl fails or the flattened tree
/// nests deeper than the default limit.
pub fn to_flat_map<T>(value: &T) -> Result<FlatMap>
where
    T: ?Sized + Serialize,
{
    to_flat_map_with(value, FlattenOptions::default(), None)
}

/// Flattens any `T: Serialize` with the given options.
///
/// # Errors
///
/// See [`to_flat_map`].
pub fn to_flat_map_with_options<T>(value: &T, options: FlattenOptions) -> Result<FlatMap>
where
    T: ?Sized + Serialize,
{
    to_flat_map_with(value, options, None)
}

/// Flattens any `T: Serialize` with the given options and an optional filter.
///
/// The value is first converted to a [`Value`] tree, so converters registered
/// in `options` only apply to types that reach the flattener as themselves,
/// not to serde output.
///
/// # Errors
///
/// See [`to_flat_map`]; additionally [`Error::Filter`] if a filter hook fails.
pub fn to_flat_map_with<T>(
    value: &T,
    options: FlattenOptions,
    filter: Option<&dyn Filter>,
) -> Result<FlatMap>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    flatten_with(&value, options, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_flatten_str_root() {
        let map = flatten("hello").unwrap();
        assert_eq!(map.get(""), Some("hello"));
    }

    #[test]
    fn test_to_flat_map_struct_keyed_map() {
        #[derive(Serialize, PartialEq, Eq, Hash)]
        struct Point {
            x: i32,
        }

        let mut routes = HashMap::new();
        routes.insert(Point { x: 1 }, "north");
        let map = to_flat_map(&routes).unwrap();
        assert_eq!(map.get("Point`0"), Some("north"));
    }

    #[test]
    fn test_filter_passed_through() {
        let filter = PathFilter::new().exclude("[1]");
        let map = flatten_with(&vec![1, 2, 3], FlattenOptions::default(), Some(&filter)).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["[0]", "[2]"]);
    }
}
