//! Configuration options for flattening.
//!
//! ## Examples
//!
//! ```rust
//! use serde_flatpath::{flatten_with_options, FlattenOptions};
//!
//! let empty: Vec<i32> = Vec::new();
//! let options = FlattenOptions::new()
//!     .with_include_empty_collections(true)
//!     .with_empty_sentinel("[]");
//! let map = flatten_with_options(&empty, options).unwrap();
//! assert_eq!(map.get(""), Some("[]"));
//! ```

use crate::member::{MemberOrder, MemberSelection};
use crate::scalar::Converters;
use std::any::Any;

/// Text written for a null leaf when nulls are included.
pub const NULL_SENTINEL: &str = "<null>";

/// Text written for an empty sequence or map when empty collections are
/// included.
pub const EMPTY_SENTINEL: &str = "<empty>";

/// Default bound on nested containers.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for one flattening call.
///
/// Options are read-only during a call; a single value can be cloned and
/// shared between threads.
///
/// # Examples
///
/// ```rust
/// use serde_flatpath::{FlattenOptions, MemberOrder, MemberSelection};
///
/// let options = FlattenOptions::new()
///     .with_include_nulls(true)
///     .with_member_selection(MemberSelection::all())
///     .with_member_order(MemberOrder::Alphabetical)
///     .with_max_depth(16);
/// assert!(options.include_nulls);
/// assert_eq!(options.null_sentinel, "<null>");
/// ```
#[derive(Clone, Debug)]
pub struct FlattenOptions {
    /// Write null leaves as [`null_sentinel`](Self::null_sentinel).
    pub include_nulls: bool,
    /// Write empty sequences and maps as [`empty_sentinel`](Self::empty_sentinel).
    pub include_empty_collections: bool,
    pub member_selection: MemberSelection,
    pub member_order: MemberOrder,
    /// Containers nested deeper than this abort the call.
    pub max_depth: usize,
    pub null_sentinel: String,
    pub empty_sentinel: String,
    pub converters: Converters,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        FlattenOptions {
            include_nulls: false,
            include_empty_collections: false,
            member_selection: MemberSelection::default(),
            member_order: MemberOrder::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            null_sentinel: NULL_SENTINEL.to_string(),
            empty_sentinel: EMPTY_SENTINEL.to_string(),
            converters: Converters::new(),
        }
    }
}

impl FlattenOptions {
    /// Creates default options: nulls and empty collections omitted, public
    /// instance members in declaration order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_include_nulls(mut self, include: bool) -> Self {
        self.include_nulls = include;
        self
    }

    #[must_use]
    pub fn with_include_empty_collections(mut self, include: bool) -> Self {
        self.include_empty_collections = include;
        self
    }

    #[must_use]
    pub fn with_member_selection(mut self, selection: MemberSelection) -> Self {
        self.member_selection = selection;
        self
    }

    #[must_use]
    pub fn with_member_order(mut self, order: MemberOrder) -> Self {
        self.member_order = order;
        self
    }

    /// Sets the maximum number of nested containers.
    ///
    /// The root container counts as one level, so `with_max_depth(0)` rejects
    /// any container at all.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_null_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.null_sentinel = sentinel.into();
        self
    }

    #[must_use]
    pub fn with_empty_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.empty_sentinel = sentinel.into();
        self
    }

    /// Writes values of type `T` with `convert` instead of walking them.
    #[must_use]
    pub fn with_converter<T, F>(mut self, convert: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.converters.register(convert);
        self
    }

    #[must_use]
    pub fn with_converters(mut self, converters: Converters) -> Self {
        self.converters = converters;
        self
    }
}
