//! The flattened output.
//!
//! [`FlatMap`] wraps an [`IndexMap`] so that entries keep the depth-first
//! order in which the traversal produced them.
//!
//! ## Examples
//!
//! ```rust
//! use serde_flatpath::FlatMap;
//!
//! let mut map = FlatMap::new();
//! map.insert("customer.name".to_string(), "Ada".to_string());
//! map.insert("customer.city".to_string(), "London".to_string());
//! map.insert("total".to_string(), "42".to_string());
//!
//! assert_eq!(&map["total"], "42");
//! assert_eq!(map.with_prefix("customer").count(), 2);
//! assert_eq!(map.to_string(), "customer.name: Ada\ncustomer.city: London\ntotal: 42");
//! ```

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

/// An ordered map from paths to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMap(IndexMap<String, String>);

impl FlatMap {
    #[must_use]
    pub fn new() -> Self {
        FlatMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        FlatMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts an entry, returning the previous value for `path`.
    ///
    /// An existing path keeps its original position.
    pub fn insert(&mut self, path: String, value: String) -> Option<String> {
        self.0.insert(path, value)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the paths, in traversal order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in traversal order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, String> {
        self.0.values()
    }

    /// Returns an iterator over the entries, in traversal order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Entries at `prefix` or beneath it.
    ///
    /// Matching respects segment boundaries: `items` matches `items`,
    /// `items.x` and `items[0]` but not `itemsCount`.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.0.iter().filter_map(move |(path, value)| {
            let under = match path.strip_prefix(prefix) {
                Some("") => true,
                Some(rest) => prefix.is_empty() || rest.starts_with('.') || rest.starts_with('['),
                None => false,
            };
            under.then_some((path.as_str(), value.as_str()))
        })
    }

    /// Consumes the map, returning the underlying [`IndexMap`].
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

impl Index<&str> for FlatMap {
    type Output = str;

    /// # Panics
    ///
    /// Panics if `path` is not in the map.
    fn index(&self, path: &str) -> &str {
        match self.0.get(path) {
            Some(value) => value,
            None => panic!("no entry at path `{}`", path),
        }
    }
}

impl fmt::Display for FlatMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {}", path, value)?;
        }
        Ok(())
    }
}

impl Serialize for FlatMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, value) in &self.0 {
            map.serialize_entry(path, value)?;
        }
        map.end()
    }
}

impl From<FlatMap> for HashMap<String, String> {
    fn from(map: FlatMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl From<IndexMap<String, String>> for FlatMap {
    fn from(map: IndexMap<String, String>) -> Self {
        FlatMap(map)
    }
}

impl IntoIterator for FlatMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlatMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for FlatMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        FlatMap(IndexMap::from_iter(iter))
    }
}
