//! Path composition.
//!
//! Paths are the keys of a [`FlatMap`](crate::FlatMap) and the `path` field of
//! every [`NodeContext`](crate::NodeContext):
//!
//! - members join with a dot: `customer.address.city`
//! - sequence elements use brackets: `items[2]`
//! - map entries join with a dot and a key token: `scores.alice`
//!
//! A key that is not itself a scalar has no natural text form, so it is
//! named after its type plus an occurrence counter within the map:
//! ``routes.Point`0``, ``routes.Point`1``.
//!
//! ```rust
//! use serde_flatpath::path::{append, Segment};
//!
//! let items = append("order", Segment::Member("items"));
//! let first = append(&items, Segment::Index(0));
//! assert_eq!(append(&first, Segment::Member("sku")), "order.items[0].sku");
//! assert_eq!(append("", Segment::Member("id")), "id");
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// One step from a parent node to a child node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A member of an object.
    Member(&'a str),
    /// A position in a sequence.
    Index(usize),
    /// A map entry, identified by its key token.
    Key(&'a str),
}

/// Composes `parent` and `segment` into a child path.
#[must_use]
pub fn append(parent: &str, segment: Segment<'_>) -> String {
    match segment {
        Segment::Member(name) | Segment::Key(name) => {
            if parent.is_empty() {
                name.to_string()
            } else {
                let mut path = String::with_capacity(parent.len() + name.len() + 1);
                path.push_str(parent);
                path.push('.');
                path.push_str(name);
                path
            }
        }
        Segment::Index(index) => {
            let mut path = String::with_capacity(parent.len() + 8);
            path.push_str(parent);
            // Writing into a String cannot fail
            let _ = write!(path, "[{}]", index);
            path
        }
    }
}

/// Hands out key tokens for the entries of a single map.
///
/// Create one per map iteration so that counters restart at zero. Tokens
/// are unique within the map: a key whose text was already issued falls
/// back to the ``TypeName`n`` form.
#[derive(Debug, Default)]
pub struct KeyTokens {
    seen: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl KeyTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for a key with a text form, or ``TypeName`n`` when an earlier
    /// key of this map already took `text`.
    pub fn text(&mut self, text: String, type_name: &str) -> String {
        if self.issued.insert(text.clone()) {
            text
        } else {
            self.complex(type_name)
        }
    }

    /// Token for a key without a scalar form: ``TypeName`n``.
    ///
    /// `n` counts earlier keys of the same type name in this map, not all
    /// earlier keys, so in a map with mixed key types the counter is not the
    /// entry's position. Counters skip values whose token is already taken.
    pub fn complex(&mut self, type_name: &str) -> String {
        let counter = self.seen.entry(type_name.to_string()).or_insert(0);
        loop {
            let token = format!("{}`{}", type_name, counter);
            *counter += 1;
            if self.issued.insert(token.clone()) {
                return token;
            }
        }
    }
}

/// Strips module paths from a `std::any::type_name` string.
///
/// ```rust
/// use serde_flatpath::path::friendly_type_name;
///
/// assert_eq!(
///     friendly_type_name("alloc::vec::Vec<alloc::string::String>"),
///     "Vec<String>"
/// );
/// assert_eq!(friendly_type_name("&str"), "&str");
/// ```
#[must_use]
pub fn friendly_type_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut segment_start = 0;
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.truncate(segment_start);
            }
            c if c.is_alphanumeric() || c == '_' => out.push(c),
            c => {
                out.push(c);
                segment_start = out.len();
            }
        }
    }
    out
}
