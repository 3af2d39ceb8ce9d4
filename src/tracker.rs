//! Cycle detection for the traversal.
//!
//! The tracker holds the identities of every container currently being
//! walked, outermost first. Entering a container that is already on the
//! stack means the graph loops back on itself.
//!
//! An [`Identity`] is the address of the value together with its concrete
//! type name. The type name matters: a struct and its first field share an
//! address, and must not be mistaken for each other.
//!
//! ```rust
//! use serde_flatpath::tracker::{Identity, ReferenceTracker};
//!
//! struct Node { id: u32 }
//! let node = Node { id: 1 };
//!
//! let mut tracker = ReferenceTracker::new();
//! tracker.enter(Identity::of(&node), "").unwrap();
//! assert!(tracker.enter(Identity::of(&node), "next").is_err());
//! tracker.leave();
//! assert!(tracker.is_empty());
//! ```

use crate::error::CycleError;
use crate::path::friendly_type_name;
use std::collections::HashSet;

/// Reference identity of a value during one traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    addr: usize,
    type_name: &'static str,
}

impl Identity {
    /// Identity of `value`, named after its concrete type.
    #[must_use]
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Identity::named(value, std::any::type_name::<T>())
    }

    /// Identity of `value` with an explicit type name.
    #[must_use]
    pub fn named<T: ?Sized>(value: &T, type_name: &'static str) -> Self {
        Identity {
            addr: value as *const T as *const () as usize,
            type_name,
        }
    }

    #[must_use]
    pub fn addr(&self) -> usize {
        self.addr
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Stack of containers on the current traversal path.
#[derive(Debug, Default)]
pub struct ReferenceTracker {
    stack: Vec<Identity>,
    active: HashSet<Identity>,
}

impl ReferenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `identity`, failing if it is already on the stack.
    ///
    /// `path` is the path of the value being entered; it is reported in the
    /// error so callers can see where the loop closes.
    pub fn enter(&mut self, identity: Identity, path: &str) -> Result<(), CycleError> {
        if !self.active.insert(identity) {
            return Err(CycleError {
                path: path.to_string(),
                type_name: friendly_type_name(identity.type_name),
            });
        }
        self.stack.push(identity);
        Ok(())
    }

    /// Pops the innermost container.
    pub fn leave(&mut self) {
        if let Some(identity) = self.stack.pop() {
            self.active.remove(&identity);
        }
    }

    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.active.contains(identity)
    }

    /// Number of containers on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
