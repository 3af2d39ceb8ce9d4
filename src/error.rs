//! Error types for graph flattening.
//!
//! Flattening is all-or-nothing: the first error aborts the call and no
//! partial output is returned.
//!
//! ## Error Categories
//!
//! - **Cycles**: a container was reached again while it was still being walked
//! - **Filter failures**: a user hook returned an error
//! - **Depth limit**: the graph nests deeper than [`FlattenOptions::max_depth`]
//! - **serde bridge**: values serde could not express as a [`Value`]
//!
//! Members that cannot be read (for example a `RefCell` that is mutably
//! borrowed elsewhere) are skipped and are not errors.
//!
//! ## Examples
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use serde_flatpath::{flatten, impl_inspect, Error};
//!
//! struct Link {
//!     next: RefCell<Option<Rc<Link>>>,
//! }
//! impl_inspect!(Link { next });
//!
//! let a = Rc::new(Link { next: RefCell::new(None) });
//! let b = Rc::new(Link { next: RefCell::new(Some(a.clone())) });
//! *a.next.borrow_mut() = Some(b.clone());
//!
//! match flatten(&a) {
//!     Err(Error::Cycle(cycle)) => assert_eq!(cycle.path, "next.next"),
//!     other => panic!("expected a cycle, got {:?}", other),
//! }
//! # *a.next.borrow_mut() = None;
//! ```
//!
//! [`FlattenOptions::max_depth`]: crate::FlattenOptions::max_depth
//! [`Value`]: crate::Value

use std::fmt;
use thiserror::Error;

/// Error type returned by user filter hooks.
pub type FilterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A container was re-entered while it was still on the ancestor stack.
///
/// A flat path map cannot represent an infinite structure, so cycles are
/// always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cycle detected at `{path}`: {type_name} is already being flattened")]
pub struct CycleError {
    /// Path at which the revisit happened.
    pub path: String,
    /// Friendly type name of the re-entered value.
    pub type_name: String,
}

/// Represents all possible errors that can occur while flattening a graph.
#[derive(Debug, Error)]
pub enum Error {
    /// Self-reference in the graph
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A filter hook failed
    #[error("filter failed at `{path}`: {source}")]
    Filter {
        path: String,
        #[source]
        source: FilterError,
    },

    /// The graph nests deeper than the configured limit
    #[error("maximum depth of {max_depth} exceeded at `{path}`")]
    DepthLimitExceeded { path: String, max_depth: usize },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a cycle error for the value at `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_flatpath::Error;
    ///
    /// let err = Error::cycle("next.next", "Link");
    /// assert!(err.to_string().contains("next.next"));
    /// ```
    pub fn cycle(path: &str, type_name: &str) -> Self {
        Error::Cycle(CycleError {
            path: path.to_string(),
            type_name: type_name.to_string(),
        })
    }

    /// Wraps an error raised by a filter hook.
    pub fn filter(path: &str, source: FilterError) -> Self {
        Error::Filter {
            path: path.to_string(),
            source,
        }
    }

    /// Creates a depth limit error.
    pub fn depth_limit(path: &str, max_depth: usize) -> Self {
        Error::DepthLimitExceeded {
            path: path.to_string(),
            max_depth,
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_flatpath::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the path at which the error occurred, if it is tied to one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Cycle(cycle) => Some(&cycle.path),
            Error::Filter { path, .. } | Error::DepthLimitExceeded { path, .. } => Some(path),
            Error::Custom(_) => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
