//! Value classification.
//!
//! Every node the flattener reaches falls into exactly one [`Shape`], which
//! decides whether it is written, skipped, or walked further.

use crate::inspect::Node;
use crate::scalar::Converters;
use std::any::Any;
use std::fmt;

/// Traversal category of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Null,
    Scalar,
    Sequence,
    AssociativeMap,
    Object,
    /// Never walked or written, even when nulls are included.
    Ignored,
}

impl Shape {
    /// Classifies a resolved node.
    ///
    /// Checked in priority order: null, ignored, map, sequence, scalar, then
    /// object. An object whose concrete type has a converter registered in
    /// `converters` is a scalar.
    ///
    /// Converters for values that are not objects are looked up by the
    /// caller through [`Inspect::as_any`](crate::Inspect::as_any).
    ///
    /// [`Node::Borrowed`] must be resolved by the caller; on its own it is
    /// classified as [`Shape::Ignored`].
    #[must_use]
    pub fn classify(node: &Node<'_>, converters: &Converters) -> Shape {
        match node {
            Node::Null => Shape::Null,
            Node::Ignored | Node::Borrowed(_) => Shape::Ignored,
            Node::Map(_) => Shape::AssociativeMap,
            Node::Sequence(_) => Shape::Sequence,
            Node::Scalar(_) => Shape::Scalar,
            Node::Object(object) => match object.as_any() {
                Some(any) if converters.contains(Any::type_id(any)) => Shape::Scalar,
                _ => Shape::Object,
            },
        }
    }

    /// Returns `true` for shapes whose children are walked.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Shape::Sequence | Shape::AssociativeMap | Shape::Object)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Null => "null",
            Shape::Scalar => "scalar",
            Shape::Sequence => "sequence",
            Shape::AssociativeMap => "map",
            Shape::Object => "object",
            Shape::Ignored => "ignored",
        };
        f.write_str(name)
    }
}
