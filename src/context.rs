//! What filter hooks see of the node being visited.

use crate::inspect::Inspect;
use crate::shape::Shape;

/// Snapshot of an ancestor container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentFrame {
    /// Friendly type name of the ancestor.
    pub type_name: String,
    /// Member name under which the ancestor was reached.
    pub name: Option<String>,
    /// Sequence position at which the ancestor was reached.
    pub index: Option<usize>,
}

/// Read-only view of the node being visited, passed to every
/// [`Filter`](crate::Filter) hook.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    /// Friendly type name of the value.
    pub type_name: &'a str,
    /// Path of the node; the output key if it is written.
    pub path: &'a str,
    /// Member name; `None` for the root, sequence elements and map entries.
    pub member_name: Option<&'a str>,
    /// Position within the parent sequence.
    pub index: Option<usize>,
    pub shape: Shape,
    pub value: &'a dyn Inspect,
    /// Ancestors, outermost first, closest last.
    pub parents: &'a [ParentFrame],
}

impl<'a> NodeContext<'a> {
    /// Returns `true` for the root node.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Number of containers above this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// The closest ancestor.
    #[must_use]
    pub fn parent(&self) -> Option<&'a ParentFrame> {
        self.parents.last()
    }

    /// Returns `true` if any ancestor has the given friendly type name.
    #[must_use]
    pub fn has_ancestor_type(&self, type_name: &str) -> bool {
        self.parents.iter().any(|frame| frame.type_name == type_name)
    }
}

impl std::fmt::Debug for NodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContext")
            .field("type_name", &self.type_name)
            .field("path", &self.path)
            .field("member_name", &self.member_name)
            .field("index", &self.index)
            .field("shape", &self.shape)
            .field("parents", &self.parents)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestry_helpers() {
        let parents = vec![
            ParentFrame {
                type_name: "Order".to_string(),
                name: None,
                index: None,
            },
            ParentFrame {
                type_name: "Vec<Item>".to_string(),
                name: Some("items".to_string()),
                index: None,
            },
        ];
        let ctx = NodeContext {
            type_name: "Item",
            path: "items[0]",
            member_name: None,
            index: Some(0),
            shape: Shape::Object,
            value: &(),
            parents: &parents,
        };

        assert!(!ctx.is_root());
        assert_eq!(ctx.depth(), 2);
        assert_eq!(ctx.parent().and_then(|p| p.name.as_deref()), Some("items"));
        assert!(ctx.has_ancestor_type("Order"));
        assert!(!ctx.has_ancestor_type("Customer"));
        assert!(format!("{:?}", ctx).contains("items[0]"));
    }
}
