//! Runtime description of values.
//!
//! [`Inspect`] is how the flattener discovers the shape and members of a
//! value. Implementations return a [`Node`]: a scalar, a null, an ignored
//! value, or a view over a sequence, a map or an object.
//!
//! Most types get their implementation from this crate (primitives,
//! collections, smart pointers, `chrono`, `num-bigint`, [`Value`]) or from the
//! [`impl_inspect!`] family of macros. Hand-written implementations look like
//! this:
//!
//! ```rust
//! use serde_flatpath::{flatten, Inspect, Node, ObjectView};
//!
//! struct Temperature {
//!     celsius: f64,
//! }
//!
//! impl Inspect for Temperature {
//!     fn inspect(&self) -> Node<'_> {
//!         Node::Object(
//!             ObjectView::new(self)
//!                 .field("Celsius", &self.celsius)
//!                 .computed("Fahrenheit", self.celsius * 9.0 / 5.0 + 32.0),
//!         )
//!     }
//! }
//!
//! let map = flatten(&Temperature { celsius: 100.0 }).unwrap();
//! assert_eq!(map.get("Celsius"), Some("100"));
//! assert_eq!(map.get("Fahrenheit"), Some("212"));
//! ```
//!
//! [`Value`]: crate::Value
//! [`impl_inspect!`]: crate::impl_inspect

use crate::member::{Member, MemberKind, MemberValue};
use crate::scalar::Scalar;
use crate::tracker::Identity;
use std::any::Any;
use std::borrow::Cow;
use std::cell::Ref;

/// A value the flattener can walk.
pub trait Inspect {
    /// Describes this value.
    fn inspect(&self) -> Node<'_>;

    /// Name of the concrete type, used in node contexts and key tokens.
    ///
    /// Transparent wrappers such as `Box`, `Rc` and `Option` report the name
    /// of the value they wrap.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// This value as `dyn Any`, so that a converter registered for its
    /// concrete type can replace the node it describes.
    ///
    /// `None` for values that borrow data. Transparent wrappers forward to
    /// the value they wrap.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}

/// Description of a single value.
pub enum Node<'a> {
    /// Absence of a value.
    Null,
    /// A value that is never walked or written, such as a callback.
    Ignored,
    Scalar(Scalar<'a>),
    Sequence(SequenceView<'a>),
    Map(MapView<'a>),
    Object(ObjectView<'a>),
    /// A value reached through a runtime borrow; the guard is held while the
    /// value is walked.
    Borrowed(Ref<'a, dyn Inspect + 'a>),
}

impl<'a> Node<'a> {
    /// Shorthand for a borrowed string scalar.
    #[must_use]
    pub fn str(value: &'a str) -> Self {
        Node::Scalar(Scalar::Str(Cow::Borrowed(value)))
    }

    /// Shorthand for a scalar rendered through `Display`.
    #[must_use]
    pub fn display(value: &dyn std::fmt::Display) -> Self {
        Node::Scalar(Scalar::text(value.to_string()))
    }

    /// Identity of the container this node describes, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Node::Sequence(seq) => Some(seq.identity),
            Node::Map(map) => Some(map.identity),
            Node::Object(object) => Some(object.identity),
            _ => None,
        }
    }
}

/// Ordered elements of a sequence.
pub struct SequenceView<'a> {
    identity: Identity,
    items: Box<dyn Iterator<Item = &'a dyn Inspect> + 'a>,
}

impl<'a> SequenceView<'a> {
    /// A view over `items`, identified by `owner`.
    pub fn new<T, I>(owner: &'a T, items: I) -> Self
    where
        T: ?Sized,
        I: IntoIterator<Item = &'a dyn Inspect>,
        I::IntoIter: 'a,
    {
        SequenceView::with_identity(Identity::of(owner), items)
    }

    pub fn with_identity<I>(identity: Identity, items: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn Inspect>,
        I::IntoIter: 'a,
    {
        SequenceView {
            identity,
            items: Box::new(items.into_iter()),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Consumes the view, yielding its elements in enumeration order.
    pub fn into_items(self) -> Box<dyn Iterator<Item = &'a dyn Inspect> + 'a> {
        self.items
    }
}

/// Key/value entries of an associative map.
pub struct MapView<'a> {
    identity: Identity,
    entries: Box<dyn Iterator<Item = (&'a dyn Inspect, &'a dyn Inspect)> + 'a>,
}

impl<'a> MapView<'a> {
    /// A view over `entries`, identified by `owner`.
    pub fn new<T, I>(owner: &'a T, entries: I) -> Self
    where
        T: ?Sized,
        I: IntoIterator<Item = (&'a dyn Inspect, &'a dyn Inspect)>,
        I::IntoIter: 'a,
    {
        MapView::with_identity(Identity::of(owner), entries)
    }

    pub fn with_identity<I>(identity: Identity, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a dyn Inspect, &'a dyn Inspect)>,
        I::IntoIter: 'a,
    {
        MapView {
            identity,
            entries: Box::new(entries.into_iter()),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Consumes the view, yielding its entries in the map's own order.
    pub fn into_entries(self) -> Box<dyn Iterator<Item = (&'a dyn Inspect, &'a dyn Inspect)> + 'a> {
        self.entries
    }
}

/// Members of an object, in declaration order.
pub struct ObjectView<'a> {
    identity: Identity,
    any: Option<&'a dyn Any>,
    members: Vec<Member<'a>>,
}

impl<'a> ObjectView<'a> {
    /// A view of `value`. The value is also exposed as `dyn Any` so that
    /// converters registered for its type can apply.
    pub fn new<T: Any>(value: &'a T) -> Self {
        ObjectView {
            identity: Identity::of(value),
            any: Some(value),
            members: Vec::new(),
        }
    }

    /// A view of a value that borrows data and so cannot be `Any`.
    pub fn borrowed<T: ?Sized>(value: &'a T) -> Self {
        ObjectView {
            identity: Identity::of(value),
            any: None,
            members: Vec::new(),
        }
    }

    /// A view of `value` reported under `type_name`, for dynamic objects.
    pub fn named<T: ?Sized>(value: &'a T, type_name: &'static str) -> Self {
        ObjectView {
            identity: Identity::named(value, type_name),
            any: None,
            members: Vec::new(),
        }
    }

    /// Adds a public instance member.
    #[must_use]
    pub fn field(self, name: impl Into<Cow<'a, str>>, value: &'a dyn Inspect) -> Self {
        self.member(Member::new(name, MemberKind::PUBLIC, MemberValue::Borrowed(value)))
    }

    /// Adds a non-public instance member.
    #[must_use]
    pub fn private_field(self, name: impl Into<Cow<'a, str>>, value: &'a dyn Inspect) -> Self {
        self.member(Member::new(name, MemberKind::NON_PUBLIC, MemberValue::Borrowed(value)))
    }

    /// Adds a static member, visited only when statics are selected.
    #[must_use]
    pub fn static_field(self, name: impl Into<Cow<'a, str>>, value: &'a dyn Inspect) -> Self {
        self.member(Member::new(name, MemberKind::STATIC, MemberValue::Borrowed(value)))
    }

    /// Adds a public member whose value is computed when the view is built.
    #[must_use]
    pub fn computed<V: Inspect + 'a>(self, name: impl Into<Cow<'a, str>>, value: V) -> Self {
        self.member(Member::new(name, MemberKind::PUBLIC, MemberValue::Owned(Box::new(value))))
    }

    /// Adds a member that exists but cannot be read.
    #[must_use]
    pub fn write_only(self, name: impl Into<Cow<'a, str>>) -> Self {
        self.member(Member::new(name, MemberKind::PUBLIC, MemberValue::WriteOnly))
    }

    #[must_use]
    pub fn member(mut self, member: Member<'a>) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.identity.type_name()
    }

    #[must_use]
    pub fn as_any(&self) -> Option<&'a dyn Any> {
        self.any
    }

    #[must_use]
    pub fn members(&self) -> &[Member<'a>] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: i32,
        right: i32,
    }

    #[test]
    fn test_object_view_collects_members_in_order() {
        let pair = Pair { left: 1, right: 2 };
        let view = ObjectView::new(&pair)
            .field("left", &pair.left)
            .private_field("right", &pair.right)
            .write_only("sink");

        let names: Vec<_> = view.members().iter().map(|m| m.name.as_ref()).collect();
        assert_eq!(names, vec!["left", "right", "sink"]);
        assert_eq!(view.members()[1].kind, MemberKind::NON_PUBLIC);
        assert!(view.as_any().is_some());
        assert!(view.type_name().ends_with("Pair"));
    }

    #[test]
    fn test_named_view_reports_given_name() {
        let data = vec![1, 2];
        let view = ObjectView::named(&data, "Custom");
        assert_eq!(view.type_name(), "Custom");
        assert!(view.as_any().is_none());
    }

    #[test]
    fn test_node_identity_only_for_containers() {
        let data = vec![1_i32, 2];
        assert!(data.inspect().identity().is_some());
        assert!(Node::Null.identity().is_none());
        assert!(Node::str("x").identity().is_none());
    }
}
