//! Members of object nodes and the policy that selects them.
//!
//! An [`ObjectView`](crate::ObjectView) lists every member its type exposes,
//! in declaration order, tagged with a [`MemberKind`]. [`discover`] applies the
//! caller's [`MemberSelection`] and [`MemberOrder`] to that list; the result
//! depends only on the type and the policy, never on the member values.

use crate::inspect::Inspect;
use std::borrow::Cow;
use std::fmt;

/// Who may see a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    NonPublic,
}

/// Whether a member belongs to the instance or to the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Instance,
    Static,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MemberKind {
    pub visibility: Visibility,
    pub scope: Scope,
}

impl MemberKind {
    pub const PUBLIC: MemberKind = MemberKind {
        visibility: Visibility::Public,
        scope: Scope::Instance,
    };
    pub const NON_PUBLIC: MemberKind = MemberKind {
        visibility: Visibility::NonPublic,
        scope: Scope::Instance,
    };
    pub const STATIC: MemberKind = MemberKind {
        visibility: Visibility::Public,
        scope: Scope::Static,
    };
}

/// Which members of an object are visited.
///
/// The default visits public instance members only.
///
/// # Examples
///
/// ```rust
/// use serde_flatpath::{MemberKind, MemberSelection};
///
/// let default = MemberSelection::default();
/// assert!(default.selects(MemberKind::PUBLIC));
/// assert!(!default.selects(MemberKind::NON_PUBLIC));
///
/// let everything = MemberSelection::all();
/// assert!(everything.selects(MemberKind::STATIC));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemberSelection {
    pub public: bool,
    pub non_public: bool,
    pub instance: bool,
    pub statics: bool,
}

impl Default for MemberSelection {
    fn default() -> Self {
        MemberSelection {
            public: true,
            non_public: false,
            instance: true,
            statics: false,
        }
    }
}

impl MemberSelection {
    /// Public and non-public, instance and static.
    #[must_use]
    pub const fn all() -> Self {
        MemberSelection {
            public: true,
            non_public: true,
            instance: true,
            statics: true,
        }
    }

    #[must_use]
    pub fn with_non_public(mut self, yes: bool) -> Self {
        self.non_public = yes;
        self
    }

    #[must_use]
    pub fn with_statics(mut self, yes: bool) -> Self {
        self.statics = yes;
        self
    }

    #[must_use]
    pub fn with_public(mut self, yes: bool) -> Self {
        self.public = yes;
        self
    }

    #[must_use]
    pub fn with_instance(mut self, yes: bool) -> Self {
        self.instance = yes;
        self
    }

    #[must_use]
    pub const fn selects(&self, kind: MemberKind) -> bool {
        let visible = match kind.visibility {
            Visibility::Public => self.public,
            Visibility::NonPublic => self.non_public,
        };
        let scoped = match kind.scope {
            Scope::Instance => self.instance,
            Scope::Static => self.statics,
        };
        visible && scoped
    }
}

/// Order in which selected members are walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MemberOrder {
    /// The order the type lists its members in.
    #[default]
    Declaration,
    /// Sorted by member name; ties keep declaration order.
    Alphabetical,
}

/// How a member's value is reached.
pub enum MemberValue<'a> {
    /// A reference into the object.
    Borrowed(&'a dyn Inspect),
    /// A value computed on access, such as a derived property.
    Owned(Box<dyn Inspect + 'a>),
    /// The member exists but cannot be read; it is never visited.
    WriteOnly,
}

impl<'a> MemberValue<'a> {
    /// Returns the readable value, or `None` for write-only members.
    #[must_use]
    pub fn get(&self) -> Option<&dyn Inspect> {
        match self {
            MemberValue::Borrowed(value) => Some(*value),
            MemberValue::Owned(value) => Some(value.as_ref()),
            MemberValue::WriteOnly => None,
        }
    }
}

impl fmt::Debug for MemberValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Borrowed(_) => f.write_str("Borrowed(..)"),
            MemberValue::Owned(_) => f.write_str("Owned(..)"),
            MemberValue::WriteOnly => f.write_str("WriteOnly"),
        }
    }
}

/// A named member of an object node.
#[derive(Debug)]
pub struct Member<'a> {
    pub name: Cow<'a, str>,
    pub kind: MemberKind,
    pub value: MemberValue<'a>,
}

impl<'a> Member<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, kind: MemberKind, value: MemberValue<'a>) -> Self {
        Member {
            name: name.into(),
            kind,
            value,
        }
    }
}

/// Selects and orders the members to walk.
///
/// Write-only members are kept here so callers can report them; the
/// traversal skips them.
#[must_use]
pub fn discover<'m, 'a>(
    members: &'m [Member<'a>],
    selection: MemberSelection,
    order: MemberOrder,
) -> Vec<&'m Member<'a>> {
    let mut selected: Vec<&Member<'a>> = members
        .iter()
        .filter(|member| selection.selects(member.kind))
        .collect();
    if order == MemberOrder::Alphabetical {
        // stable sort, so duplicate names keep declaration order
        selected.sort_by(|a, b| a.name.cmp(&b.name));
    }
    selected
}
