/// Implements [`Inspect`](crate::Inspect) for a struct by listing its members.
///
/// Members are listed in declaration order. Plain entries are public
/// instance members; `field as "Name"` renames one in the output. A
/// `private:` section lists non-public members and a `static:` section lists
/// type-level values as `NAME => expr`. Sections are separated by `;`.
///
/// The type must be `'static`, so converters registered for it can apply.
///
/// ```rust
/// use serde_flatpath::{flatten, flatten_with_options, impl_inspect, FlattenOptions, MemberSelection};
///
/// struct Account {
///     id: u64,
///     owner: String,
///     balance_cents: i64,
///     pin: u16,
/// }
///
/// impl Account {
///     const KIND: &'static str = "checking";
/// }
///
/// impl_inspect!(Account {
///     id, owner, balance_cents as "Balance";
///     private: pin;
///     static: KIND => Account::KIND
/// });
///
/// let account = Account { id: 7, owner: "Ada".into(), balance_cents: 1250, pin: 1234 };
///
/// let public = flatten(&account).unwrap();
/// assert_eq!(public.keys().collect::<Vec<_>>(), vec!["id", "owner", "Balance"]);
///
/// let options = FlattenOptions::new().with_member_selection(MemberSelection::all());
/// let all = flatten_with_options(&account, options).unwrap();
/// assert_eq!(all.get("pin"), Some("1234"));
/// assert_eq!(all.get("KIND"), Some("checking"));
/// ```
#[macro_export]
macro_rules! impl_inspect {
    ($ty:ty { $($members:tt)* }) => {
        impl $crate::Inspect for $ty {
            fn inspect(&self) -> $crate::Node<'_> {
                $crate::__inspect_members!(
                    self, $crate::ObjectView::new(self); public; $($members)*
                )
            }

            fn as_any(&self) -> ::std::option::Option<&dyn ::std::any::Any> {
                ::std::option::Option::Some(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __inspect_members {
    ($this:ident, $view:expr; $kind:ident;) => {
        $crate::Node::Object($view)
    };
    ($this:ident, $view:expr; $kind:ident; , $($rest:tt)*) => {
        $crate::__inspect_members!($this, $view; $kind; $($rest)*)
    };
    ($this:ident, $view:expr; $kind:ident; ; $($rest:tt)*) => {
        $crate::__inspect_members!($this, $view; $kind; $($rest)*)
    };
    ($this:ident, $view:expr; $kind:ident; private: $($rest:tt)*) => {
        $crate::__inspect_members!($this, $view; private; $($rest)*)
    };
    ($this:ident, $view:expr; $kind:ident; static: $($rest:tt)*) => {
        $crate::__inspect_members!($this, $view; statics; $($rest)*)
    };
    ($this:ident, $view:expr; statics; $name:ident => $value:expr) => {
        $crate::__inspect_members!($this, $crate::__inspect_static!($view, $name, $value); statics;)
    };
    ($this:ident, $view:expr; statics; $name:ident => $value:expr, $($rest:tt)*) => {
        $crate::__inspect_members!($this, $crate::__inspect_static!($view, $name, $value); statics; $($rest)*)
    };
    ($this:ident, $view:expr; statics; $name:ident => $value:expr; $($rest:tt)*) => {
        $crate::__inspect_members!($this, $crate::__inspect_static!($view, $name, $value); statics; ; $($rest)*)
    };
    ($this:ident, $view:expr; $kind:ident; $field:tt as $alias:literal $($rest:tt)*) => {
        $crate::__inspect_members!(
            $this,
            $crate::__inspect_field!($kind, $view, $alias, &$this.$field);
            $kind;
            $($rest)*
        )
    };
    ($this:ident, $view:expr; $kind:ident; $field:tt $($rest:tt)*) => {
        $crate::__inspect_members!(
            $this,
            $crate::__inspect_field!($kind, $view, stringify!($field), &$this.$field);
            $kind;
            $($rest)*
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __inspect_field {
    (public, $view:expr, $name:expr, $value:expr) => {
        $view.field($name, $value)
    };
    (private, $view:expr, $name:expr, $value:expr) => {
        $view.private_field($name, $value)
    };
    (statics, $view:expr, $name:expr, $value:expr) => {
        $view.static_field($name, $value)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __inspect_static {
    ($view:expr, $name:ident, $value:expr) => {
        $view.member($crate::Member::new(
            stringify!($name),
            $crate::MemberKind::STATIC,
            $crate::MemberValue::Owned(::std::boxed::Box::new($value)),
        ))
    };
}

/// Implements [`Inspect`](crate::Inspect) as a scalar written through the
/// type's `Display` impl.
///
/// ```rust
/// use std::fmt;
/// use serde_flatpath::{flatten, impl_inspect, impl_inspect_display};
///
/// struct Version(u32, u32);
/// impl fmt::Display for Version {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "v{}.{}", self.0, self.1)
///     }
/// }
/// impl_inspect_display!(Version);
///
/// struct Release { version: Version }
/// impl_inspect!(Release { version });
///
/// let map = flatten(&Release { version: Version(1, 4) }).unwrap();
/// assert_eq!(map.get("version"), Some("v1.4"));
/// ```
#[macro_export]
macro_rules! impl_inspect_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Inspect for $ty {
                fn inspect(&self) -> $crate::Node<'_> {
                    $crate::Node::display(self)
                }

                fn as_any(&self) -> ::std::option::Option<&dyn ::std::any::Any> {
                    ::std::option::Option::Some(self)
                }
            }
        )+
    };
}

/// Implements [`Inspect`](crate::Inspect) for types that are never walked
/// or written, such as handles and callbacks.
#[macro_export]
macro_rules! impl_inspect_ignored {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Inspect for $ty {
                fn inspect(&self) -> $crate::Node<'_> {
                    $crate::Node::Ignored
                }
            }
        )+
    };
}

/// Builds a [`Value`](crate::Value) with JSON-like syntax.
///
/// `{ "key": value }` builds a map with string keys; `Name { "field": value }`
/// builds an object reported as type `Name`. Any other expression goes
/// through [`to_value`](crate::to_value).
///
/// ```rust
/// use serde_flatpath::{flatten, value};
///
/// let order = value!(Order {
///     "id": 42,
///     "lines": [ Line { "sku": "A-1" }, Line { "sku": "B-2" } ],
///     "tags": { "rush": true }
/// });
///
/// let map = flatten(&order).unwrap();
/// assert_eq!(map.get("lines[1].sku"), Some("B-2"));
/// assert_eq!(map.get("tags.rush"), Some("true"));
/// ```
#[macro_export]
macro_rules! value {
    (@array [$($done:tt)*]) => {
        vec![$($done)*]
    };
    (@array [$($done:tt)*] , $($rest:tt)*) => {
        $crate::value!(@array [$($done)*] $($rest)*)
    };
    (@array [$($done:tt)*] $name:ident { $($body:tt)* } $($rest:tt)*) => {
        $crate::value!(@array [$($done)* $crate::value!($name { $($body)* }),] $($rest)*)
    };
    (@array [$($done:tt)*] $elem:tt $($rest:tt)*) => {
        $crate::value!(@array [$($done)* $crate::value!($elem),] $($rest)*)
    };

    (@entries [$($done:tt)*]) => {
        vec![$($done)*]
    };
    (@entries [$($done:tt)*] , $($rest:tt)*) => {
        $crate::value!(@entries [$($done)*] $($rest)*)
    };
    (@entries [$($done:tt)*] $key:literal : $name:ident { $($body:tt)* } $($rest:tt)*) => {
        $crate::value!(@entries [$($done)* ($key, $crate::value!($name { $($body)* })),] $($rest)*)
    };
    (@entries [$($done:tt)*] $key:literal : $value:tt $($rest:tt)*) => {
        $crate::value!(@entries [$($done)* ($key, $crate::value!($value)),] $($rest)*)
    };

    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([ $($elems:tt)* ]) => {
        $crate::Value::Array($crate::value!(@array [] $($elems)*))
    };

    ({ $($entries:tt)* }) => {{
        let entries: ::std::vec::Vec<(&str, $crate::Value)> = $crate::value!(@entries [] $($entries)*);
        $crate::Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| ($crate::Value::from(key), value))
                .collect(),
        )
    }};

    ($name:ident { $($entries:tt)* }) => {{
        let entries: ::std::vec::Vec<(&str, $crate::Value)> = $crate::value!(@entries [] $($entries)*);
        let mut object = $crate::value::Object::new(stringify!($name));
        for (key, value) in entries {
            object.insert(key, value);
        }
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or_default()
    };
}
