//! [`Inspect`] implementations for std, `chrono`, `num-bigint` and `indexmap`
//! types.
//!
//! | Types | Node |
//! |-------|------|
//! | `bool`, integers, floats, `char`, `str`, `String`, `Cow<str>` | scalar |
//! | `chrono` dates and times, `BigInt`, `BigUint`, IP and socket addresses | scalar |
//! | `()`, `None`, an unset `OnceCell` / `OnceLock` | null |
//! | `Vec`, slices, arrays, `VecDeque`, `LinkedList`, sets, `BinaryHeap`, tuples | sequence |
//! | `HashMap`, `BTreeMap`, `IndexMap` | map |
//! | `fn` pointers, `dyn Fn`, futures, `JoinHandle`, `Weak`, `PhantomData` | ignored |
//! | `&T`, `&mut T`, `Box`, `Rc`, `Arc`, `Pin`, `Some`, `RefCell` | the wrapped value |
//!
//! Owned scalars and collections of `'static` values also expose
//! themselves as `dyn Any`, so a registered converter can replace them.
//! Arrays, slices and tuples take borrowed data and never convert.
//!
//! `Mutex` and `RwLock` have no impl. Locking inside a cycle deadlocks
//! before the tracker sees the repeat.

use crate::inspect::{Inspect, MapView, Node, SequenceView};
use crate::scalar::Scalar;
use std::any::Any;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use indexmap::{IndexMap, IndexSet};
use num_bigint::{BigInt, BigUint};
use std::borrow::Cow;
use std::cell::{OnceCell, Ref, RefCell};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

/// `type_name::<T>()` without the transparent wrappers around it, matching
/// what a present value would report.
fn unwrapped_type_name<T: ?Sized>() -> &'static str {
    const WRAPPERS: [&str; 8] = ["Box", "Rc", "Arc", "Pin", "Option", "RefCell", "OnceCell", "OnceLock"];

    let mut name = std::any::type_name::<T>();
    loop {
        if let Some(rest) = name.strip_prefix("&mut ").or_else(|| name.strip_prefix('&')) {
            name = rest;
            continue;
        }
        let Some(open) = name.find('<') else {
            return name;
        };
        let path = &name[..open];
        let plain = path.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':');
        let head = path.rsplit("::").next().unwrap_or_default();
        match name.strip_suffix('>') {
            Some(inner) if plain && WRAPPERS.contains(&head) => name = &inner[open + 1..],
            _ => return name,
        }
    }
}

#[inline]
fn erase<'a, T: Inspect + 'a>(value: &'a T) -> &'a dyn Inspect {
    value
}

#[inline]
fn erase_ref<'a, T: Inspect + 'a>(value: &T) -> &(dyn Inspect + 'a) {
    value
}

macro_rules! inspect_scalar {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                #[inline]
                fn inspect(&self) -> Node<'_> {
                    Node::Scalar(Scalar::$variant(*self as $target))
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }
        )*
    };
}

inspect_scalar! {
    i8 => I64 as i64,
    i16 => I64 as i64,
    i32 => I64 as i64,
    i64 => I64 as i64,
    isize => I64 as i64,
    u8 => U64 as u64,
    u16 => U64 as u64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    usize => U64 as u64,
    i128 => I128 as i128,
    u128 => U128 as u128,
    f32 => F32 as f32,
    f64 => F64 as f64,
}

impl Inspect for bool {
    fn inspect(&self) -> Node<'_> {
        Node::Scalar(Scalar::Bool(*self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for char {
    fn inspect(&self) -> Node<'_> {
        Node::Scalar(Scalar::Char(*self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for str {
    fn inspect(&self) -> Node<'_> {
        Node::str(self)
    }
}

impl Inspect for String {
    fn inspect(&self) -> Node<'_> {
        Node::str(self)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Inspect for Cow<'_, str> {
    fn inspect(&self) -> Node<'_> {
        Node::str(self)
    }
}

impl Inspect for () {
    fn inspect(&self) -> Node<'_> {
        Node::Null
    }
}

// Display-backed scalars

macro_rules! inspect_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self) -> Node<'_> {
                    Node::display(self)
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }
        )*
    };
}

inspect_display!(BigInt, BigUint, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, NaiveDate, NaiveTime, chrono::Duration);

impl Inspect for NaiveDateTime {
    fn inspect(&self) -> Node<'_> {
        Node::Scalar(Scalar::text(
            self.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        ))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl<Tz> Inspect for DateTime<Tz>
where
    Tz: TimeZone + 'static,
    Tz::Offset: fmt::Display,
{
    fn inspect(&self) -> Node<'_> {
        Node::Scalar(Scalar::text(self.to_rfc3339()))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

// Transparent wrappers

macro_rules! inspect_deref {
    ($($wrapper:ident),* $(,)?) => {
        $(
            impl<T: Inspect + ?Sized> Inspect for $wrapper<T> {
                #[inline]
                fn inspect(&self) -> Node<'_> {
                    (**self).inspect()
                }

                fn type_name(&self) -> &'static str {
                    (**self).type_name()
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    (**self).as_any()
                }
            }
        )*
    };
}

inspect_deref!(Box, Rc, Arc);

impl<T: Inspect + ?Sized> Inspect for &T {
    #[inline]
    fn inspect(&self) -> Node<'_> {
        (**self).inspect()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        (**self).as_any()
    }
}

impl<T: Inspect + ?Sized> Inspect for &mut T {
    #[inline]
    fn inspect(&self) -> Node<'_> {
        (**self).inspect()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        (**self).as_any()
    }
}

impl<P> Inspect for Pin<P>
where
    P: std::ops::Deref,
    P::Target: Inspect,
{
    fn inspect(&self) -> Node<'_> {
        self.as_ref().get_ref().inspect()
    }

    fn type_name(&self) -> &'static str {
        self.as_ref().get_ref().type_name()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        self.as_ref().get_ref().as_any()
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Node<'_> {
        match self {
            Some(value) => value.inspect(),
            None => Node::Null,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Some(value) => value.type_name(),
            None => unwrapped_type_name::<T>(),
        }
    }

    fn as_any(&self) -> Option<&dyn Any> {
        self.as_ref().and_then(Inspect::as_any)
    }
}

impl<T: Inspect> Inspect for RefCell<T> {
    fn inspect(&self) -> Node<'_> {
        match self.try_borrow() {
            Ok(guard) => Node::Borrowed(Ref::map(guard, erase_ref)),
            Err(_) => {
                tracing::trace!(
                    type_name = std::any::type_name::<T>(),
                    "value is mutably borrowed, skipping"
                );
                Node::Ignored
            }
        }
    }

    fn type_name(&self) -> &'static str {
        unwrapped_type_name::<T>()
    }
}

macro_rules! inspect_once {
    ($($cell:ident),* $(,)?) => {
        $(
            impl<T: Inspect> Inspect for $cell<T> {
                fn inspect(&self) -> Node<'_> {
                    match self.get() {
                        Some(value) => value.inspect(),
                        None => Node::Null,
                    }
                }

                fn type_name(&self) -> &'static str {
                    match self.get() {
                        Some(value) => value.type_name(),
                        None => unwrapped_type_name::<T>(),
                    }
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    self.get().and_then(Inspect::as_any)
                }
            }
        )*
    };
}

inspect_once!(OnceCell, OnceLock);

// Ignored: callables, pending work and non-owning handles

impl<T: ?Sized> Inspect for std::rc::Weak<T> {
    fn inspect(&self) -> Node<'_> {
        Node::Ignored
    }
}

impl<T: ?Sized> Inspect for std::sync::Weak<T> {
    fn inspect(&self) -> Node<'_> {
        Node::Ignored
    }
}

impl<T: ?Sized> Inspect for PhantomData<T> {
    fn inspect(&self) -> Node<'_> {
        Node::Ignored
    }
}

impl<T> Inspect for std::thread::JoinHandle<T> {
    fn inspect(&self) -> Node<'_> {
        Node::Ignored
    }
}

impl<T> Inspect for dyn Future<Output = T> {
    fn inspect(&self) -> Node<'_> {
        Node::Ignored
    }
}

impl<T> Inspect for dyn Future<Output = T> + Send {
    fn inspect(&self) -> Node<'_> {
        Node::Ignored
    }
}

macro_rules! inspect_callable {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Inspect for fn($($arg),*) -> R {
            fn inspect(&self) -> Node<'_> {
                Node::Ignored
            }
        }

        impl<R, $($arg),*> Inspect for dyn Fn($($arg),*) -> R {
            fn inspect(&self) -> Node<'_> {
                Node::Ignored
            }
        }

        impl<R, $($arg),*> Inspect for dyn Fn($($arg),*) -> R + Send + Sync {
            fn inspect(&self) -> Node<'_> {
                Node::Ignored
            }
        }

        impl<R, $($arg),*> Inspect for dyn FnMut($($arg),*) -> R {
            fn inspect(&self) -> Node<'_> {
                Node::Ignored
            }
        }
    };
}

inspect_callable!();
inspect_callable!(A);
inspect_callable!(A, B);
inspect_callable!(A, B, C);

// Sequences

macro_rules! inspect_seq {
    ($($seq:ident<T $(, $param:ident)*>),* $(,)?) => {
        $(
            impl<T: Inspect + 'static $(, $param: 'static)*> Inspect for $seq<T $(, $param)*> {
                fn inspect(&self) -> Node<'_> {
                    Node::Sequence(SequenceView::new(self, self.iter().map(erase)))
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }
        )*
    };
}

inspect_seq! {
    Vec<T>,
    VecDeque<T>,
    LinkedList<T>,
    BTreeSet<T>,
    BinaryHeap<T>,
    HashSet<T, S>,
    IndexSet<T, S>,
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Node<'_> {
        Node::Sequence(SequenceView::new(self, self.iter().map(erase)))
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Node<'_> {
        Node::Sequence(SequenceView::new(self, self.iter().map(erase)))
    }
}

macro_rules! inspect_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Inspect),+> Inspect for ($($name,)+) {
            fn inspect(&self) -> Node<'_> {
                Node::Sequence(SequenceView::new(self, [$(erase(&self.$idx)),+]))
            }
        }
    };
}

inspect_tuple!(A 0);
inspect_tuple!(A 0, B 1);
inspect_tuple!(A 0, B 1, C 2);
inspect_tuple!(A 0, B 1, C 2, D 3);
inspect_tuple!(A 0, B 1, C 2, D 3, E 4);
inspect_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);

// Maps

macro_rules! inspect_map {
    ($($map:ident<K, V $(, $param:ident)*>),* $(,)?) => {
        $(
            impl<K, V $(, $param)*> Inspect for $map<K, V $(, $param)*>
            where
                K: Inspect + 'static,
                V: Inspect + 'static,
                $($param: 'static,)*
            {
                fn inspect(&self) -> Node<'_> {
                    Node::Map(MapView::new(
                        self,
                        self.iter().map(|(key, value)| (erase(key), erase(value))),
                    ))
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }
        )*
    };
}

inspect_map! {
    BTreeMap<K, V>,
    HashMap<K, V, S>,
    IndexMap<K, V, S>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::Converters;

    fn shape_of(value: &dyn Inspect) -> Shape {
        match value.inspect() {
            Node::Borrowed(inner) => shape_of(&*inner),
            node => Shape::classify(&node, &Converters::new()),
        }
    }

    fn scalar_text(value: &dyn Inspect) -> String {
        match value.inspect() {
            Node::Scalar(scalar) => scalar.to_string(),
            _ => panic!("expected a scalar"),
        }
    }

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(shape_of(&42_u8), Shape::Scalar);
        assert_eq!(shape_of(&-1_i128), Shape::Scalar);
        assert_eq!(shape_of(&"text"), Shape::Scalar);
        assert_eq!(shape_of(&String::from("owned")), Shape::Scalar);
        assert_eq!(shape_of(&'c'), Shape::Scalar);
        assert_eq!(shape_of(&()), Shape::Null);
    }

    #[test]
    fn test_option_is_transparent() {
        let none: Option<i32> = None;
        assert_eq!(shape_of(&none), Shape::Null);
        assert_eq!(none.type_name(), "i32");
        assert_eq!(shape_of(&Some(vec![1])), Shape::Sequence);
        assert_eq!(Some(5_u16).type_name(), "u16");
    }

    #[test]
    fn test_empty_wrappers_report_wrapped_type_name() {
        let set: Option<Rc<String>> = Some(Rc::new(String::new()));
        let unset: Option<Rc<String>> = None;
        assert_eq!(unset.type_name(), set.type_name());
        assert_eq!(unset.type_name(), "alloc::string::String");

        let nested: Option<Box<Option<Arc<u8>>>> = None;
        assert_eq!(nested.type_name(), "u8");

        let cell: OnceCell<&RefCell<i64>> = OnceCell::new();
        assert_eq!(cell.type_name(), "i64");

        let plain: Option<Vec<u8>> = None;
        assert_eq!(plain.type_name(), "alloc::vec::Vec<u8>");
    }

    #[test]
    fn test_owned_values_expose_any() {
        assert!(3_u8.as_any().is_some());
        assert!(String::new().as_any().is_some());
        assert!(vec![1_u8].as_any().is_some());
        assert!(Box::new(NaiveDate::MIN).as_any().is_some());
        assert!(Some(1_i32).as_any().and_then(|a| a.downcast_ref::<i32>()).is_some());
        assert!("borrowed".as_any().is_none());
        assert!(RefCell::new(1).as_any().is_none());
    }

    #[test]
    fn test_collection_shapes() {
        assert_eq!(shape_of(&vec![1, 2]), Shape::Sequence);
        assert_eq!(shape_of(&[1, 2, 3]), Shape::Sequence);
        assert_eq!(shape_of(&(1, "two")), Shape::Sequence);
        assert_eq!(shape_of(&BTreeSet::from([1])), Shape::Sequence);

        let mut map = HashMap::new();
        map.insert("k", 1);
        assert_eq!(shape_of(&map), Shape::AssociativeMap);
        assert_eq!(shape_of(&IndexMap::<String, i32>::new()), Shape::AssociativeMap);
    }

    #[test]
    fn test_ignored_shapes() {
        let callback: fn(i32) -> i32 = |x| x + 1;
        assert_eq!(shape_of(&callback), Shape::Ignored);

        let boxed: Box<dyn Fn() -> u8> = Box::new(|| 1);
        assert_eq!(shape_of(&boxed), Shape::Ignored);

        let future: Pin<Box<dyn Future<Output = ()> + Send>> = Box::pin(async {});
        assert_eq!(shape_of(&future), Shape::Ignored);

        let strong = Rc::new(1);
        assert_eq!(shape_of(&Rc::downgrade(&strong)), Shape::Ignored);
        assert_eq!(shape_of(&PhantomData::<String>), Shape::Ignored);
    }

    #[test]
    fn test_refcell_borrow_and_conflict() {
        let cell = RefCell::new(7_i32);
        assert_eq!(shape_of(&cell), Shape::Scalar);
        assert_eq!(cell.type_name(), "i32");

        let _writer = cell.borrow_mut();
        assert_eq!(shape_of(&cell), Shape::Ignored);
    }

    #[test]
    fn test_once_cell() {
        let cell: OnceCell<u8> = OnceCell::new();
        assert_eq!(shape_of(&cell), Shape::Null);
        cell.set(3).unwrap();
        assert_eq!(scalar_text(&cell), "3");
    }

    #[test]
    fn test_display_scalars() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(scalar_text(&date), "2024-02-29");

        let stamp = date.and_hms_milli_opt(13, 5, 9, 250).unwrap();
        assert_eq!(scalar_text(&stamp), "2024-02-29T13:05:09.250");

        let utc = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(scalar_text(&utc), "2024-01-02T03:04:05+00:00");

        let big: BigInt = "-123456789012345678901234567890".parse().unwrap();
        assert_eq!(scalar_text(&big), "-123456789012345678901234567890");

        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        assert_eq!(scalar_text(&ip), "10.0.0.1");
    }

    #[test]
    fn test_wrappers_report_inner_type_name() {
        let boxed: Box<u32> = Box::new(1);
        assert_eq!(boxed.type_name(), "u32");
        let shared = Arc::new(String::new());
        assert_eq!(shared.type_name(), "alloc::string::String");
    }
}
