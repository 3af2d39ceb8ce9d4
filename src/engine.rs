//! The depth-first walk that produces a [`FlatMap`].
//!
//! A [`Flattener`] owns the options and the filter for a batch of calls.
//! Each call to [`Flattener::flatten`] builds a fresh reference tracker,
//! ancestor stack and output map, so one flattener can be reused freely.
//!
//! Per node the walk:
//!
//! 1. asks the value to [`inspect`](Inspect::inspect) itself, holding any
//!    runtime borrow guard until the node is done;
//! 2. classifies the node into a [`Shape`];
//! 3. asks the filter whether to descend (never for the root);
//! 4. writes leaves, or enters the container, walks its children and leaves
//!    it again.
//!
//! Any error aborts the call and the partial output is dropped.

use crate::context::{NodeContext, ParentFrame};
use crate::error::{Error, Result};
use crate::filter::{Filter, NoFilter};
use crate::inspect::{Inspect, Node};
use crate::map::FlatMap;
use crate::member::discover;
use crate::options::FlattenOptions;
use crate::path::{append, friendly_type_name, KeyTokens, Segment};
use crate::shape::Shape;
use crate::tracker::{Identity, ReferenceTracker};
use tracing::{debug, trace};

/// Flattens object graphs with fixed options and filter.
///
/// # Examples
///
/// ```rust
/// use serde_flatpath::{impl_inspect, FlattenOptions, Flattener, PathFilter};
///
/// struct Point { x: i32, y: i32 }
/// impl_inspect!(Point { x, y });
///
/// let only_x = PathFilter::new().include("x");
/// let flattener = Flattener::new(FlattenOptions::default()).with_filter(&only_x);
///
/// let map = flattener.flatten(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(map.get("x"), Some("1"));
/// assert!(!map.contains_key("y"));
/// ```
pub struct Flattener<'f> {
    options: FlattenOptions,
    filter: &'f dyn Filter,
}

impl<'f> Flattener<'f> {
    #[must_use]
    pub fn new(options: FlattenOptions) -> Self {
        Flattener {
            options,
            filter: &NoFilter,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: &'f dyn Filter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Flattens the graph reachable from `root`.
    ///
    /// # Errors
    ///
    /// - [`Error::Cycle`] if a container is reached again while it is still
    ///   being walked.
    /// - [`Error::DepthLimitExceeded`] if containers nest deeper than
    ///   [`FlattenOptions::max_depth`].
    /// - [`Error::Filter`] if a filter hook fails.
    pub fn flatten(&self, root: &dyn Inspect) -> Result<FlatMap> {
        let root_type = friendly_type_name(root.type_name());
        debug!(root = %root_type, "flattening started");

        let mut walk = Walk {
            options: &self.options,
            filter: self.filter,
            tracker: ReferenceTracker::new(),
            parents: Vec::new(),
            out: FlatMap::new(),
        };

        match walk.visit(root, String::new(), None, None) {
            Ok(()) => {
                debug!(root = %root_type, entries = walk.out.len(), "flattening finished");
                Ok(walk.out)
            }
            Err(err) => {
                debug!(root = %root_type, error = %err, "flattening aborted");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Flattener<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flattener")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// State of a single call.
struct Walk<'o> {
    options: &'o FlattenOptions,
    filter: &'o dyn Filter,
    tracker: ReferenceTracker,
    parents: Vec<ParentFrame>,
    out: FlatMap,
}

impl Walk<'_> {
    fn visit(
        &mut self,
        value: &dyn Inspect,
        path: String,
        member_name: Option<&str>,
        index: Option<usize>,
    ) -> Result<()> {
        let node = match value.inspect() {
            // the guard stays alive until the borrowed value is fully walked
            Node::Borrowed(guard) => return self.visit(&*guard, path, member_name, index),
            node => node,
        };

        // a converter for the concrete type wins over the node's own shape
        let converted = value
            .as_any()
            .and_then(|any| self.options.converters.convert(any));
        let shape = match converted {
            Some(_) => Shape::Scalar,
            None => Shape::classify(&node, &self.options.converters),
        };
        if shape == Shape::Ignored {
            trace!(path = %path, "ignored value skipped");
            return Ok(());
        }

        let type_name = friendly_type_name(value.type_name());
        let is_root = self.parents.is_empty();
        let ctx = NodeContext {
            type_name: &type_name,
            path: &path,
            member_name,
            index,
            shape,
            value,
            parents: &self.parents,
        };

        if !is_root {
            let descend = self
                .filter
                .should_descend(&ctx)
                .map_err(|source| Error::filter(&path, source))?;
            if !descend {
                trace!(path = %path, "node pruned by filter");
                return Ok(());
            }
        }

        if let Some(text) = converted {
            return emit(self.filter, &mut self.out, &ctx, true, text);
        }

        match node {
            Node::Null => {
                let sentinel = self.options.null_sentinel.clone();
                emit(self.filter, &mut self.out, &ctx, self.options.include_nulls, sentinel)
            }
            Node::Scalar(scalar) => emit(self.filter, &mut self.out, &ctx, true, scalar.to_string()),
            Node::Object(object) if shape == Shape::Scalar => {
                let text = object
                    .as_any()
                    .and_then(|any| self.options.converters.convert(any))
                    .ok_or_else(|| Error::custom(format!("converter for {} failed", type_name)))?;
                emit(self.filter, &mut self.out, &ctx, true, text)
            }
            Node::Sequence(sequence) => {
                let identity = sequence.identity();
                let mut items = sequence.into_items().peekable();
                if items.peek().is_none() {
                    let sentinel = self.options.empty_sentinel.clone();
                    let default = self.options.include_empty_collections;
                    return emit(self.filter, &mut self.out, &ctx, default, sentinel);
                }
                let frame = parent_frame(&type_name, member_name, index);
                self.enter(identity, frame, &path)?;
                let result = items.enumerate().try_for_each(|(i, item)| {
                    self.visit(item, append(&path, Segment::Index(i)), None, Some(i))
                });
                self.leave();
                result
            }
            Node::Map(map) => {
                let identity = map.identity();
                let mut entries = map.into_entries().peekable();
                if entries.peek().is_none() {
                    let sentinel = self.options.empty_sentinel.clone();
                    let default = self.options.include_empty_collections;
                    return emit(self.filter, &mut self.out, &ctx, default, sentinel);
                }
                let frame = parent_frame(&type_name, member_name, index);
                self.enter(identity, frame, &path)?;
                let mut tokens = KeyTokens::new();
                let result = entries.try_for_each(|(key, entry)| {
                    let token = self.key_token(key, &mut tokens);
                    self.visit(entry, append(&path, Segment::Key(&token)), None, None)
                });
                self.leave();
                result
            }
            Node::Object(object) => {
                let frame = parent_frame(&type_name, member_name, index);
                self.enter(object.identity(), frame, &path)?;
                let members = discover(
                    object.members(),
                    self.options.member_selection,
                    self.options.member_order,
                );
                let result = members.into_iter().try_for_each(|member| match member.value.get() {
                    Some(child) => {
                        let name: &str = &member.name;
                        self.visit(child, append(&path, Segment::Member(name)), Some(name), None)
                    }
                    None => {
                        trace!(path = %path, member = %member.name, "write-only member skipped");
                        Ok(())
                    }
                });
                self.leave();
                result
            }
            Node::Ignored | Node::Borrowed(_) => Ok(()),
        }
    }

    fn enter(&mut self, identity: Identity, frame: ParentFrame, path: &str) -> Result<()> {
        let max_depth = self.options.max_depth;
        if self.tracker.depth() >= max_depth {
            debug!(path = %path, max_depth, "depth limit exceeded");
            return Err(Error::depth_limit(path, max_depth));
        }
        if let Err(cycle) = self.tracker.enter(identity, path) {
            debug!(path = %path, type_name = %cycle.type_name, "cycle detected");
            return Err(cycle.into());
        }
        self.parents.push(frame);
        Ok(())
    }

    fn leave(&mut self) {
        self.parents.pop();
        self.tracker.leave();
    }

    /// Text used for a map key in child paths.
    ///
    /// Two keys with the same text never share a path: the later one is
    /// named after its type instead.
    fn key_token(&self, key: &dyn Inspect, tokens: &mut KeyTokens) -> String {
        let type_name = friendly_type_name(key.type_name());
        let converters = &self.options.converters;
        if let Some(text) = key.as_any().and_then(|any| converters.convert(any)) {
            return tokens.text(text, &type_name);
        }
        match key.inspect() {
            Node::Scalar(scalar) => tokens.text(scalar.to_string(), &type_name),
            Node::Borrowed(guard) => self.key_token(&*guard, tokens),
            Node::Object(object) => match object.as_any().and_then(|any| converters.convert(any)) {
                Some(text) => tokens.text(text, &type_name),
                None => tokens.complex(&type_name),
            },
            _ => tokens.complex(&type_name),
        }
    }
}

fn parent_frame(type_name: &str, member_name: Option<&str>, index: Option<usize>) -> ParentFrame {
    ParentFrame {
        type_name: type_name.to_string(),
        name: member_name.map(str::to_string),
        index,
    }
}

/// Writes a leaf if the filter agrees.
///
/// A free function so that the context can keep borrowing the ancestor
/// stack while the output is written.
fn emit(
    filter: &dyn Filter,
    out: &mut FlatMap,
    ctx: &NodeContext<'_>,
    default: bool,
    raw: String,
) -> Result<()> {
    let wrap = |source| Error::filter(ctx.path, source);
    if !filter.should_emit(ctx, default).map_err(wrap)? {
        return Ok(());
    }
    let text = filter.format(ctx, raw).map_err(wrap)?;
    out.insert(ctx.path.to_string(), text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FnFilter;
    use crate::inspect::ObjectView;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    struct Leafy {
        name: &'static str,
        tags: Vec<&'static str>,
        extra: Option<i32>,
    }

    impl Inspect for Leafy {
        fn inspect(&self) -> Node<'_> {
            Node::Object(
                ObjectView::new(self)
                    .field("name", &self.name)
                    .field("tags", &self.tags)
                    .field("extra", &self.extra),
            )
        }
    }

    fn leafy() -> Leafy {
        Leafy {
            name: "n",
            tags: vec!["a", "b"],
            extra: None,
        }
    }

    #[test]
    fn test_pre_order_paths() {
        let map = Flattener::new(FlattenOptions::default()).flatten(&leafy()).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["name", "tags[0]", "tags[1]"]);
    }

    #[test]
    fn test_nulls_and_empties_use_sentinels() {
        let mut value = leafy();
        value.tags.clear();
        let options = FlattenOptions::new()
            .with_include_nulls(true)
            .with_include_empty_collections(true);
        let map = Flattener::new(options).flatten(&value).unwrap();
        assert_eq!(map.get("tags"), Some("<empty>"));
        assert_eq!(map.get("extra"), Some("<null>"));
    }

    #[test]
    fn test_root_scalar_uses_empty_path() {
        let map = Flattener::new(FlattenOptions::default()).flatten(&7_u8).unwrap();
        assert_eq!(map.get(""), Some("7"));
    }

    #[test]
    fn test_parents_seen_by_hooks() {
        let seen = RefCell::new(Vec::new());
        let filter = FnFilter::new().descend(|ctx| {
            if ctx.index.is_some() {
                let parent = ctx.parent().and_then(|p| p.name.clone());
                seen.borrow_mut().push((ctx.path.to_string(), parent, ctx.depth()));
            }
            true
        });
        Flattener::new(FlattenOptions::default())
            .with_filter(&filter)
            .flatten(&leafy())
            .unwrap();
        drop(filter);
        assert_eq!(
            seen.into_inner(),
            vec![
                ("tags[0]".to_string(), Some("tags".to_string()), 2),
                ("tags[1]".to_string(), Some("tags".to_string()), 2),
            ]
        );
    }

    #[test]
    fn test_depth_guard() {
        let nested = vec![vec![vec![1]]];
        let err = Flattener::new(FlattenOptions::new().with_max_depth(2))
            .flatten(&nested)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DepthLimitExceeded { ref path, max_depth: 2 } if path == "[0][0]"
        ));

        let ok = Flattener::new(FlattenOptions::new().with_max_depth(3)).flatten(&nested);
        assert_eq!(ok.unwrap().get("[0][0][0]"), Some("1"));
    }

    #[test]
    fn test_tracker_is_clean_after_error() {
        struct Link {
            next: RefCell<Option<Rc<Link>>>,
        }
        impl Inspect for Link {
            fn inspect(&self) -> Node<'_> {
                Node::Object(ObjectView::new(self).field("next", &self.next))
            }
        }

        let a = Rc::new(Link {
            next: RefCell::new(None),
        });
        *a.next.borrow_mut() = Some(Rc::clone(&a));

        let flattener = Flattener::new(FlattenOptions::default());
        let err = flattener.flatten(&a).unwrap_err();
        assert_eq!(err.path(), Some("next"));
        // break the loop so the Rc is freed
        a.next.borrow_mut().take();
        assert!(flattener.flatten(&a).unwrap().is_empty());
    }

    #[test]
    fn test_complex_keys_are_counted() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "first");
        map.insert((3, 4), "second");
        let out = Flattener::new(FlattenOptions::default()).flatten(&map).unwrap();
        let keys: Vec<_> = out.keys().cloned().collect();
        assert_eq!(keys, vec!["(i32, i32)`0", "(i32, i32)`1"]);
    }
}
