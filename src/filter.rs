//! Per-node hooks that prune and rewrite the output.
//!
//! A [`Filter`] is consulted at every node, in this order:
//!
//! 1. [`should_descend`](Filter::should_descend): `false` drops the node and
//!    everything beneath it. The root is always walked.
//! 2. [`should_emit`](Filter::should_emit): whether a leaf is written. The
//!    `default` argument is what the options decide (scalars are written, nulls
//!    and empty collections only when the matching option is on).
//! 3. [`format`](Filter::format): rewrites the string just before it is
//!    inserted.
//!
//! Any hook error aborts the whole call.
//!
//! ## Examples
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use serde_flatpath::{flatten_with, impl_inspect, FlattenOptions, FnFilter};
//!
//! struct Settings {
//!     name: String,
//!     token: String,
//!     limits: BTreeMap<String, u32>,
//! }
//! impl_inspect!(Settings { name, token, limits });
//!
//! let settings = Settings {
//!     name: "prod".into(),
//!     token: "s3cr3t".into(),
//!     limits: BTreeMap::from([("rps".to_string(), 100)]),
//! };
//!
//! let redact = FnFilter::new().format(|ctx, value| {
//!     if ctx.member_name == Some("token") { "***".to_string() } else { value }
//! });
//!
//! let map = flatten_with(&settings, FlattenOptions::default(), Some(&redact)).unwrap();
//! assert_eq!(map.get("token"), Some("***"));
//! assert_eq!(map.get("limits.rps"), Some("100"));
//! ```

use crate::context::NodeContext;
use crate::error::FilterError;

/// Hooks consulted for every node of the graph.
///
/// All methods have pass-through defaults, so implementations override only
/// what they need.
pub trait Filter {
    /// Whether the node at `ctx` is visited at all.
    fn should_descend(&self, _ctx: &NodeContext<'_>) -> Result<bool, FilterError> {
        Ok(true)
    }

    /// Whether the leaf at `ctx` is written; `default` is the options' answer.
    fn should_emit(&self, _ctx: &NodeContext<'_>, default: bool) -> Result<bool, FilterError> {
        Ok(default)
    }

    /// Final rewrite of the string written at `ctx.path`.
    fn format(&self, _ctx: &NodeContext<'_>, value: String) -> Result<String, FilterError> {
        Ok(value)
    }
}

impl<F: Filter + ?Sized> Filter for &F {
    fn should_descend(&self, ctx: &NodeContext<'_>) -> Result<bool, FilterError> {
        (**self).should_descend(ctx)
    }

    fn should_emit(&self, ctx: &NodeContext<'_>, default: bool) -> Result<bool, FilterError> {
        (**self).should_emit(ctx, default)
    }

    fn format(&self, ctx: &NodeContext<'_>, value: String) -> Result<String, FilterError> {
        (**self).format(ctx, value)
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn should_descend(&self, ctx: &NodeContext<'_>) -> Result<bool, FilterError> {
        (**self).should_descend(ctx)
    }

    fn should_emit(&self, ctx: &NodeContext<'_>, default: bool) -> Result<bool, FilterError> {
        (**self).should_emit(ctx, default)
    }

    fn format(&self, ctx: &NodeContext<'_>, value: String) -> Result<String, FilterError> {
        (**self).format(ctx, value)
    }
}

/// The filter used when none is given: every hook keeps its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFilter;

impl Filter for NoFilter {}

type DescendFn<'a> = dyn Fn(&NodeContext<'_>) -> Result<bool, FilterError> + 'a;
type EmitFn<'a> = dyn Fn(&NodeContext<'_>, bool) -> Result<bool, FilterError> + 'a;
type FormatFn<'a> = dyn Fn(&NodeContext<'_>, String) -> Result<String, FilterError> + 'a;

/// A filter assembled from closures.
///
/// ```rust
/// use serde_flatpath::{flatten_with, FlattenOptions, FnFilter};
///
/// let only_first = FnFilter::new().descend(|ctx| ctx.index.map_or(true, |i| i == 0));
/// let map = flatten_with(&vec!["a", "b"], FlattenOptions::default(), Some(&only_first)).unwrap();
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get("[0]"), Some("a"));
/// ```
#[derive(Default)]
pub struct FnFilter<'a> {
    descend: Option<Box<DescendFn<'a>>>,
    emit: Option<Box<EmitFn<'a>>>,
    format: Option<Box<FormatFn<'a>>>,
}

impl<'a> FnFilter<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn descend<F>(self, f: F) -> Self
    where
        F: Fn(&NodeContext<'_>) -> bool + 'a,
    {
        self.try_descend(move |ctx: &NodeContext<'_>| Ok(f(ctx)))
    }

    #[must_use]
    pub fn try_descend<F>(mut self, f: F) -> Self
    where
        F: Fn(&NodeContext<'_>) -> Result<bool, FilterError> + 'a,
    {
        self.descend = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn emit<F>(self, f: F) -> Self
    where
        F: Fn(&NodeContext<'_>, bool) -> bool + 'a,
    {
        self.try_emit(move |ctx: &NodeContext<'_>, default: bool| Ok(f(ctx, default)))
    }

    #[must_use]
    pub fn try_emit<F>(mut self, f: F) -> Self
    where
        F: Fn(&NodeContext<'_>, bool) -> Result<bool, FilterError> + 'a,
    {
        self.emit = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn format<F>(self, f: F) -> Self
    where
        F: Fn(&NodeContext<'_>, String) -> String + 'a,
    {
        self.try_format(move |ctx: &NodeContext<'_>, value: String| Ok(f(ctx, value)))
    }

    #[must_use]
    pub fn try_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&NodeContext<'_>, String) -> Result<String, FilterError> + 'a,
    {
        self.format = Some(Box::new(f));
        self
    }
}

impl Filter for FnFilter<'_> {
    fn should_descend(&self, ctx: &NodeContext<'_>) -> Result<bool, FilterError> {
        match &self.descend {
            Some(f) => f(ctx),
            None => Ok(true),
        }
    }

    fn should_emit(&self, ctx: &NodeContext<'_>, default: bool) -> Result<bool, FilterError> {
        match &self.emit {
            Some(f) => f(ctx, default),
            None => Ok(default),
        }
    }

    fn format(&self, ctx: &NodeContext<'_>, value: String) -> Result<String, FilterError> {
        match &self.format {
            Some(f) => f(ctx, value),
            None => Ok(value),
        }
    }
}

impl std::fmt::Debug for FnFilter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFilter")
            .field("descend", &self.descend.is_some())
            .field("emit", &self.emit.is_some())
            .field("format", &self.format.is_some())
            .finish()
    }
}

/// Returns `true` if `path` is `prefix` or lies beneath it.
fn is_under(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}

/// Keeps or drops subtrees by path.
///
/// With no includes everything is kept. With includes, a node is kept when
/// it lies under an included path, or when it is a container on the way to
/// one. Excludes win over includes.
///
/// ```rust
/// use serde_flatpath::PathFilter;
///
/// let filter = PathFilter::new()
///     .include("Prop1")
///     .include("Prop2")
///     .exclude("Prop2.Secret");
/// assert!(filter.keeps("Prop2.Prop5.Key3"));
/// assert!(!filter.keeps("Prop2.Secret"));
/// assert!(!filter.keeps("Prop3"));
/// assert!(!filter.keeps("Prop10"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PathFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.include.push(path.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.exclude.push(path.into());
        self
    }

    /// Whether a leaf at `path` would be written.
    #[must_use]
    pub fn keeps(&self, path: &str) -> bool {
        if self.exclude.iter().any(|prefix| is_under(path, prefix)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|prefix| is_under(path, prefix))
    }

    fn leads_to_include(&self, path: &str) -> bool {
        self.include.iter().any(|prefix| is_under(prefix, path))
    }
}

impl Filter for PathFilter {
    fn should_descend(&self, ctx: &NodeContext<'_>) -> Result<bool, FilterError> {
        if self.keeps(ctx.path) {
            return Ok(true);
        }
        let excluded = self.exclude.iter().any(|prefix| is_under(ctx.path, prefix));
        Ok(!excluded && ctx.shape.is_container() && self.leads_to_include(ctx.path))
    }
}

/// Runs several filters as one.
///
/// A node is visited only if every filter agrees. Emit decisions are
/// threaded through the filters in order, each seeing the previous answer as
/// its default; formats are applied in order.
#[derive(Default)]
pub struct FilterChain<'a> {
    filters: Vec<Box<dyn Filter + 'a>>,
}

impl<'a> FilterChain<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, filter: impl Filter + 'a) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Filter for FilterChain<'_> {
    fn should_descend(&self, ctx: &NodeContext<'_>) -> Result<bool, FilterError> {
        for filter in &self.filters {
            if !filter.should_descend(ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn should_emit(&self, ctx: &NodeContext<'_>, default: bool) -> Result<bool, FilterError> {
        self.filters
            .iter()
            .try_fold(default, |emit, filter| filter.should_emit(ctx, emit))
    }

    fn format(&self, ctx: &NodeContext<'_>, value: String) -> Result<String, FilterError> {
        self.filters
            .iter()
            .try_fold(value, |value, filter| filter.format(ctx, value))
    }
}
