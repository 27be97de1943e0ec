//! View identifiers and the binding table that resolves them.
//!
//! Views are opaque: the route tree only knows a [`ViewId`], and the shell
//! supplies a [`ViewHandle`] for each one through [`ViewBindings`]. The table
//! is resolved once at registration time, so a missing binding is a startup
//! error rather than a navigation-time surprise.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of a renderable unit referenced by a route (e.g. `HomeComponent`).
///
/// Cloning is an atomic increment; identifiers come from the static route
/// table and are shared between every localized copy of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(Arc<str>);

impl ViewId {
    /// Create a view identifier.
    pub fn new(name: impl AsRef<str>) -> Self {
        ViewId(Arc::from(name.as_ref()))
    }

    /// Borrow the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(s: &str) -> Self {
        ViewId::new(s)
    }
}

impl From<String> for ViewId {
    fn from(s: String) -> Self {
        ViewId(Arc::from(s))
    }
}

/// A renderable unit owned by the hosting shell.
pub trait Renderable: Send + Sync + fmt::Debug {
    /// Name the shell uses to instantiate the unit.
    fn name(&self) -> &str;
}

/// Shared handle to a renderable unit.
pub type ViewHandle = Arc<dyn Renderable>;

/// Minimal [`Renderable`] that only carries a name.
///
/// Used for collaborator views whose implementation lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedView {
    name: String,
}

impl NamedView {
    /// Create a named view.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Create a shareable handle for a named view.
    pub fn handle(name: impl Into<String>) -> ViewHandle {
        Arc::new(Self::new(name))
    }
}

impl Renderable for NamedView {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Registration table mapping view identifiers to handles.
#[derive(Debug, Clone, Default)]
pub struct ViewBindings {
    bindings: HashMap<ViewId, ViewHandle>,
}

impl ViewBindings {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to `handle`, replacing any previous binding.
    pub fn bind(&mut self, id: impl Into<ViewId>, handle: ViewHandle) -> &mut Self {
        self.bindings.insert(id.into(), handle);
        self
    }

    /// Builder form of [`bind`](Self::bind).
    #[must_use]
    pub fn with(mut self, id: impl Into<ViewId>, handle: ViewHandle) -> Self {
        self.bind(id, handle);
        self
    }

    /// Bind each name to a [`NamedView`] of the same name.
    #[must_use]
    pub fn named<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut bindings = Self::new();
        for name in names {
            bindings.bind(name, NamedView::handle(name));
        }
        bindings
    }

    /// Merge `other` into this table. Bindings in `other` win.
    pub fn extend(&mut self, other: ViewBindings) {
        self.bindings.extend(other.bindings);
    }

    /// Look up the handle for `id`.
    #[must_use]
    pub fn get(&self, id: &ViewId) -> Option<ViewHandle> {
        self.bindings.get(id).map(Arc::clone)
    }

    /// Whether `id` is bound.
    #[must_use]
    pub fn contains(&self, id: &ViewId) -> bool {
        self.bindings.contains_key(id)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound identifiers in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<ViewId> {
        let mut ids: Vec<ViewId> = self.bindings.keys().cloned().collect();
        ids.sort();
        ids
    }
}
