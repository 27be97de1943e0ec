//! Route declarations: the serializable input to [`build_tree`](super::build_tree).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key holding the breadcrumb translation key.
pub const BREADCRUMB_KEY: &str = "breadcrumb";

/// Per-route metadata (`data` in route files).
pub type Metadata = BTreeMap<String, Value>;

/// Whether trailing segments may remain after a node's own path is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The node's path must consume everything that remains (`full`)
    #[serde(alias = "full")]
    Exact,
    /// Remaining segments are handed to children
    #[default]
    Prefix,
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Exact => write!(f, "full"),
            MatchPolicy::Prefix => write!(f, "prefix"),
        }
    }
}

/// Declarative description of one route, as authored in a route table or file.
///
/// Field names follow the familiar front-end router vocabulary
/// (`redirectTo`, `pathMatch`, `data`, `component`), so existing tables can
/// be loaded unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RouteDecl {
    /// One or more `/`-separated segments; empty for an index route
    #[serde(default)]
    pub path: String,
    /// View rendered when this route terminates a match
    #[serde(default, alias = "component", skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Redirect target; relative to the parent scope unless it starts with `/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// Match policy; defaults to `prefix`
    #[serde(default, alias = "matchPolicy", skip_serializing_if = "Option::is_none")]
    pub path_match: Option<MatchPolicy>,
    /// Route metadata, e.g. `{ breadcrumb: "dashboard.breadcrumb" }`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: Metadata,
    /// Child routes scoped under this path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDecl>,
}

impl RouteDecl {
    /// A route rendering `view` at `path`.
    pub fn view(path: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            view: Some(view.into()),
            ..Default::default()
        }
    }

    /// A route redirecting `path` to `to`.
    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirect_to: Some(to.into()),
            ..Default::default()
        }
    }

    /// A componentless route grouping `children` under `path`.
    pub fn branch(path: impl Into<String>, children: Vec<RouteDecl>) -> Self {
        Self {
            path: path.into(),
            children,
            ..Default::default()
        }
    }

    /// Require the full remaining path to be consumed (`pathMatch: full`).
    #[must_use]
    pub fn exact(mut self) -> Self {
        self.path_match = Some(MatchPolicy::Exact);
        self
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attach a breadcrumb translation key.
    #[must_use]
    pub fn with_breadcrumb(self, key: impl Into<String>) -> Self {
        self.with_data(BREADCRUMB_KEY, key.into())
    }

    /// Replace the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteDecl>) -> Self {
        self.children = children;
        self
    }

    /// Effective match policy.
    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.path_match.unwrap_or_default()
    }
}
