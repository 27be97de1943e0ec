//! # Route Tree Module
//!
//! The route tree is the declarative heart of navroute: an ordered forest of
//! nodes mapping path segments to views, redirects and nested children, with
//! per-route metadata such as breadcrumb keys.
//!
//! ## Overview
//!
//! The module is responsible for:
//! - Parsing and validating route declarations ([`RouteDecl`]) into an
//!   immutable [`RouteTree`]
//! - Matching incoming paths against the tree and capturing parameters
//! - Following redirects with a bounded hop count
//! - Accumulating metadata (the breadcrumb trail) along the matched branch
//!
//! ## Two phases
//!
//! 1. **Construction**: [`build_tree`] validates sibling uniqueness,
//!    redirect exclusivity and segment syntax, assigning each node a stable
//!    [`RouteId`]. Errors here are fatal.
//!
//! 2. **Resolution**: [`RouteTree::resolve`] walks the tree for a URL and
//!    returns a [`RouteMatch`] or a recoverable navigation error.
//!
//! ## Example
//!
//! ```rust
//! use navroute::tree::{build_tree, RouteDecl};
//!
//! let tree = build_tree(&[RouteDecl::branch(
//!     "v2",
//!     vec![
//!         RouteDecl::redirect("", "home").exact(),
//!         RouteDecl::view("home", "HomeComponent").with_breadcrumb("dashboard.breadcrumb"),
//!     ],
//! )])
//! .unwrap();
//!
//! let m = tree.resolve_default("/v2").unwrap();
//! assert_eq!(m.url, "v2/home");
//! assert_eq!(m.breadcrumbs, vec!["dashboard.breadcrumb"]);
//! ```

mod core;
mod decl;
mod matcher;
mod segment;
#[cfg(test)]
mod tests;

pub use core::{build_tree, RouteId, RouteKind, RouteNode, RouteTree};
pub use decl::{MatchPolicy, Metadata, RouteDecl, BREADCRUMB_KEY};
pub use matcher::{ParamVec, RouteMatch, DEFAULT_MAX_REDIRECTS, MAX_INLINE_PARAMS};
pub use segment::{parse_path, split_url, Segment};
