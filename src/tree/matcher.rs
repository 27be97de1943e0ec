//! Path matching and redirect resolution over a [`RouteTree`].
//!
//! Matching walks the tree depth-first. At each level candidates are tried in
//! four groups, each in declaration order:
//!
//! 1. siblings whose first segment is a literal equal to the current segment
//! 2. siblings whose first segment is a parameter
//! 3. empty-path siblings (index and componentless routes)
//! 4. wildcard siblings
//!
//! A failing candidate is backtracked (captured parameters and chain entries
//! are dropped) before the next one is tried, so the first declared sibling
//! that leads to a terminal node wins.

use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::core::{RouteId, RouteKind, RouteNode, RouteTree};
use super::decl::{MatchPolicy, Metadata};
use super::segment::{split_url, Segment};
use crate::error::{NavigationError, NoMatchError, RedirectLoopError};
use crate::view::ViewId;

/// Maximum number of captured parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Redirect hops followed before giving up with [`RedirectLoopError`].
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Captured `(name, value)` pairs. Names are shared with the tree.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of resolving a path to a view-bearing node.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Terminal node
    pub route: RouteId,
    /// View bound to the terminal node
    pub view: ViewId,
    /// Matched nodes from the root down to the terminal node
    pub chain: SmallVec<[RouteId; 8]>,
    /// Captured path parameters in match order
    pub path_params: ParamVec,
    /// Breadcrumb keys of the matched chain, root-most first
    pub breadcrumbs: Vec<String>,
    /// Normalized URL that finally matched (after redirects)
    pub url: String,
    /// Redirect targets followed, in order
    pub redirects: Vec<String>,
    metadata: Vec<Arc<Metadata>>,
}

impl RouteMatch {
    /// Get a path parameter by name.
    ///
    /// Uses "last write wins" semantics when a name is captured at more than
    /// one depth.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path params to a HashMap. Allocates.
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Metadata value for `key` from the nearest node on the chain that declares it.
    #[must_use]
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.metadata.iter().rev().find_map(|m| m.get(key))
    }

    /// Every value declared for `key` along the chain, root-most first.
    #[must_use]
    pub fn data_trail(&self, key: &str) -> Vec<&Value> {
        self.metadata.iter().filter_map(|m| m.get(key)).collect()
    }
}

enum Terminal<'a> {
    View {
        view: &'a ViewId,
    },
    Redirect {
        to: &'a str,
        /// Index of the first segment handled by the redirect node's level
        base: usize,
        /// Index of the first segment the redirect node did not consume
        rest: usize,
    },
}

#[derive(Default)]
struct MatchState<'a> {
    chain: SmallVec<[&'a RouteNode; 8]>,
    params: ParamVec,
}

/// Consume `node`'s own segments from the front of `segs`, capturing parameters.
fn consume(node: &RouteNode, segs: &[&str], params: &mut ParamVec) -> Option<usize> {
    let mut consumed = 0;
    for segment in node.segments.iter() {
        match segment {
            Segment::Wildcard => return Some(segs.len()),
            Segment::Literal(text) => {
                if segs.get(consumed)? != &text.as_ref() {
                    return None;
                }
            }
            Segment::Param(name) => {
                let value = segs.get(consumed)?;
                params.push((Arc::clone(name), (*value).to_string()));
            }
        }
        consumed += 1;
    }
    Some(consumed)
}

fn candidate_group(node: &RouteNode, segs: &[&str]) -> Option<u8> {
    match node.segments.first() {
        Some(Segment::Literal(text)) => (segs.first() == Some(&text.as_ref())).then_some(0),
        Some(Segment::Param(_)) => (!segs.is_empty()).then_some(1),
        None => Some(2),
        Some(Segment::Wildcard) => Some(3),
    }
}

fn match_level<'a>(
    nodes: &'a [RouteNode],
    segs: &[&str],
    offset: usize,
    state: &mut MatchState<'a>,
) -> Option<Terminal<'a>> {
    for group in 0..4u8 {
        for node in nodes {
            if candidate_group(node, segs) != Some(group) {
                continue;
            }
            let mark = state.params.len();
            if let Some(terminal) = try_node(node, segs, offset, state) {
                return Some(terminal);
            }
            state.params.truncate(mark);
        }
    }
    None
}

fn try_node<'a>(
    node: &'a RouteNode,
    segs: &[&str],
    offset: usize,
    state: &mut MatchState<'a>,
) -> Option<Terminal<'a>> {
    let consumed = consume(node, segs, &mut state.params)?;
    let rest = &segs[consumed..];

    match &node.kind {
        RouteKind::Redirect { to } => {
            if node.policy == MatchPolicy::Exact && !rest.is_empty() {
                return None;
            }
            Some(Terminal::Redirect {
                to,
                base: offset,
                rest: offset + consumed,
            })
        }
        RouteKind::Leaf { view } => {
            if !rest.is_empty() {
                return None;
            }
            state.chain.push(node);
            Some(Terminal::View { view })
        }
        RouteKind::Branch { view, children } => {
            if node.policy == MatchPolicy::Exact && !rest.is_empty() {
                return None;
            }
            state.chain.push(node);
            if let Some(terminal) = match_level(children, rest, offset + consumed, state) {
                return Some(terminal);
            }
            if rest.is_empty() {
                if let Some(view) = view {
                    return Some(Terminal::View { view });
                }
            }
            state.chain.pop();
            None
        }
    }
}

/// Build the path a redirect re-dispatches to.
fn redirect_target(
    to: &str,
    segs: &[&str],
    base: usize,
    rest: usize,
    params: &ParamVec,
) -> String {
    let mut parts: Vec<&str> = if to.starts_with('/') {
        Vec::new()
    } else {
        segs[..base].to_vec()
    };
    for part in to.split('/').filter(|s| !s.is_empty()) {
        let resolved = part
            .strip_prefix(':')
            .and_then(|name| params.iter().rfind(|(k, _)| k.as_ref() == name))
            .map_or(part, |(_, v)| v.as_str());
        parts.push(resolved);
    }
    parts.extend_from_slice(&segs[rest..]);
    parts.join("/")
}

impl RouteTree {
    /// Resolve `path` to a view-bearing node, following redirects.
    ///
    /// # Errors
    ///
    /// * [`NavigationError::NoMatch`] when no node matches
    /// * [`NavigationError::RedirectLoop`] after more than `max_redirects` hops
    pub fn resolve(&self, path: &str, max_redirects: usize) -> Result<RouteMatch, NavigationError> {
        let start = Instant::now();
        let original = split_url(path).join("/");
        let mut url = original.clone();
        let mut hops: Vec<String> = Vec::new();

        loop {
            let segs: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();
            let mut state = MatchState::default();

            match match_level(&self.roots, &segs, 0, &mut state) {
                None => {
                    warn!(
                        path = %original,
                        resolved = %url,
                        redirects = hops.len(),
                        "No route matched"
                    );
                    return Err(NoMatchError { path: url }.into());
                }
                Some(Terminal::Redirect { to, base, rest }) => {
                    if hops.len() >= max_redirects {
                        warn!(
                            path = %original,
                            limit = max_redirects,
                            hops = ?hops,
                            "Redirect limit exceeded"
                        );
                        return Err(RedirectLoopError {
                            path: original,
                            hops,
                            limit: max_redirects,
                        }
                        .into());
                    }
                    let next = redirect_target(to, &segs, base, rest, &state.params);
                    debug!(from = %url, to = %next, "Following redirect");
                    hops.push(next.clone());
                    url = next;
                }
                Some(Terminal::View { view }) => {
                    let elapsed = start.elapsed();
                    let breadcrumbs: Vec<String> = state
                        .chain
                        .iter()
                        .filter_map(|n| n.breadcrumb().map(str::to_string))
                        .collect();
                    let route = state.chain.last().map(|n| n.id).unwrap_or(RouteId(0));

                    if elapsed > Duration::from_millis(1) {
                        warn!(
                            path = %original,
                            route_id = route.0,
                            view = %view,
                            duration_us = elapsed.as_micros(),
                            "Slow route matching detected"
                        );
                    } else {
                        info!(
                            path = %original,
                            resolved = %url,
                            route_id = route.0,
                            view = %view,
                            path_params = ?state.params,
                            breadcrumbs = ?breadcrumbs,
                            duration_us = elapsed.as_micros(),
                            "Route matched"
                        );
                    }

                    return Ok(RouteMatch {
                        route,
                        view: view.clone(),
                        chain: state.chain.iter().map(|n| n.id).collect(),
                        metadata: state
                            .chain
                            .iter()
                            .map(|n| Arc::clone(&n.metadata))
                            .collect(),
                        path_params: state.params,
                        breadcrumbs,
                        url,
                        redirects: hops,
                    });
                }
            }
        }
    }

    /// Resolve with the default redirect limit.
    pub fn resolve_default(&self, path: &str) -> Result<RouteMatch, NavigationError> {
        self.resolve(path, DEFAULT_MAX_REDIRECTS)
    }
}
