//! Route tree construction and structural queries.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, info};

use super::decl::{MatchPolicy, Metadata, RouteDecl, BREADCRUMB_KEY};
use super::matcher::RouteMatch;
use super::segment::{normalized_key, parse_path, split_url, Segment, SegmentVec};
use crate::error::ConfigError;
use crate::view::ViewId;

/// Logical identity of a node, assigned in depth-first pre-order.
///
/// Structurally identical trees (e.g. localized copies) share ids, which is
/// how a position survives a locale switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub u32);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node does when it terminates a match.
#[derive(Debug, Clone)]
pub enum RouteKind {
    /// Re-dispatch to another path
    Redirect {
        /// Target as declared (relative unless it starts with `/`)
        to: Arc<str>,
    },
    /// Render a view; no children
    Leaf {
        /// View to render
        view: ViewId,
    },
    /// Scope children under this path, optionally rendering a view itself
    Branch {
        /// View rendered when no child consumes an empty remainder
        view: Option<ViewId>,
        /// Child nodes in declaration order
        children: Vec<RouteNode>,
    },
}

/// One validated node of a [`RouteTree`].
#[derive(Debug, Clone)]
pub struct RouteNode {
    pub(crate) id: RouteId,
    pub(crate) path: Arc<str>,
    pub(crate) segments: SegmentVec,
    pub(crate) policy: MatchPolicy,
    pub(crate) metadata: Arc<Metadata>,
    pub(crate) kind: RouteKind,
}

impl RouteNode {
    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Declared path (translated in localized trees).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn kind(&self) -> &RouteKind {
        &self.kind
    }

    /// Breadcrumb translation key, if this node carries one.
    #[must_use]
    pub fn breadcrumb(&self) -> Option<&str> {
        self.metadata.get(BREADCRUMB_KEY).and_then(|v| v.as_str())
    }

    /// View bound to this node, if any.
    #[must_use]
    pub fn view(&self) -> Option<&ViewId> {
        match &self.kind {
            RouteKind::Leaf { view } => Some(view),
            RouteKind::Branch { view, .. } => view.as_ref(),
            RouteKind::Redirect { .. } => None,
        }
    }

    /// Redirect target, if this node is a redirect.
    #[must_use]
    pub fn redirect_to(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Redirect { to } => Some(to),
            _ => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[RouteNode] {
        match &self.kind {
            RouteKind::Branch { children, .. } => children,
            _ => &[],
        }
    }

    fn to_decl(&self) -> RouteDecl {
        let (view, redirect_to, children) = match &self.kind {
            RouteKind::Redirect { to } => (None, Some(to.to_string()), Vec::new()),
            RouteKind::Leaf { view } => (Some(view.to_string()), None, Vec::new()),
            RouteKind::Branch { view, children } => (
                view.as_ref().map(ViewId::to_string),
                None,
                children.iter().map(RouteNode::to_decl).collect(),
            ),
        };
        RouteDecl {
            path: self.path.to_string(),
            view,
            redirect_to,
            path_match: Some(self.policy),
            data: (*self.metadata).clone(),
            children,
        }
    }
}

/// Immutable, validated forest of routes for one feature area.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    pub(crate) roots: Vec<RouteNode>,
    pub(crate) len: usize,
}

/// Build and validate a tree from declarations.
///
/// Validation happens here, never at navigation time: duplicate siblings,
/// redirects that also declare a view or children, empty routes and
/// malformed segments are all rejected with [`ConfigError`].
pub fn build_tree(decls: &[RouteDecl]) -> Result<RouteTree, ConfigError> {
    let mut next_id = 0u32;
    let roots = build_level(decls, "", &mut next_id)?;
    let tree = RouteTree {
        roots,
        len: next_id as usize,
    };
    info!(
        routes_count = tree.len,
        top_level = tree.roots.len(),
        "Route tree built"
    );
    Ok(tree)
}

fn build_level(
    decls: &[RouteDecl],
    parent: &str,
    next_id: &mut u32,
) -> Result<Vec<RouteNode>, ConfigError> {
    let mut seen: HashSet<(String, MatchPolicy)> = HashSet::with_capacity(decls.len());
    let mut nodes = Vec::with_capacity(decls.len());

    for decl in decls {
        let segments = parse_path(&decl.path)?;
        let policy = decl.policy();
        let key = normalized_key(&segments);
        if !seen.insert((key.clone(), policy)) {
            return Err(ConfigError::DuplicateSibling {
                parent: parent.to_string(),
                path: key,
                policy,
            });
        }

        let id = RouteId(*next_id);
        *next_id += 1;

        let full_path = join_path(parent, decl.path.trim_matches('/'));
        let kind = match (&decl.redirect_to, &decl.view, decl.children.is_empty()) {
            (Some(_), Some(_), _) => {
                return Err(ConfigError::RedirectWithView {
                    path: full_path,
                })
            }
            (Some(_), None, false) => {
                return Err(ConfigError::RedirectWithChildren {
                    path: full_path,
                })
            }
            (Some(to), None, true) => RouteKind::Redirect {
                to: Arc::from(to.as_str()),
            },
            (None, Some(view), true) => RouteKind::Leaf {
                view: ViewId::new(view),
            },
            (None, view, false) => RouteKind::Branch {
                view: view.as_deref().map(ViewId::new),
                children: build_level(&decl.children, &full_path, next_id)?,
            },
            (None, None, true) => return Err(ConfigError::EmptyRoute { path: full_path }),
        };

        debug!(
            route_id = id.0,
            path = %full_path,
            policy = %policy,
            "Route node validated"
        );

        nodes.push(RouteNode {
            id,
            path: Arc::from(decl.path.trim_matches('/')),
            segments,
            policy,
            metadata: Arc::new(decl.data.clone()),
            kind,
        });
    }

    Ok(nodes)
}

fn join_path(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{parent}/{child}"),
    }
}

impl RouteTree {
    /// Build a tree; shorthand for [`build_tree`].
    pub fn build(decls: &[RouteDecl]) -> Result<Self, ConfigError> {
        build_tree(decls)
    }

    /// Top-level nodes in declaration order.
    #[must_use]
    pub fn roots(&self) -> &[RouteNode] {
        &self.roots
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, id: RouteId) -> Option<&RouteNode> {
        self.chain(id).and_then(|chain| chain.last().copied())
    }

    /// Nodes from the root down to `id`, inclusive.
    #[must_use]
    pub fn chain(&self, id: RouteId) -> Option<SmallVec<[&RouteNode; 8]>> {
        fn find<'a>(
            nodes: &'a [RouteNode],
            id: RouteId,
            chain: &mut SmallVec<[&'a RouteNode; 8]>,
        ) -> bool {
            for node in nodes {
                chain.push(node);
                if node.id == id || find(node.children(), id, chain) {
                    return true;
                }
                chain.pop();
            }
            false
        }

        let mut chain = SmallVec::new();
        find(&self.roots, id, &mut chain).then_some(chain)
    }

    /// Pre-order traversal yielding each node with its depth.
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, &RouteNode)> {
        fn visit<'a>(nodes: &'a [RouteNode], depth: usize, out: &mut Vec<(usize, &'a RouteNode)>) {
            for node in nodes {
                out.push((depth, node));
                visit(node.children(), depth + 1, out);
            }
        }

        let mut out = Vec::with_capacity(self.len);
        visit(&self.roots, 0, &mut out);
        out
    }

    /// Full declared path of `id` with parameters left as `:name`.
    #[must_use]
    pub fn full_path(&self, id: RouteId) -> Option<String> {
        let chain = self.chain(id)?;
        Some(
            chain
                .iter()
                .filter(|n| !n.path.is_empty())
                .map(|n| n.path.as_ref())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    /// Concrete URL reaching `id`, substituting captured `params`.
    ///
    /// Returns `None` when the node is unknown, a parameter has no value, or
    /// the chain contains a wildcard (which has no canonical expansion).
    #[must_use]
    pub fn path_for(&self, id: RouteId, params: &[(Arc<str>, String)]) -> Option<String> {
        self.expand(id, params, None)
    }

    /// Concrete URL reaching the position `matched` holds, in this tree.
    ///
    /// Like [`path_for`](Self::path_for), but a wildcard expands to the
    /// segments it captured in `matched.url`. `matched` may come from a
    /// structurally identical tree, e.g. another locale's copy.
    #[must_use]
    pub fn path_for_match(&self, matched: &RouteMatch) -> Option<String> {
        self.expand(matched.route, &matched.path_params, Some(&matched.url))
    }

    fn expand(
        &self,
        id: RouteId,
        params: &[(Arc<str>, String)],
        matched_url: Option<&str>,
    ) -> Option<String> {
        let chain = self.chain(id)?;
        let mut parts: Vec<String> = Vec::new();
        for node in chain {
            for segment in node.segments.iter() {
                match segment {
                    Segment::Literal(s) => parts.push(s.to_string()),
                    Segment::Param(name) => {
                        let value = params.iter().rfind(|(k, _)| k == name)?;
                        parts.push(value.1.clone());
                    }
                    Segment::Wildcard => {
                        // Every segment before the wildcard consumed exactly one URL segment.
                        let consumed = parts.len();
                        let tail = split_url(matched_url?);
                        parts.extend(tail.into_iter().skip(consumed).map(str::to_string));
                        return Some(parts.join("/"));
                    }
                }
            }
        }
        Some(parts.join("/"))
    }

    /// Every view referenced by the tree, each paired with the first route path using it.
    #[must_use]
    pub fn view_ids(&self) -> Vec<(ViewId, String)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (_, node) in self.walk() {
            if let Some(view) = node.view() {
                if seen.insert(view.clone()) {
                    out.push((view.clone(), self.full_path(node.id).unwrap_or_default()));
                }
            }
        }
        out
    }

    /// Convert back to declarations, e.g. to mount the tree elsewhere.
    #[must_use]
    pub fn to_decls(&self) -> Vec<RouteDecl> {
        self.roots.iter().map(RouteNode::to_decl).collect()
    }

    /// Rebuild the tree with every literal segment passed through `rewrite`,
    /// keeping ids, views, metadata and structure. Used for localization.
    pub(crate) fn map_literals<F>(&self, rewrite: &F) -> Result<RouteTree, ConfigError>
    where
        F: Fn(&str) -> String,
    {
        fn map_level<F: Fn(&str) -> String>(
            nodes: &[RouteNode],
            parent: &str,
            rewrite: &F,
        ) -> Result<Vec<RouteNode>, ConfigError> {
            let mut seen = HashSet::with_capacity(nodes.len());
            let mut out = Vec::with_capacity(nodes.len());
            for node in nodes {
                let segments: SegmentVec = node
                    .segments
                    .iter()
                    .map(|s| match s {
                        Segment::Literal(text) => Segment::Literal(Arc::from(rewrite(text))),
                        other => other.clone(),
                    })
                    .collect();
                let key = normalized_key(&segments);
                if !seen.insert((key.clone(), node.policy)) {
                    return Err(ConfigError::DuplicateSibling {
                        parent: parent.to_string(),
                        path: key,
                        policy: node.policy,
                    });
                }
                let path = segments
                    .iter()
                    .map(Segment::declared)
                    .collect::<Vec<_>>()
                    .join("/");
                let kind = match &node.kind {
                    RouteKind::Redirect { to } => RouteKind::Redirect {
                        to: Arc::from(rewrite_target(to, rewrite)),
                    },
                    RouteKind::Leaf { view } => RouteKind::Leaf { view: view.clone() },
                    RouteKind::Branch { view, children } => RouteKind::Branch {
                        view: view.clone(),
                        children: map_level(children, &join_path(parent, &path), rewrite)?,
                    },
                };
                out.push(RouteNode {
                    id: node.id,
                    path: Arc::from(path.as_str()),
                    segments,
                    policy: node.policy,
                    metadata: Arc::clone(&node.metadata),
                    kind,
                });
            }
            Ok(out)
        }

        Ok(RouteTree {
            roots: map_level(&self.roots, "", rewrite)?,
            len: self.len,
        })
    }

    /// Render the tree as an indented listing, one node per line.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (depth, node) in self.walk() {
            let shown = if node.path.is_empty() { "''" } else { node.path() };
            let target = match &node.kind {
                RouteKind::Redirect { to } => format!("-> redirect '{to}'"),
                RouteKind::Leaf { view } => format!("-> {view}"),
                RouteKind::Branch { view: Some(v), .. } => format!("-> {v} (branch)"),
                RouteKind::Branch { view: None, .. } => "(branch)".to_string(),
            };
            let crumb = node
                .breadcrumb()
                .map(|b| format!(" [breadcrumb={b}]"))
                .unwrap_or_default();
            out.push_str(&format!(
                "{:indent$}{} {} {}{}{}\n",
                "",
                node.id,
                shown,
                target,
                if node.policy == MatchPolicy::Exact { " (full)" } else { "" },
                crumb,
                indent = depth * 2
            ));
        }
        out
    }
}

/// Apply `rewrite` to the literal segments of a redirect target, keeping a
/// leading `/` and any `:param` references.
fn rewrite_target<F: Fn(&str) -> String>(to: &str, rewrite: &F) -> String {
    let absolute = to.starts_with('/');
    let body = to
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with(':') || s == "**" {
                s.to_string()
            } else {
                rewrite(s)
            }
        })
        .collect::<Vec<_>>()
        .join("/");
    if absolute {
        format!("/{body}")
    } else {
        body
    }
}
