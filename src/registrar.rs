//! # Composition Registrar
//!
//! Merges feature-area route trees into the application's navigation system.
//!
//! ## Overview
//!
//! A [`NavigationSystem`] owns the root declarations of the application, the
//! trees mounted into it and the [`ViewBindings`] that satisfy every view
//! they reference. [`register`] is the single entry point a feature module
//! calls at bootstrap:
//!
//! 1. every view referenced by the feature tree must be bound, either by the
//!    bindings passed in or by the system already; otherwise registration
//!    fails with [`UnresolvedViewError`]
//! 2. the tree is mounted under a path; if the system already declares a
//!    node at exactly that path, the mounted routes become its children so
//!    the parent's metadata stays at the front of every breadcrumb trail
//!    (an exact-match host becomes prefix-matching so the mount is reachable)
//! 3. the whole tree is recomposed, validated and swapped in atomically
//!
//! ## Recomposition
//!
//! Trees are immutable. Any change (a new mount, a remount from hot reload)
//! rebuilds the composed tree from declarations and replaces it with one
//! pointer store. Readers holding the previous `Arc<RouteTree>` keep a
//! consistent view until they drop it.

use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::error::{RegistrationError, UnresolvedViewError};
use crate::tree::{build_tree, MatchPolicy, RouteDecl, RouteTree};
use crate::view::{ViewBindings, ViewHandle, ViewId};

#[derive(Debug, Clone)]
struct Mount {
    path: String,
    decls: Vec<RouteDecl>,
}

#[derive(Debug, Default)]
struct Composition {
    roots: Vec<RouteDecl>,
    mounts: Vec<Mount>,
    bindings: ViewBindings,
}

/// Declarations of the composed tree: roots first, then mounts in registration order.
fn compose(roots: &[RouteDecl], mounts: &[Mount]) -> Vec<RouteDecl> {
    let mut decls = roots.to_vec();
    for mount in mounts {
        if mount.path.is_empty() {
            decls.extend(mount.decls.iter().cloned());
            continue;
        }
        let host = decls
            .iter()
            .position(|d| d.path.trim_matches('/') == mount.path && d.redirect_to.is_none());
        match host {
            Some(i) => {
                let host = &mut decls[i];
                // An exact host would never hand remaining segments to the mounted routes.
                if host.policy() == MatchPolicy::Exact {
                    debug!(mount = %mount.path, "Mount host switched to prefix matching");
                    host.path_match = Some(MatchPolicy::Prefix);
                }
                host.children.extend(mount.decls.iter().cloned());
            }
            None => decls.push(RouteDecl::branch(mount.path.clone(), mount.decls.clone())),
        }
    }
    decls
}

/// The application's navigation system: composed route tree plus view bindings.
#[derive(Debug)]
pub struct NavigationSystem {
    composition: Mutex<Composition>,
    tree: ArcSwap<RouteTree>,
}

impl Default for NavigationSystem {
    fn default() -> Self {
        Self {
            composition: Mutex::new(Composition::default()),
            tree: ArcSwap::from_pointee(RouteTree::default()),
        }
    }
}

impl NavigationSystem {
    /// An empty system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A system with application-level root routes (e.g. a `**` not-found page).
    ///
    /// # Errors
    ///
    /// Fails if the declarations are malformed or reference unbound views.
    pub fn with_routes(roots: Vec<RouteDecl>, bindings: ViewBindings) -> Result<Self, RegistrationError> {
        let tree = build_tree(&roots)?;
        check_views(&tree, &bindings, None)?;
        Ok(Self {
            composition: Mutex::new(Composition {
                roots,
                mounts: Vec::new(),
                bindings,
            }),
            tree: ArcSwap::from_pointee(tree),
        })
    }

    /// Current composed tree.
    #[must_use]
    pub fn tree(&self) -> Arc<RouteTree> {
        self.tree.load_full()
    }

    /// Handle bound to `id`.
    #[must_use]
    pub fn view(&self, id: &ViewId) -> Option<ViewHandle> {
        self.lock().bindings.get(id)
    }

    /// Bound view identifiers.
    #[must_use]
    pub fn view_ids(&self) -> Vec<ViewId> {
        self.lock().bindings.ids()
    }

    /// Normalized paths of the current mounts, in registration order.
    #[must_use]
    pub fn mounts(&self) -> Vec<String> {
        self.lock().mounts.iter().map(|m| m.path.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Composition> {
        self.composition
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mount `tree` at `mount_path`, replacing any previous mount at that path.
    ///
    /// Bindings are merged only if the recomposed tree validates; on error the
    /// system is left exactly as it was.
    pub fn remount(
        &self,
        mount_path: &str,
        tree: &RouteTree,
        bindings: ViewBindings,
    ) -> Result<Arc<RouteTree>, RegistrationError> {
        let mount_path = mount_path.trim_matches('/').to_string();
        let mut composition = self.lock();

        check_views(tree, &bindings, Some(&composition.bindings))?;

        let mut mounts = composition.mounts.clone();
        let decls = tree.to_decls();
        match mounts.iter_mut().find(|m| m.path == mount_path) {
            Some(existing) => {
                debug!(mount = %mount_path, "Replacing existing mount");
                existing.decls = decls;
            }
            None => mounts.push(Mount {
                path: mount_path.clone(),
                decls,
            }),
        }

        let composed = Arc::new(build_tree(&compose(&composition.roots, &mounts))?);
        composition.mounts = mounts;
        composition.bindings.extend(bindings);
        self.tree.store(Arc::clone(&composed));

        info!(
            mount = %mount_path,
            routes_count = composed.len(),
            views = composition.bindings.len(),
            "Route tree registered"
        );
        Ok(composed)
    }
}

fn check_views(
    tree: &RouteTree,
    bindings: &ViewBindings,
    existing: Option<&ViewBindings>,
) -> Result<(), UnresolvedViewError> {
    let missing: Vec<(ViewId, String)> = tree
        .view_ids()
        .into_iter()
        .filter(|(view, _)| {
            !bindings.contains(view) && !existing.is_some_and(|b| b.contains(view))
        })
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    warn!(missing = ?missing, "Unresolved view bindings");
    Err(UnresolvedViewError { missing })
}

/// Register `tree` into `parent` under `mount_path`.
///
/// `bindings` declares which renderable units satisfy the views `tree`
/// references; bindings the parent already holds count as well. Returns the
/// newly composed tree.
///
/// # Errors
///
/// * [`RegistrationError::UnresolvedView`] if a referenced view has no binding
/// * [`RegistrationError::Config`] if the composed tree is malformed
pub fn register(
    tree: &RouteTree,
    bindings: ViewBindings,
    parent: &NavigationSystem,
    mount_path: &str,
) -> Result<Arc<RouteTree>, RegistrationError> {
    parent.remount(mount_path, tree, bindings)
}
