//! # Hot Reload Module
//!
//! Live reloading of a mounted route file without restarting the shell.
//!
//! ## Overview
//!
//! [`watch_routes`] watches a route file (see [`crate::load`]) and, on every
//! modification:
//!
//! 1. **Parse** - the file is reloaded and the declarations built into a tree
//! 2. **Remount** - the tree replaces the previous mount at the same path,
//!    using the view bindings the system already holds
//! 3. **Hook** - the callback receives the newly composed tree, e.g. to
//!    rebuild locale trees with [`crate::locale::LocaleRouter::rebuild`]
//!
//! ## Error Handling
//!
//! If the file fails to parse, the declarations are malformed or a view is
//! unbound, the error is logged and the previous tree stays active.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use navroute::hot_reload::watch_routes;
//! use navroute::registrar::NavigationSystem;
//! use std::sync::Arc;
//!
//! let system = Arc::new(NavigationSystem::new());
//! let _watcher = watch_routes("routes/v2.yaml", Arc::clone(&system), "v2", |tree| {
//!     println!("Reloaded {} routes", tree.len());
//! })?;
//! # Ok::<(), notify::Error>(())
//! ```

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::load::load_routes;
use crate::registrar::NavigationSystem;
use crate::tree::{build_tree, RouteTree};
use crate::view::ViewBindings;

/// Reload `path` and remount it into `system` at `mount_path`.
///
/// Returns the composed tree, or `None` if the previous tree was kept.
pub fn reload_routes(path: &Path, system: &NavigationSystem, mount_path: &str) -> Option<Arc<RouteTree>> {
    let decls = match load_routes(path) {
        Ok(decls) => decls,
        Err(e) => {
            let error = format!("{e:#}");
            warn!(path = %path.display(), error = %error, "hot-reload: keeping previous routes");
            return None;
        }
    };
    let tree = match build_tree(&decls) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "hot-reload: keeping previous routes");
            return None;
        }
    };
    match system.remount(mount_path, &tree, ViewBindings::new()) {
        Ok(composed) => {
            info!(
                path = %path.display(),
                mount = mount_path,
                routes_count = composed.len(),
                "hot-reload: applying route updates"
            );
            Some(composed)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "hot-reload: keeping previous routes");
            None
        }
    }
}

/// Watch a route file and remount it into `system` when it changes.
///
/// The callback runs after each successful remount. The returned watcher
/// must be kept alive for as long as reloading should happen.
pub fn watch_routes<P, F>(
    routes_path: P,
    system: Arc<NavigationSystem>,
    mount_path: &str,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&Arc<RouteTree>) + Send + 'static,
{
    let path: PathBuf = routes_path.as_ref().to_path_buf();
    let watch_path = path.clone();
    let mount_path = mount_path.to_string();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    if let Some(composed) = reload_routes(&watch_path, &system, &mount_path) {
                        on_reload(&composed);
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
