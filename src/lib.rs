//! # navroute
//!
//! **navroute** is a localizable client-side navigation route tree: a
//! declarative, hierarchical mapping from URL paths to views, with redirect
//! rules, nested child scopes and per-route metadata such as breadcrumb keys.
//!
//! ## Architecture
//!
//! - **[`tree`]** - Route declarations, the immutable [`RouteTree`] and the
//!   matcher that resolves URLs to a [`RouteMatch`]
//! - **[`locale`]** - Per-locale copies of a tree with translated segments,
//!   and the active-locale pointer
//! - **[`registrar`]** - Composition of feature trees into a
//!   [`NavigationSystem`] with view bindings
//! - **[`navigator`]** - Serial navigation with cancellation and fallback
//! - **[`v2`]** - The `v2` feature module's route table
//! - **[`load`]** / **[`hot_reload`]** - Route and translation files, and
//!   live remounting when they change
//! - **[`runtime_config`]** / **[`telemetry`]** - Environment configuration
//!   and `tracing` subscriber setup
//!
//! ### Navigation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Shell
//!     participant Navigator
//!     participant Locale as LocaleRouter
//!     participant Tree as RouteTree
//!     participant System as NavigationSystem
//!
//!     Shell->>Navigator: navigate("v2/subject/42/cred/7")
//!     Navigator->>Locale: resolve(url)
//!     Locale->>Tree: resolve(path, max_redirects)
//!     Tree->>Tree: Match segments, follow redirects,<br/>collect breadcrumbs
//!     Tree-->>Navigator: RouteMatch
//!     Note over Navigator: Superseded? -> Cancelled
//!     Navigator->>System: view(view_id)
//!     System-->>Navigator: ViewHandle
//!     Navigator-->>Shell: Navigation (view, params, breadcrumbs)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use navroute::registrar::NavigationSystem;
//! use navroute::view::ViewBindings;
//! use navroute::v2;
//!
//! let system = NavigationSystem::new();
//! let tree = v2::register_v2(&system, ViewBindings::named(v2::COLLABORATOR_VIEWS)).unwrap();
//!
//! let m = tree.resolve_default("v2/subject/42/cred/7").unwrap();
//! assert_eq!(m.view.as_str(), v2::CRED_FORM_VIEW);
//! assert_eq!(m.breadcrumbs, vec!["subject.breadcrumb", "cred.breadcrumb"]);
//! assert_eq!(m.get_path_param("credId"), Some("7"));
//! ```

pub mod cli;
pub mod error;
pub mod hot_reload;
pub mod load;
pub mod locale;
pub mod navigator;
pub mod registrar;
pub mod runtime_config;
pub mod telemetry;
pub mod tree;
pub mod v2;
pub mod view;

pub use error::{
    ConfigError, NavigationError, NoMatchError, RedirectLoopError, RegistrationError,
    UnresolvedViewError,
};
pub use load::{load_routes, load_translations};
pub use locale::{localize, LocaleConfig, LocaleRouter};
pub use navigator::{Navigation, NavigationOutcome, Navigator, NavigatorConfig};
pub use registrar::{register, NavigationSystem};
pub use runtime_config::RuntimeConfig;
pub use tree::{build_tree, MatchPolicy, RouteDecl, RouteId, RouteMatch, RouteTree};
pub use view::{NamedView, Renderable, ViewBindings, ViewHandle, ViewId};
