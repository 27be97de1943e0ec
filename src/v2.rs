//! # The `v2` feature module
//!
//! Route table of the `v2` area, mounted under the application's navigation
//! system at [`MOUNT_PATH`]:
//!
//! | path                                  | target                    | breadcrumb             |
//! |---------------------------------------|---------------------------|------------------------|
//! | `v2`                                  | redirect to `v2/home`     |                        |
//! | `v2/home`                             | `HomeComponent`           | `dashboard.breadcrumb` |
//! | `v2/subject/:subjId`                  | `SubjectFormComponent`    | `subject.breadcrumb`   |
//! | `v2/subject/:subjId/cred/:credId`     | `CredFormComponent`       | `subject.breadcrumb`, `cred.breadcrumb` |
//!
//! The module owns the home and subject-form views. The credential-form and
//! search views belong to collaborator modules and are supplied by the caller
//! of [`register_v2`].

use std::sync::Arc;
use tracing::info;

use crate::error::{RegistrationError, UnresolvedViewError};
use crate::registrar::{register, NavigationSystem};
use crate::tree::{build_tree, RouteDecl, RouteTree};
use crate::view::{NamedView, ViewBindings, ViewId};

pub const MOUNT_PATH: &str = "v2";

pub const HOME_VIEW: &str = "HomeComponent";
pub const SUBJECT_FORM_VIEW: &str = "SubjectFormComponent";
pub const CRED_FORM_VIEW: &str = "CredFormComponent";
pub const SEARCH_VIEW: &str = "SearchComponent";

/// Views supplied by collaborator modules.
pub const COLLABORATOR_VIEWS: [&str; 2] = [CRED_FORM_VIEW, SEARCH_VIEW];

/// Route declarations, relative to [`MOUNT_PATH`].
#[must_use]
pub fn routes() -> Vec<RouteDecl> {
    vec![
        RouteDecl::redirect("", "home").exact(),
        RouteDecl::view("home", HOME_VIEW).with_breadcrumb("dashboard.breadcrumb"),
        RouteDecl::branch(
            "subject/:subjId",
            vec![
                RouteDecl::view("", SUBJECT_FORM_VIEW),
                RouteDecl::view("cred/:credId", CRED_FORM_VIEW).with_breadcrumb("cred.breadcrumb"),
            ],
        )
        .with_breadcrumb("subject.breadcrumb"),
    ]
}

/// The module's route tree, unmounted.
///
/// # Errors
///
/// Never fails for the built-in table; the `Result` mirrors [`build_tree`].
pub fn tree() -> Result<RouteTree, crate::error::ConfigError> {
    build_tree(&routes())
}

/// Bindings for the views this module owns.
#[must_use]
pub fn view_bindings() -> ViewBindings {
    ViewBindings::new()
        .with(HOME_VIEW, NamedView::handle(HOME_VIEW))
        .with(SUBJECT_FORM_VIEW, NamedView::handle(SUBJECT_FORM_VIEW))
}

/// Mount the module into `parent` at [`MOUNT_PATH`].
///
/// `collaborators` must bind [`COLLABORATOR_VIEWS`], unless `parent` already
/// does.
///
/// # Errors
///
/// [`RegistrationError::UnresolvedView`] if a collaborator view is missing,
/// [`RegistrationError::Config`] if the mount collides with a parent route.
pub fn register_v2(
    parent: &NavigationSystem,
    collaborators: ViewBindings,
) -> Result<Arc<RouteTree>, RegistrationError> {
    let bound = parent.view_ids();
    let missing: Vec<(ViewId, String)> = COLLABORATOR_VIEWS
        .iter()
        .map(|name| ViewId::from(*name))
        .filter(|id| !collaborators.contains(id) && !bound.contains(id))
        .map(|id| (id, MOUNT_PATH.to_string()))
        .collect();
    if !missing.is_empty() {
        return Err(UnresolvedViewError { missing }.into());
    }

    let mut bindings = view_bindings();
    bindings.extend(collaborators);
    let composed = register(&tree()?, bindings, parent, MOUNT_PATH)?;
    info!(mount = MOUNT_PATH, routes_count = composed.len(), "Feature module registered");
    Ok(composed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RouteKind;

    fn collaborators() -> ViewBindings {
        ViewBindings::named(COLLABORATOR_VIEWS)
    }

    fn mounted() -> (NavigationSystem, Arc<RouteTree>) {
        let system = NavigationSystem::new();
        let composed = register_v2(&system, collaborators()).unwrap();
        (system, composed)
    }

    #[test]
    fn test_base_path_redirects_home_in_one_hop() {
        let (system, tree) = mounted();
        let m = tree.resolve_default("v2").unwrap();
        assert_eq!(m.url, "v2/home");
        assert_eq!(m.redirects.len(), 1);
        assert_eq!(m.breadcrumbs, vec!["dashboard.breadcrumb"]);
        assert_eq!(system.view(&m.view).unwrap().name(), HOME_VIEW);
    }

    #[test]
    fn test_nested_credential_route() {
        let (system, tree) = mounted();
        let m = tree.resolve_default("v2/subject/42/cred/7").unwrap();
        assert_eq!(m.view, ViewId::from(CRED_FORM_VIEW));
        assert_eq!(m.breadcrumbs, vec!["subject.breadcrumb", "cred.breadcrumb"]);
        assert_eq!(m.get_path_param("subjId"), Some("42"));
        assert_eq!(m.get_path_param("credId"), Some("7"));
        assert_eq!(system.view(&m.view).unwrap().name(), CRED_FORM_VIEW);
    }

    #[test]
    fn test_subject_index_renders_form() {
        let (_, tree) = mounted();
        let m = tree.resolve_default("v2/subject/42").unwrap();
        assert_eq!(m.view, ViewId::from(SUBJECT_FORM_VIEW));
        assert_eq!(m.breadcrumbs, vec!["subject.breadcrumb"]);
    }

    #[test]
    fn test_exact_redirect_does_not_swallow_unknown_paths() {
        let (_, tree) = mounted();
        assert!(tree.resolve_default("v2/unknown").is_err());
    }

    #[test]
    fn test_missing_collaborator_rejected() {
        let system = NavigationSystem::new();
        let err = register_v2(&system, ViewBindings::named([CRED_FORM_VIEW])).unwrap_err();
        match err {
            RegistrationError::UnresolvedView(e) => {
                assert_eq!(e.missing, vec![(ViewId::from(SEARCH_VIEW), "v2".to_string())]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(system.tree().is_empty());
    }

    #[test]
    fn test_tree_shape() {
        let tree = tree().unwrap();
        assert_eq!(tree.len(), 5);
        assert!(matches!(tree.roots()[0].kind(), RouteKind::Redirect { .. }));
        assert_eq!(tree.roots()[2].children().len(), 2);
    }
}
