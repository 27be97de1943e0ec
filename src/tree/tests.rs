use super::*;
use crate::error::{ConfigError, NavigationError};
use crate::view::ViewId;

fn subject_tree() -> RouteTree {
    build_tree(&[RouteDecl::branch(
        "v2",
        vec![
            RouteDecl::redirect("", "home").exact(),
            RouteDecl::view("home", "Home").with_breadcrumb("dashboard.breadcrumb"),
            RouteDecl::branch(
                "subject/:subjId",
                vec![
                    RouteDecl::view("", "SubjectForm"),
                    RouteDecl::view("cred/:credId", "CredForm").with_breadcrumb("cred.breadcrumb"),
                ],
            )
            .with_breadcrumb("subject.breadcrumb"),
        ],
    )])
    .unwrap()
}

#[test]
fn test_ids_assigned_in_preorder() {
    let tree = subject_tree();
    let ids: Vec<(usize, u32)> = tree.walk().iter().map(|(d, n)| (*d, n.id().0)).collect();
    assert_eq!(ids, vec![(0, 0), (1, 1), (1, 2), (1, 3), (2, 4), (2, 5)]);
    assert_eq!(tree.len(), 6);
}

#[test]
fn test_redirect_one_hop() {
    let tree = subject_tree();
    let m = tree.resolve_default("v2").unwrap();
    assert_eq!(m.redirects, vec!["v2/home".to_string()]);
    assert_eq!(m.view, ViewId::from("Home"));
    assert_eq!(m.breadcrumbs, vec!["dashboard.breadcrumb"]);
}

#[test]
fn test_nested_params_and_trail() {
    let tree = subject_tree();
    let m = tree.resolve_default("/v2/subject/42/cred/7").unwrap();
    assert_eq!(m.view, ViewId::from("CredForm"));
    assert_eq!(m.get_path_param("subjId"), Some("42"));
    assert_eq!(m.get_path_param("credId"), Some("7"));
    assert_eq!(m.breadcrumbs, vec!["subject.breadcrumb", "cred.breadcrumb"]);
    assert_eq!(m.chain.as_slice(), &[RouteId(0), RouteId(3), RouteId(5)]);
}

#[test]
fn test_index_child_of_parameterized_branch() {
    let tree = subject_tree();
    let m = tree.resolve_default("v2/subject/9").unwrap();
    assert_eq!(m.view, ViewId::from("SubjectForm"));
    assert_eq!(m.breadcrumbs, vec!["subject.breadcrumb"]);
}

#[test]
fn test_exact_redirect_ignores_longer_paths() {
    let tree = subject_tree();
    let err = tree.resolve_default("v2/unknown").unwrap_err();
    assert!(matches!(err, NavigationError::NoMatch(ref e) if e.path == "v2/unknown"));
}

#[test]
fn test_leaf_rejects_trailing_segments() {
    let tree = subject_tree();
    assert!(tree.resolve_default("v2/home/extra").is_err());
}

#[test]
fn test_literal_beats_earlier_param() {
    let tree = build_tree(&[
        RouteDecl::view(":id", "ById"),
        RouteDecl::view("new", "New"),
    ])
    .unwrap();
    assert_eq!(tree.resolve_default("new").unwrap().view, ViewId::from("New"));
    assert_eq!(tree.resolve_default("12").unwrap().view, ViewId::from("ById"));
}

#[test]
fn test_first_declared_sibling_wins() {
    let tree = build_tree(&[
        RouteDecl::view("a", "Prefixed"),
        RouteDecl::view("a", "Exact").exact(),
    ])
    .unwrap();
    assert_eq!(tree.resolve_default("a").unwrap().view, ViewId::from("Prefixed"));
}

#[test]
fn test_backtracks_into_next_candidate() {
    let tree = build_tree(&[
        RouteDecl::branch("users", vec![RouteDecl::view("list", "List")]),
        RouteDecl::view("users/:id", "User"),
    ])
    .unwrap();
    let m = tree.resolve_default("users/5").unwrap();
    assert_eq!(m.view, ViewId::from("User"));
    assert_eq!(m.get_path_param("id"), Some("5"));
}

#[test]
fn test_failed_candidate_params_are_dropped() {
    let tree = build_tree(&[
        RouteDecl::branch(":org", vec![RouteDecl::view("settings", "OrgSettings")]),
        RouteDecl::branch(":team", vec![RouteDecl::view("members", "Members")]),
    ]);
    // Two parameter siblings at the same position collide.
    assert!(matches!(tree, Err(ConfigError::DuplicateSibling { .. })));

    let tree = build_tree(&[
        RouteDecl::branch(":org", vec![RouteDecl::view("settings", "OrgSettings")]),
        RouteDecl::view("**", "NotFound"),
    ])
    .unwrap();
    let m = tree.resolve_default("acme/other").unwrap();
    assert_eq!(m.view, ViewId::from("NotFound"));
    assert!(m.path_params.is_empty());
}

#[test]
fn test_wildcard_is_tried_last() {
    let tree = build_tree(&[
        RouteDecl::view("**", "NotFound"),
        RouteDecl::view("home", "Home"),
    ])
    .unwrap();
    assert_eq!(tree.resolve_default("home").unwrap().view, ViewId::from("Home"));
    assert_eq!(
        tree.resolve_default("x/y/z").unwrap().view,
        ViewId::from("NotFound")
    );
}

#[test]
fn test_prefix_redirect_appends_remainder() {
    let tree = build_tree(&[
        RouteDecl::redirect("old", "new"),
        RouteDecl::branch("new", vec![RouteDecl::view("page/:n", "Page")]),
    ])
    .unwrap();
    let m = tree.resolve_default("old/page/3").unwrap();
    assert_eq!(m.url, "new/page/3");
    assert_eq!(m.get_path_param("n"), Some("3"));
}

#[test]
fn test_redirect_substitutes_params_and_absolute_targets() {
    let tree = build_tree(&[
        RouteDecl::branch(
            "legacy",
            vec![RouteDecl::redirect("subject/:id", "/v2/subject/:id").exact()],
        ),
        RouteDecl::view("v2/subject/:id", "Subject"),
    ])
    .unwrap();
    let m = tree.resolve_default("legacy/subject/77").unwrap();
    assert_eq!(m.url, "v2/subject/77");
    assert_eq!(m.get_path_param("id"), Some("77"));
}

#[test]
fn test_redirect_loop_is_bounded() {
    let tree = build_tree(&[
        RouteDecl::redirect("a", "b").exact(),
        RouteDecl::redirect("b", "a").exact(),
    ])
    .unwrap();
    match tree.resolve("a", 4) {
        Err(NavigationError::RedirectLoop(e)) => {
            assert_eq!(e.limit, 4);
            assert_eq!(e.hops, vec!["b", "a", "b", "a"]);
            assert_eq!(e.path, "a");
        }
        other => panic!("expected redirect loop, got {other:?}"),
    }
}

#[test]
fn test_branch_with_view_terminates_when_no_child_matches_empty() {
    let tree = build_tree(&[RouteDecl::view("docs", "DocsShell")
        .with_children(vec![RouteDecl::view(":page", "DocPage")])])
    .unwrap();
    assert_eq!(tree.resolve_default("docs").unwrap().view, ViewId::from("DocsShell"));
    assert_eq!(tree.resolve_default("docs/intro").unwrap().view, ViewId::from("DocPage"));
}

#[test]
fn test_metadata_nearest_wins_and_trail_keeps_ancestors() {
    let tree = build_tree(&[RouteDecl::branch(
        "a",
        vec![RouteDecl::view("b", "B").with_data("title", "child")],
    )
    .with_data("title", "parent")])
    .unwrap();
    let m = tree.resolve_default("a/b").unwrap();
    assert_eq!(m.data("title").and_then(|v| v.as_str()), Some("child"));
    let trail: Vec<&str> = m.data_trail("title").iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(trail, vec!["parent", "child"]);
}

#[test]
fn test_reject_duplicate_literal_siblings() {
    let err = build_tree(&[RouteDecl::view("home", "A"), RouteDecl::view("home", "B")]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::DuplicateSibling {
            parent: String::new(),
            path: "home".to_string(),
            policy: MatchPolicy::Prefix,
        }
    );
}

#[test]
fn test_reject_redirect_with_view() {
    let mut decl = RouteDecl::redirect("", "home");
    decl.view = Some("Home".to_string());
    let err = build_tree(&[RouteDecl::branch("v2", vec![decl])]).unwrap_err();
    assert_eq!(err, ConfigError::RedirectWithView { path: "v2".to_string() });
}

#[test]
fn test_reject_redirect_with_children() {
    let decl = RouteDecl::redirect("x", "y").with_children(vec![RouteDecl::view("z", "Z")]);
    assert!(matches!(
        build_tree(&[decl]),
        Err(ConfigError::RedirectWithChildren { .. })
    ));
}

#[test]
fn test_reject_empty_route() {
    assert!(matches!(
        build_tree(&[RouteDecl::default()]),
        Err(ConfigError::EmptyRoute { .. })
    ));
}

#[test]
fn test_path_for_round_trips_logical_position() {
    let tree = subject_tree();
    let m = tree.resolve_default("v2/subject/42/cred/7").unwrap();
    assert_eq!(
        tree.path_for(m.route, &m.path_params).as_deref(),
        Some("v2/subject/42/cred/7")
    );
    assert_eq!(tree.full_path(m.route).as_deref(), Some("v2/subject/:subjId/cred/:credId"));
}

#[test]
fn test_path_for_match_expands_wildcard_tail() {
    let tree = build_tree(&[
        RouteDecl::branch("docs/:lang", vec![RouteDecl::view("**", "Docs")]),
        RouteDecl::view("**", "NotFound"),
    ])
    .unwrap();
    let m = tree.resolve_default("docs/en/guide/intro").unwrap();
    assert_eq!(m.view, ViewId::from("Docs"));
    assert_eq!(tree.path_for(m.route, &m.path_params), None);
    assert_eq!(
        tree.path_for_match(&m).as_deref(),
        Some("docs/en/guide/intro")
    );
}

#[test]
fn test_every_leaf_matches_its_declared_path() {
    let tree = subject_tree();
    for (_, node) in tree.walk() {
        if let RouteKind::Leaf { view } = node.kind() {
            let params: ParamVec = tree
                .chain(node.id())
                .unwrap()
                .iter()
                .flat_map(|n| n.segments().iter())
                .filter_map(|s| match s {
                    Segment::Param(name) => Some((name.clone(), "1".to_string())),
                    _ => None,
                })
                .collect();
            let url = tree.path_for(node.id(), &params).unwrap();
            let m = tree.resolve_default(&url).unwrap();
            assert_eq!(m.route, node.id(), "url {url}");
            assert_eq!(&m.view, view);
        }
    }
}

#[test]
fn test_to_decls_rebuilds_equivalent_tree() {
    let tree = subject_tree();
    let rebuilt = build_tree(&tree.to_decls()).unwrap();
    assert_eq!(rebuilt.dump(), tree.dump());
}

#[test]
fn test_view_ids_deduplicated() {
    let tree = build_tree(&[
        RouteDecl::view("a", "Shared"),
        RouteDecl::view("b", "Shared"),
        RouteDecl::view("c", "Other"),
    ])
    .unwrap();
    let views: Vec<String> = tree.view_ids().into_iter().map(|(v, _)| v.to_string()).collect();
    assert_eq!(views, vec!["Shared", "Other"]);
}
