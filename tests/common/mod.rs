#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Creates a temporary file with the given extension; it is removed on drop.
    pub fn create_temp_file(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("navroute_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_file(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> NamedTempFile {
        create_temp_file(content, "json")
    }

    pub fn create_temp_toml(content: &str) -> NamedTempFile {
        create_temp_file(content, "toml")
    }
}

pub mod fixtures {
    use navroute::registrar::NavigationSystem;
    use navroute::tree::RouteDecl;
    use navroute::v2;
    use navroute::view::ViewBindings;
    use std::sync::Arc;

    /// A system with a `not-found` page and the `v2` module mounted.
    pub fn v2_system() -> Arc<NavigationSystem> {
        let system = NavigationSystem::with_routes(
            vec![RouteDecl::view("not-found", "NotFoundComponent")],
            ViewBindings::named(["NotFoundComponent"]),
        )
        .unwrap();
        v2::register_v2(&system, ViewBindings::named(v2::COLLABORATOR_VIEWS)).unwrap();
        Arc::new(system)
    }
}
