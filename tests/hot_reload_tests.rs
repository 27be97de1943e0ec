use navroute::hot_reload::{reload_routes, watch_routes};
use navroute::registrar::NavigationSystem;
use navroute::view::ViewBindings;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod common;
use common::temp_files;

const ROUTES_V1: &str = "- path: home\n  component: Home\n";
const ROUTES_V2: &str = "- path: start\n  component: Home\n- path: home\n  redirectTo: start\n";

fn system() -> Arc<NavigationSystem> {
    Arc::new(NavigationSystem::with_routes(Vec::new(), ViewBindings::named(["Home"])).unwrap())
}

#[test]
fn test_reload_remounts() {
    let file = temp_files::create_temp_yaml(ROUTES_V1);
    let path = file.path();
    let system = system();
    assert!(reload_routes(&path, &system, "app").is_some());
    assert!(system.tree().resolve_default("app/home").is_ok());

    std::fs::write(&path, ROUTES_V2).unwrap();
    let tree = reload_routes(&path, &system, "app").unwrap();
    assert_eq!(tree.resolve_default("app/home").unwrap().url, "app/start");
    assert_eq!(system.mounts(), vec!["app".to_string()]);
}

#[test]
fn test_invalid_file_keeps_previous_tree() {
    let file = temp_files::create_temp_yaml(ROUTES_V1);
    let path = file.path();
    let system = system();
    reload_routes(&path, &system, "app").unwrap();
    let before = system.tree();

    std::fs::write(&path, "- path: [not, a, string]\n").unwrap();
    assert!(reload_routes(&path, &system, "app").is_none());
    // Unbound view
    std::fs::write(&path, "- path: home\n  component: Missing\n").unwrap();
    assert!(reload_routes(&path, &system, "app").is_none());
    // Duplicate siblings
    std::fs::write(&path, "- path: a\n  component: Home\n- path: a\n  component: Home\n").unwrap();
    assert!(reload_routes(&path, &system, "app").is_none());

    assert!(Arc::ptr_eq(&before, &system.tree()));
}

#[test]
fn test_watch_routes_reload() {
    let file = temp_files::create_temp_yaml(ROUTES_V1);
    let path = file.path();
    let system = system();
    reload_routes(&path, &system, "app").unwrap();

    let updates: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let updates_clone = Arc::clone(&updates);
    let watcher = watch_routes(&path, Arc::clone(&system), "app", move |tree| {
        updates_clone.lock().unwrap().push(tree.len());
    })
    .expect("watch_routes");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(&path, ROUTES_V2).unwrap();

    for _ in 0..40 {
        if system.tree().resolve_default("app/start").is_ok() {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    assert!(system.tree().resolve_default("app/start").is_ok());
    assert!(!updates.lock().unwrap().is_empty());

    drop(watcher);
}
