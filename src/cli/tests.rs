//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use crate::runtime_config::RuntimeConfig;
use clap::Parser;
use std::io::Write;

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    execute(&cli, &RuntimeConfig::default(), &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_resolve_command_parses() {
    let cli = Cli::try_parse_from(["navroute", "resolve", "v2/home", "--json"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Resolve {
            url: "v2/home".to_string(),
            json: true
        }
    );
    assert!(cli.routes.is_none());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["navroute", "dump", "--mount", "admin", "-v"]).unwrap();
    assert_eq!(cli.mount, "admin");
    assert!(cli.verbose);
}

#[test]
fn test_resolve_builtin_module() {
    let out = run(&["navroute", "resolve", "v2/subject/42/cred/7"]).unwrap();
    assert!(out.contains("view:        CredFormComponent"));
    assert!(out.contains("param:       subjId=42"));
    assert!(out.contains("breadcrumbs: subject.breadcrumb > cred.breadcrumb"));
}

#[test]
fn test_resolve_json_reports_redirect() {
    let out = run(&["navroute", "resolve", "v2", "--json"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["url"], "v2/home");
    assert_eq!(value["view"], "HomeComponent");
    assert_eq!(value["redirects"].as_array().unwrap().len(), 1);
}

#[test]
fn test_resolve_unknown_fails() {
    assert!(run(&["navroute", "resolve", "nowhere"]).is_err());
}

#[test]
fn test_dump_and_check() {
    let dump = run(&["navroute", "dump"]).unwrap();
    assert!(dump.contains("subject/:subjId"));
    let check = run(&["navroute", "check"]).unwrap();
    assert!(check.starts_with("OK: 6 routes"));
}

#[test]
fn test_routes_and_translations_files() {
    let dir = tempfile::tempdir().unwrap();
    let routes = dir.path().join("routes.yaml");
    std::fs::File::create(&routes)
        .unwrap()
        .write_all(b"- path: home\n  component: Home\n")
        .unwrap();
    let translations = dir.path().join("i18n.json");
    std::fs::write(&translations, r#"{"fr": {"ROUTES.home": "accueil"}}"#).unwrap();

    let out = run(&[
        "navroute",
        "--routes",
        routes.to_str().unwrap(),
        "--mount",
        "app",
        "--translations",
        translations.to_str().unwrap(),
        "--locale",
        "fr",
        "resolve",
        "app/accueil",
    ])
    .unwrap();
    assert!(out.contains("url:         app/accueil"));
    assert!(out.contains("locale:      fr"));
}
