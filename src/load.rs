//! Route and translation file loading.
//!
//! The format is chosen by extension: `.yaml`/`.yml`, `.json` or `.toml`.
//! A route file is either a bare list of declarations or a table with a
//! `routes` key (TOML has no top-level arrays, so it always uses the table):
//!
//! ```yaml
//! - path: ''
//!   redirectTo: home
//!   pathMatch: full
//! - path: home
//!   component: HomeComponent
//!   data: { breadcrumb: dashboard.breadcrumb }
//! ```
//!
//! A translation file maps `locale -> key -> text`, with keys carrying the
//! `ROUTES.` prefix:
//!
//! ```yaml
//! fr:
//!   ROUTES.home: accueil
//! ```

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::locale::TranslationTable;
use crate::tree::RouteDecl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => bail!(
                "unsupported file extension for {} (expected .yaml, .yml, .json or .toml)",
                path.display()
            ),
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        Ok(match self {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
            Format::Toml => toml::from_str(content)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RouteFile {
    List(Vec<RouteDecl>),
    Table { routes: Vec<RouteDecl> },
}

/// Parse route declarations from `content` in the format implied by `path`.
pub fn parse_routes(path: &Path, content: &str) -> Result<Vec<RouteDecl>> {
    let file: RouteFile = Format::of(path)?
        .parse(content)
        .with_context(|| format!("invalid route declarations in {}", path.display()))?;
    Ok(match file {
        RouteFile::List(routes) | RouteFile::Table { routes } => routes,
    })
}

/// Load route declarations from a file.
pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<RouteDecl>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    parse_routes(path, &content)
}

/// Load a `locale -> key -> text` translation table from a file.
pub fn load_translations(path: impl AsRef<Path>) -> Result<TranslationTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read translation file {}", path.display()))?;
    let entries: BTreeMap<String, BTreeMap<String, String>> = Format::of(path)?
        .parse(&content)
        .with_context(|| format!("invalid translations in {}", path.display()))?;
    Ok(TranslationTable::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MatchPolicy;

    #[test]
    fn test_yaml_list() {
        let routes = parse_routes(
            Path::new("routes.yml"),
            "- path: ''\n  redirectTo: home\n  pathMatch: full\n- path: home\n  component: Home\n",
        )
        .unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].policy(), MatchPolicy::Exact);
        assert_eq!(routes[1].view.as_deref(), Some("Home"));
    }

    #[test]
    fn test_json_table() {
        let routes = parse_routes(
            Path::new("routes.json"),
            r#"{"routes": [{"path": "home", "view": "Home", "data": {"breadcrumb": "b"}}]}"#,
        )
        .unwrap();
        assert_eq!(routes[0].data["breadcrumb"], "b");
    }

    #[test]
    fn test_toml_table() {
        let routes = parse_routes(
            Path::new("routes.toml"),
            "[[routes]]\npath = \"home\"\nview = \"Home\"\n",
        )
        .unwrap();
        assert_eq!(routes[0].path, "home");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_routes(Path::new("r.json"), r#"[{"path": "a", "bogus": 1}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_routes(Path::new("routes.ini"), "").unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }
}
