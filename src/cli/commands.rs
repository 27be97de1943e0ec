use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::load::{load_routes, load_translations};
use crate::locale::{IdentityTranslator, LocaleRouter, SegmentTranslator};
use crate::navigator::{NavigationOutcome, Navigator, NavigatorConfig};
use crate::registrar::{register, NavigationSystem};
use crate::runtime_config::RuntimeConfig;
use crate::tree::{build_tree, RouteTree};
use crate::v2;
use crate::view::ViewBindings;

/// Command-line interface for navroute
#[derive(Parser, Debug)]
#[command(name = "navroute")]
#[command(about = "Inspect and resolve localizable navigation route trees", long_about = None)]
pub struct Cli {
    /// Route file to mount (YAML, JSON or TOML); defaults to the built-in v2 module
    #[arg(short, long, global = true)]
    pub routes: Option<PathBuf>,

    /// Mount path for `--routes`
    #[arg(short, long, global = true, default_value = "")]
    pub mount: String,

    /// Translation file (`locale -> key -> text`)
    #[arg(short, long, global = true)]
    pub translations: Option<PathBuf>,

    /// Locale to activate before running the command
    #[arg(short, long, global = true, env = "NAVR_LOCALE")]
    pub locale: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Navigate to a URL and print the result
    Resolve {
        /// URL to navigate to, e.g. `v2/subject/42`
        url: String,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the composed route tree
    Dump,
    /// Validate routes, view bindings and localized trees
    Check,
}

struct Session {
    system: Arc<NavigationSystem>,
    locales: Option<Arc<LocaleRouter>>,
}

impl Session {
    fn active_tree(&self) -> Arc<RouteTree> {
        match &self.locales {
            Some(locales) => locales.active_tree(),
            None => self.system.tree(),
        }
    }
}

fn build_session(cli: &Cli, config: &RuntimeConfig) -> Result<Session> {
    let system = Arc::new(NavigationSystem::new());
    match &cli.routes {
        Some(path) => {
            let tree = build_tree(&load_routes(path)?)
                .with_context(|| format!("invalid route tree in {}", path.display()))?;
            // No real components behind the CLI: every referenced view binds to a named placeholder.
            let names = tree.view_ids();
            let bindings = ViewBindings::named(names.iter().map(|(view, _)| view.as_str()));
            register(&tree, bindings, &system, &cli.mount)?;
        }
        None => {
            v2::register_v2(&system, ViewBindings::named(v2::COLLABORATOR_VIEWS))?;
        }
    }

    if cli.translations.is_none() && cli.locale.is_none() {
        return Ok(Session {
            system,
            locales: None,
        });
    }

    let mut locale_config = config.locale_config();
    let translator: Arc<dyn SegmentTranslator> = match &cli.translations {
        Some(path) => {
            let table = load_translations(path)?;
            for locale in table.locales() {
                if !locale_config.locales.contains(&locale) {
                    locale_config.locales.push(locale);
                }
            }
            Arc::new(table)
        }
        None => Arc::new(IdentityTranslator),
    };
    if let Some(locale) = &cli.locale {
        if !locale_config.locales.contains(locale) {
            locale_config.locales.push(locale.clone());
        }
    }

    let locales = LocaleRouter::new(&system.tree(), translator, locale_config)?;
    if let Some(locale) = &cli.locale {
        locales.switch_locale(locale, None)?;
    }
    Ok(Session {
        system,
        locales: Some(Arc::new(locales)),
    })
}

/// Run `cli` against `config`, writing command output to `out`.
pub fn execute<W: Write>(cli: &Cli, config: &RuntimeConfig, out: &mut W) -> Result<()> {
    let session = build_session(cli, config)?;

    match &cli.command {
        Commands::Resolve { url, json } => {
            let mut navigator = Navigator::new(Arc::clone(&session.system), NavigatorConfig::from(config));
            if let Some(locales) = &session.locales {
                navigator = navigator.with_locales(Arc::clone(locales));
            }
            let outcome = navigator.navigate(url)?;
            let Some(nav) = outcome.navigation() else {
                anyhow::bail!("navigation to {url} was cancelled");
            };
            let fallback = match &outcome {
                NavigationOutcome::Fallback { error, .. } => Some(error.to_string()),
                _ => None,
            };
            if *json {
                let value = json!({
                    "url": nav.url,
                    "locale": nav.locale,
                    "route": nav.route.route.0,
                    "view": nav.view.name(),
                    "params": nav.route.path_params_map(),
                    "breadcrumbs": nav.route.breadcrumbs,
                    "redirects": nav.route.redirects,
                    "fallback": fallback,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            } else {
                if let Some(reason) = &fallback {
                    writeln!(out, "fallback:    {reason}")?;
                }
                writeln!(out, "url:         {}", nav.url)?;
                if let Some(locale) = &nav.locale {
                    writeln!(out, "locale:      {locale}")?;
                }
                writeln!(out, "view:        {}", nav.view.name())?;
                for (name, value) in &nav.route.path_params {
                    writeln!(out, "param:       {name}={value}")?;
                }
                writeln!(out, "breadcrumbs: {}", nav.route.breadcrumbs.join(" > "))?;
                for hop in &nav.route.redirects {
                    writeln!(out, "redirect:    {hop}")?;
                }
            }
        }
        Commands::Dump => {
            write!(out, "{}", session.active_tree().dump())?;
        }
        Commands::Check => {
            let tree = session.system.tree();
            let locales = session
                .locales
                .as_ref()
                .map(|l| l.locales())
                .unwrap_or_default();
            writeln!(
                out,
                "OK: {} routes, {} views bound, mounts {:?}, locales {:?}",
                tree.len(),
                session.system.view_ids().len(),
                session.system.mounts(),
                locales
            )?;
        }
    }
    Ok(())
}

/// Run the parsed CLI, printing to stdout.
pub fn run_cli(cli: Cli) -> Result<()> {
    let config = RuntimeConfig::from_env();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &config, &mut out)
}
