//! # CLI Module
//!
//! Command-line inspection of a composed navigation system.
//!
//! ## Commands
//!
//! ### `resolve`
//!
//! Navigate to a URL and print the matched view, parameters and breadcrumb
//! trail:
//!
//! ```bash
//! navroute resolve v2/subject/42/cred/7
//! navroute --translations i18n.yaml --locale fr resolve v2/sujet/42
//! ```
//!
//! ### `dump`
//!
//! Print the composed tree, one node per line:
//!
//! ```bash
//! navroute --routes routes.yaml --mount admin dump
//! ```
//!
//! ### `check`
//!
//! Validate a route file and its localized trees without resolving anything:
//!
//! ```bash
//! navroute --routes routes.yaml --translations i18n.yaml check
//! ```
//!
//! Without `--routes`, the built-in `v2` feature module is used.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use navroute::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
