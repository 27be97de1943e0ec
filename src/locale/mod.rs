//! # Locale Module
//!
//! Localized navigation: the same route tree, reachable under translated path
//! segments in every supported locale.
//!
//! ## Overview
//!
//! - [`localize`] rewrites the literal segments of a tree once per locale,
//!   producing structurally identical copies that share node ids
//! - [`LocaleRouter`] registers those copies, tracks the active locale and
//!   re-resolves the current position when the locale changes
//! - [`SegmentTranslator`] is the boundary to the host's text-lookup service;
//!   [`TranslationTable`] is an in-memory implementation
//!
//! Matching semantics are the same in every locale: only the literal strings
//! being compared change.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use navroute::locale::{LocaleConfig, LocaleRouter, TranslationTable};
//! use navroute::tree::{build_tree, RouteDecl};
//!
//! let tree = build_tree(&[RouteDecl::view("home", "Home")]).unwrap();
//! let mut table = TranslationTable::new();
//! table.insert("fr", "home", "accueil");
//!
//! let config = LocaleConfig {
//!     locales: vec!["en".into(), "fr".into()],
//!     ..LocaleConfig::default()
//! };
//! let router = LocaleRouter::new(&tree, Arc::new(table), config).unwrap();
//!
//! let en = router.resolve("home").unwrap();
//! let fr = router.switch_locale("fr", Some(&en.route)).unwrap().unwrap();
//! assert_eq!(fr.url, "accueil");
//! assert_eq!(fr.route.route, en.route.route);
//! ```

mod rewriter;
mod router;
mod translator;

pub use rewriter::localize;
pub use router::{LocaleConfig, LocaleRouter, LocalizedMatch};
pub use translator::{IdentityTranslator, SegmentTranslator, TranslationTable, DEFAULT_KEY_PREFIX};
