//! Registered per-locale trees and the active-locale pointer.

use arc_swap::ArcSwap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::rewriter::localize;
use super::translator::SegmentTranslator;
use crate::error::{ConfigError, NavigationError};
use crate::tree::{split_url, RouteId, RouteMatch, RouteTree, DEFAULT_MAX_REDIRECTS};

/// Locale routing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Supported locale codes, e.g. `["en", "fr"]`
    pub locales: Vec<String>,
    /// Locale active at startup; added to `locales` if missing
    pub default_locale: String,
    /// Whether URLs carry the locale as their first segment (`/fr/v2/accueil`)
    pub prefix_urls: bool,
    /// Redirect hop limit used when resolving
    pub max_redirects: usize,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string()],
            default_locale: "en".to_string(),
            prefix_urls: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// A match together with the locale tree it was resolved in.
#[derive(Debug, Clone)]
pub struct LocalizedMatch {
    /// Locale whose tree produced the match
    pub locale: String,
    /// The underlying match (its `url` is relative to the locale tree)
    pub route: RouteMatch,
    /// Public URL, including the locale prefix when URLs are prefixed
    pub url: String,
}

#[derive(Debug)]
struct ActiveLocale {
    locale: String,
    tree: Arc<RouteTree>,
}

/// Holds one tree per locale and the currently active one.
///
/// The active pointer is an [`ArcSwap`]: a locale switch is a single atomic
/// store, so readers see either the old tree or the new one, never a mix.
pub struct LocaleRouter {
    trees: ArcSwap<BTreeMap<String, Arc<RouteTree>>>,
    translator: Arc<dyn SegmentTranslator>,
    config: LocaleConfig,
    active: ArcSwap<ActiveLocale>,
}

impl std::fmt::Debug for LocaleRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleRouter")
            .field("config", &self.config)
            .field("active", &self.active_locale())
            .finish()
    }
}

fn localized_trees(
    tree: &RouteTree,
    translator: &dyn SegmentTranslator,
    locales: &[String],
) -> Result<BTreeMap<String, Arc<RouteTree>>, ConfigError> {
    Ok(localize(tree, locales, translator)?
        .into_iter()
        .map(|(locale, tree)| (locale, Arc::new(tree)))
        .collect())
}

impl LocaleRouter {
    /// Localize `tree` for every configured locale and register the copies.
    pub fn new(
        tree: &RouteTree,
        translator: Arc<dyn SegmentTranslator>,
        mut config: LocaleConfig,
    ) -> Result<Self, ConfigError> {
        if !config.locales.contains(&config.default_locale) {
            config.locales.push(config.default_locale.clone());
        }
        let trees = localized_trees(tree, translator.as_ref(), &config.locales)?;
        let default_tree = trees
            .get(&config.default_locale)
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::new(tree.clone()));

        info!(
            locales = ?config.locales,
            default_locale = %config.default_locale,
            prefix_urls = config.prefix_urls,
            "Locale route trees registered"
        );

        Ok(Self {
            trees: ArcSwap::from_pointee(trees),
            active: ArcSwap::from_pointee(ActiveLocale {
                locale: config.default_locale.clone(),
                tree: default_tree,
            }),
            translator,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &LocaleConfig {
        &self.config
    }

    /// Registered locale codes in sorted order.
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        self.trees.load().keys().cloned().collect()
    }

    #[must_use]
    pub fn active_locale(&self) -> String {
        self.active.load().locale.clone()
    }

    #[must_use]
    pub fn active_tree(&self) -> Arc<RouteTree> {
        Arc::clone(&self.active.load().tree)
    }

    #[must_use]
    pub fn tree_for(&self, locale: &str) -> Option<Arc<RouteTree>> {
        self.trees.load().get(locale).map(Arc::clone)
    }

    /// Pick the startup locale from a preference list (e.g. browser languages).
    ///
    /// `fr-CA` matches a registered `fr`. Falls back to the default locale.
    #[must_use]
    pub fn detect<S: AsRef<str>>(&self, preferred: &[S]) -> String {
        let trees = self.trees.load();
        for candidate in preferred {
            let candidate = candidate.as_ref();
            if trees.contains_key(candidate) {
                return candidate.to_string();
            }
            if let Some((lang, _)) = candidate.split_once(['-', '_']) {
                if trees.contains_key(lang) {
                    return lang.to_string();
                }
            }
        }
        self.config.default_locale.clone()
    }

    /// Split a leading locale segment off `url` when URLs are prefixed.
    #[must_use]
    pub fn split_locale(&self, url: &str) -> (Option<String>, String) {
        let segments = split_url(url);
        if self.config.prefix_urls {
            if let Some(first) = segments.first() {
                if self.trees.load().contains_key(*first) {
                    return (Some((*first).to_string()), segments[1..].join("/"));
                }
            }
        }
        (None, segments.join("/"))
    }

    fn public_url(&self, locale: &str, path: &str) -> String {
        match (self.config.prefix_urls, path.is_empty()) {
            (false, _) => path.to_string(),
            (true, true) => locale.to_string(),
            (true, false) => format!("{locale}/{path}"),
        }
    }

    /// Resolve `url` in the locale tree it names, or in the active tree.
    ///
    /// A locale prefix selects that locale's tree for this resolution only;
    /// use [`switch_locale`](Self::switch_locale) to change the active tree.
    pub fn resolve(&self, url: &str) -> Result<LocalizedMatch, NavigationError> {
        let (prefixed, path) = self.split_locale(url);
        let (locale, tree) = match prefixed {
            Some(locale) => {
                let tree = self
                    .tree_for(&locale)
                    .ok_or_else(|| NavigationError::UnknownLocale {
                        locale: locale.clone(),
                    })?;
                (locale, tree)
            }
            None => {
                let active = self.active.load();
                (active.locale.clone(), Arc::clone(&active.tree))
            }
        };
        let route = tree.resolve(&path, self.config.max_redirects)?;
        Ok(LocalizedMatch {
            url: self.public_url(&locale, &route.url),
            locale,
            route,
        })
    }

    /// Public URL of the logical position `id` with `params` in `locale`.
    #[must_use]
    pub fn localized_url(
        &self,
        locale: &str,
        id: RouteId,
        params: &[(Arc<str>, String)],
    ) -> Option<String> {
        let path = self.tree_for(locale)?.path_for(id, params)?;
        Some(self.public_url(locale, &path))
    }

    /// Re-resolve `current` in `locale`'s tree by logical position.
    ///
    /// The position is carried over by node id and captured parameters, not by
    /// literal URL, so `v2/home` in `en` becomes `v2/accueil` in `fr`. A
    /// wildcard keeps the segments it captured. Nothing is switched.
    ///
    /// # Errors
    ///
    /// [`NavigationError::UnknownLocale`] for an unregistered locale,
    /// [`NavigationError::PositionLost`] if the route has no path in the target
    /// tree or its path matches a different route there.
    pub fn relocate(&self, locale: &str, current: &RouteMatch) -> Result<LocalizedMatch, NavigationError> {
        let tree = self.require_tree(locale)?;
        let lost = |actual: Option<RouteId>| NavigationError::PositionLost {
            locale: locale.to_string(),
            expected: current.route,
            actual,
        };
        let path = tree.path_for_match(current).ok_or_else(|| lost(None))?;
        let route = tree.resolve(&path, self.config.max_redirects)?;
        if route.route != current.route {
            warn!(
                locale,
                expected = %current.route,
                actual = %route.route,
                path = %path,
                "Locale switch would change route"
            );
            return Err(lost(Some(route.route)));
        }
        Ok(LocalizedMatch {
            url: self.public_url(locale, &route.url),
            locale: locale.to_string(),
            route,
        })
    }

    /// Make `locale` the active tree.
    pub fn activate(&self, locale: &str) -> Result<(), NavigationError> {
        let tree = self.require_tree(locale)?;
        let previous = self.active_locale();
        self.active.store(Arc::new(ActiveLocale {
            locale: locale.to_string(),
            tree,
        }));
        info!(from = %previous, to = %locale, "Active locale switched");
        Ok(())
    }

    /// Make `locale` active, re-resolving `current` by logical position.
    ///
    /// The switch is all-or-nothing: if the position cannot be carried over
    /// (see [`relocate`](Self::relocate)) the active locale is left unchanged.
    pub fn switch_locale(
        &self,
        locale: &str,
        current: Option<&RouteMatch>,
    ) -> Result<Option<LocalizedMatch>, NavigationError> {
        let relocated = match current {
            Some(current) => Some(self.relocate(locale, current)?),
            None => None,
        };
        self.activate(locale)?;
        Ok(relocated)
    }

    fn require_tree(&self, locale: &str) -> Result<Arc<RouteTree>, NavigationError> {
        self.tree_for(locale)
            .ok_or_else(|| NavigationError::UnknownLocale {
                locale: locale.to_string(),
            })
    }

    /// Re-localize after the base tree was recomposed, keeping the active locale.
    pub fn rebuild(&self, tree: &RouteTree) -> Result<(), ConfigError> {
        let trees = localized_trees(tree, self.translator.as_ref(), &self.config.locales)?;
        let locale = self.active_locale();
        let active_tree = trees
            .get(&locale)
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::new(tree.clone()));
        self.trees.store(Arc::new(trees));
        self.active.store(Arc::new(ActiveLocale {
            locale,
            tree: active_tree,
        }));
        info!(routes_count = tree.len(), "Locale route trees rebuilt");
        Ok(())
    }
}
