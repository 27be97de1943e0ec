//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for navigation behaviour.
//!
//! ## Environment Variables
//!
//! ### `NAVR_MAX_REDIRECTS`
//!
//! Redirect hops followed before a navigation fails with a redirect-loop
//! error. Default: `10`.
//!
//! ### `NAVR_DEFAULT_LOCALE`
//!
//! Locale active at startup. Default: `en`.
//!
//! ### `NAVR_LOCALES`
//!
//! Comma-separated supported locales. Default: the default locale only.
//!
//! ### `NAVR_LOCALE_PREFIX`
//!
//! `true`/`1` to expect the locale as the first URL segment (`/fr/v2/...`).
//! Default: `false`.
//!
//! ### `NAVR_FALLBACK_PATH`
//!
//! Path the navigator falls back to when a URL does not match or redirects
//! loop. Unset by default: failed navigations keep the previous state.
//!
//! ## Usage
//!
//! ```rust
//! use navroute::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Max redirects: {}", config.max_redirects);
//! ```

use std::env;

use crate::locale::LocaleConfig;
use crate::tree::DEFAULT_MAX_REDIRECTS;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Redirect hop limit (default: 10)
    pub max_redirects: usize,
    /// Locale active at startup (default: `en`)
    pub default_locale: String,
    /// Supported locales; always contains the default locale
    pub locales: Vec<String>,
    /// Whether URLs carry a locale prefix (default: false)
    pub locale_prefix: bool,
    /// Fallback path for unmatched or looping navigations
    pub fallback_path: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            default_locale: "en".to_string(),
            locales: vec!["en".to_string()],
            locale_prefix: false,
            fallback_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_redirects = lookup("NAVR_MAX_REDIRECTS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_REDIRECTS);
        let default_locale = lookup("NAVR_DEFAULT_LOCALE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "en".to_string());
        let mut locales: Vec<String> = lookup("NAVR_LOCALES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if !locales.contains(&default_locale) {
            locales.insert(0, default_locale.clone());
        }
        let locale_prefix = lookup("NAVR_LOCALE_PREFIX")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let fallback_path = lookup("NAVR_FALLBACK_PATH")
            .map(|v| v.trim().trim_matches('/').to_string())
            .filter(|v| !v.is_empty());

        RuntimeConfig {
            max_redirects,
            default_locale,
            locales,
            locale_prefix,
            fallback_path,
        }
    }

    /// Locale routing settings derived from this configuration.
    #[must_use]
    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig {
            locales: self.locales.clone(),
            default_locale: self.default_locale.clone(),
            prefix_urls: self.locale_prefix,
            max_redirects: self.max_redirects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[]));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_parses_all_variables() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("NAVR_MAX_REDIRECTS", "3"),
            ("NAVR_DEFAULT_LOCALE", "fr"),
            ("NAVR_LOCALES", "en, fr ,de"),
            ("NAVR_LOCALE_PREFIX", "TRUE"),
            ("NAVR_FALLBACK_PATH", "/not-found/"),
        ]));
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.default_locale, "fr");
        assert_eq!(config.locales, vec!["en", "fr", "de"]);
        assert!(config.locale_prefix);
        assert_eq!(config.fallback_path.as_deref(), Some("not-found"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("NAVR_MAX_REDIRECTS", "many"),
            ("NAVR_LOCALES", "de"),
            ("NAVR_FALLBACK_PATH", "/"),
        ]));
        assert_eq!(config.max_redirects, DEFAULT_MAX_REDIRECTS);
        assert_eq!(config.locales, vec!["en", "de"]);
        assert_eq!(config.fallback_path, None);
    }

    #[test]
    fn test_locale_config_mirrors_runtime() {
        let config = RuntimeConfig {
            locale_prefix: true,
            ..RuntimeConfig::default()
        };
        let locale = config.locale_config();
        assert!(locale.prefix_urls);
        assert_eq!(locale.default_locale, "en");
    }
}
