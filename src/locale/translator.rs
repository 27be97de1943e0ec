//! Segment translation: the text-lookup boundary used by localization.

use std::collections::BTreeMap;

/// Key prefix under which route segments live in translation tables.
pub const DEFAULT_KEY_PREFIX: &str = "ROUTES.";

/// Resolves a literal path segment to its text in a locale.
///
/// Implementations wrap whatever text-lookup service the shell uses. Returning
/// `None` keeps the original segment.
pub trait SegmentTranslator: Send + Sync {
    fn translate(&self, locale: &str, segment: &str) -> Option<String>;
}

/// In-memory translation table: `locale -> key -> text`.
///
/// Keys are the segment prefixed with [`DEFAULT_KEY_PREFIX`] (configurable),
/// so `home` is looked up as `ROUTES.home`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    prefix: String,
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            entries: BTreeMap::new(),
        }
    }
}

impl TranslationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `locale -> key -> text` map using the default prefix.
    #[must_use]
    pub fn from_entries(entries: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Use a different key prefix (may be empty).
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Add the translation of `segment` for `locale`.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        segment: &str,
        text: impl Into<String>,
    ) -> &mut Self {
        let key = format!("{}{}", self.prefix, segment);
        self.entries
            .entry(locale.into())
            .or_default()
            .insert(key, text.into());
        self
    }

    /// Locales that have at least one entry.
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl SegmentTranslator for TranslationTable {
    fn translate(&self, locale: &str, segment: &str) -> Option<String> {
        let key = format!("{}{}", self.prefix, segment);
        self.entries.get(locale)?.get(&key).cloned()
    }
}

/// Translator that never translates; every locale keeps the declared segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl SegmentTranslator for IdentityTranslator {
    fn translate(&self, _locale: &str, _segment: &str) -> Option<String> {
        None
    }
}
