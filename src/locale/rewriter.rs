//! Produce one localized copy of a route tree per locale.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::translator::SegmentTranslator;
use crate::error::ConfigError;
use crate::tree::RouteTree;

/// Translate every literal segment of `tree` for each locale.
///
/// The copies are structurally identical to `tree`: node ids, views,
/// metadata, match policies, parameters and wildcards are untouched. Literal
/// segments of redirect targets are translated too so redirects stay inside
/// the localized tree. A missing, empty or multi-segment translation falls
/// back to the declared segment.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateSibling`] if a translation makes two
/// siblings collide.
pub fn localize<S: AsRef<str>>(
    tree: &RouteTree,
    locales: &[S],
    translator: &dyn SegmentTranslator,
) -> Result<BTreeMap<String, RouteTree>, ConfigError> {
    let mut out = BTreeMap::new();
    for locale in locales {
        let locale = locale.as_ref();
        let rewrite = |segment: &str| -> String {
            match translator.translate(locale, segment) {
                Some(text) if !text.is_empty() && !text.contains('/') => text,
                Some(text) => {
                    warn!(
                        locale,
                        segment,
                        translation = %text,
                        "Ignoring translation that is empty or spans segments"
                    );
                    segment.to_string()
                }
                None => segment.to_string(),
            }
        };
        let localized = tree.map_literals(&rewrite)?;
        debug!(locale, routes_count = localized.len(), "Localized route tree");
        out.insert(locale.to_string(), localized);
    }
    Ok(out)
}
