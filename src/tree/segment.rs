//! Path segment parsing.
//!
//! A declared path such as `subject/:subjId` is split on `/` into segments
//! that are either literal text, a named parameter (`:name`) or the
//! wildcard `**`, which swallows everything that remains.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::error::ConfigError;

#[allow(clippy::expect_used)]
static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid param name regex"));

/// Most declared paths have ≤4 segments.
pub type SegmentVec = SmallVec<[Segment; 4]>;

/// One parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches the exact text
    Literal(Arc<str>),
    /// Matches any single segment and captures it under the given name
    Param(Arc<str>),
    /// Matches all remaining segments (`**`)
    Wildcard,
}

impl Segment {
    /// Key used for sibling-uniqueness checks: every parameter normalizes to `:`.
    #[must_use]
    pub fn normalized(&self) -> &str {
        match self {
            Segment::Literal(s) => s,
            Segment::Param(_) => ":",
            Segment::Wildcard => "**",
        }
    }

    /// Render the segment back to its declared form.
    #[must_use]
    pub fn declared(&self) -> String {
        match self {
            Segment::Literal(s) => s.to_string(),
            Segment::Param(name) => format!(":{name}"),
            Segment::Wildcard => "**".to_string(),
        }
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

/// Parse a declared route path into segments.
///
/// Leading and trailing slashes are ignored; an empty path yields no
/// segments (index route). Interior empty segments, malformed parameter
/// names and a non-terminal `**` are rejected.
pub fn parse_path(path: &str) -> Result<SegmentVec, ConfigError> {
    let trimmed = path.trim_matches('/');
    let mut segments = SegmentVec::new();
    if trimmed.is_empty() {
        return Ok(segments);
    }

    let raw: Vec<&str> = trimmed.split('/').collect();
    let last = raw.len() - 1;
    for (i, part) in raw.into_iter().enumerate() {
        let invalid = |reason: &'static str| ConfigError::InvalidSegment {
            path: path.to_string(),
            segment: part.to_string(),
            reason,
        };
        if part.is_empty() {
            return Err(invalid("empty segment"));
        }
        if part == "**" {
            if i != last {
                return Err(invalid("wildcard must be the last segment"));
            }
            segments.push(Segment::Wildcard);
        } else if let Some(name) = part.strip_prefix(':') {
            if !PARAM_NAME.is_match(name) {
                return Err(invalid("parameter name must match [A-Za-z_][A-Za-z0-9_]*"));
            }
            segments.push(Segment::Param(Arc::from(name)));
        } else {
            segments.push(Segment::Literal(Arc::from(part)));
        }
    }
    Ok(segments)
}

/// Normalized key of a segment list, e.g. `subject/:`.
#[must_use]
pub fn normalized_key(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::normalized)
        .collect::<Vec<_>>()
        .join("/")
}

/// Split an incoming URL into non-empty segments, dropping any query string or fragment.
#[must_use]
pub fn split_url(url: &str) -> Vec<&str> {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_path() {
        assert!(parse_path("").unwrap().is_empty());
        assert!(parse_path("/").unwrap().is_empty());
    }

    #[test]
    fn test_parse_mixed_segments() {
        let segments = parse_path("subject/:subjId").unwrap();
        assert_eq!(
            segments.as_slice(),
            &[
                Segment::Literal(Arc::from("subject")),
                Segment::Param(Arc::from("subjId"))
            ]
        );
        assert_eq!(normalized_key(&segments), "subject/:");
    }

    #[test]
    fn test_reject_bad_param_name() {
        let err = parse_path("items/:").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSegment { .. }));
        assert!(parse_path("items/:1abc").is_err());
    }

    #[test]
    fn test_reject_interior_empty_segment() {
        assert!(parse_path("a//b").is_err());
    }

    #[test]
    fn test_wildcard_must_be_last() {
        assert!(parse_path("files/**").is_ok());
        assert!(parse_path("**/x").is_err());
    }

    #[test]
    fn test_split_url_drops_query_and_fragment() {
        assert_eq!(split_url("/v2/home?tab=1#top"), vec!["v2", "home"]);
        assert_eq!(split_url("v2//subject/"), vec!["v2", "subject"]);
        assert!(split_url("/").is_empty());
    }
}
