//! Error taxonomy for route-tree construction, registration and navigation.
//!
//! Construction and registration errors ([`ConfigError`], [`UnresolvedViewError`],
//! wrapped by [`RegistrationError`]) are fatal: a malformed configuration must
//! fail application startup. Navigation errors ([`NavigationError`]) are
//! recoverable: the navigator falls back to a designated route or keeps the
//! previous state.

use std::fmt;

use crate::tree::{MatchPolicy, RouteId};
use crate::view::ViewId;

/// Malformed route configuration detected while building a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two siblings share the same normalized path and match policy.
    DuplicateSibling {
        /// Full path of the parent scope (empty at the root)
        parent: String,
        /// Normalized sibling path (parameters rendered as `:`)
        path: String,
        /// Match policy shared by both siblings
        policy: MatchPolicy,
    },
    /// A redirect also declares a view.
    RedirectWithView {
        /// Declared path of the offending node
        path: String,
    },
    /// A redirect also declares children.
    RedirectWithChildren {
        /// Declared path of the offending node
        path: String,
    },
    /// A node has no view, no redirect target and no children.
    EmptyRoute {
        /// Declared path of the offending node
        path: String,
    },
    /// A path segment cannot be parsed.
    InvalidSegment {
        /// Declared path of the offending node
        path: String,
        /// The segment that failed to parse
        segment: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateSibling {
                parent,
                path,
                policy,
            } => write!(
                f,
                "route configuration error: duplicate sibling '{path}' (pathMatch={policy}) under '/{parent}'"
            ),
            ConfigError::RedirectWithView { path } => write!(
                f,
                "route configuration error: '{path}' declares both redirectTo and a view"
            ),
            ConfigError::RedirectWithChildren { path } => write!(
                f,
                "route configuration error: '{path}' declares both redirectTo and children"
            ),
            ConfigError::EmptyRoute { path } => write!(
                f,
                "route configuration error: '{path}' declares no view, redirectTo or children"
            ),
            ConfigError::InvalidSegment {
                path,
                segment,
                reason,
            } => write!(
                f,
                "route configuration error: invalid segment '{segment}' in '{path}': {reason}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// One or more views referenced by a tree have no binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedViewError {
    /// Missing view identifiers paired with the full path of a route referencing them
    pub missing: Vec<(ViewId, String)>,
}

impl fmt::Display for UnresolvedViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unresolved views:")?;
        for (view, path) in &self.missing {
            write!(f, " '{view}' (route '/{path}')")?;
        }
        Ok(())
    }
}

impl std::error::Error for UnresolvedViewError {}

/// Failure while registering a tree into a [`NavigationSystem`](crate::registrar::NavigationSystem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The composed tree is malformed (e.g. the mount collides with a sibling)
    Config(ConfigError),
    /// The tree references views with no binding
    UnresolvedView(UnresolvedViewError),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::Config(e) => write!(f, "registration failed: {e}"),
            RegistrationError::UnresolvedView(e) => write!(f, "registration failed: {e}"),
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::Config(e) => Some(e),
            RegistrationError::UnresolvedView(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RegistrationError {
    fn from(e: ConfigError) -> Self {
        RegistrationError::Config(e)
    }
}

impl From<UnresolvedViewError> for RegistrationError {
    fn from(e: UnresolvedViewError) -> Self {
        RegistrationError::UnresolvedView(e)
    }
}

/// No route matches an incoming path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatchError {
    /// Normalized path that failed to match (after any redirects)
    pub path: String,
}

impl fmt::Display for NoMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no route matches '/{}'", self.path)
    }
}

impl std::error::Error for NoMatchError {}

/// Redirect chain exceeded the configured hop limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectLoopError {
    /// Path originally requested
    pub path: String,
    /// Redirect targets followed before giving up, in order
    pub hops: Vec<String>,
    /// Configured hop limit
    pub limit: usize,
}

impl fmt::Display for RedirectLoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "redirect limit of {} exceeded while resolving '/{}' (last target '/{}')",
            self.limit,
            self.path,
            self.hops.last().map(String::as_str).unwrap_or_default()
        )
    }
}

impl std::error::Error for RedirectLoopError {}

/// Recoverable failure while navigating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No route matched
    NoMatch(NoMatchError),
    /// Too many redirects
    RedirectLoop(RedirectLoopError),
    /// The requested locale has no registered tree
    UnknownLocale {
        /// Requested locale code
        locale: String,
    },
    /// A matched view has no binding at dispatch time
    UnboundView {
        /// The view referenced by the matched route
        view: ViewId,
    },
    /// A locale switch could not carry the current route over
    PositionLost {
        /// Target locale
        locale: String,
        /// Route active before the switch
        expected: RouteId,
        /// Route the target locale resolved to, if any
        actual: Option<RouteId>,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::NoMatch(e) => e.fmt(f),
            NavigationError::RedirectLoop(e) => e.fmt(f),
            NavigationError::UnknownLocale { locale } => {
                write!(f, "no route tree registered for locale '{locale}'")
            }
            NavigationError::UnboundView { view } => {
                write!(f, "view '{view}' has no binding")
            }
            NavigationError::PositionLost {
                locale,
                expected,
                actual: Some(actual),
            } => write!(
                f,
                "route {expected} resolves to {actual} in locale '{locale}'"
            ),
            NavigationError::PositionLost {
                locale,
                expected,
                actual: None,
            } => write!(f, "route {expected} has no path in locale '{locale}'"),
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::NoMatch(e) => Some(e),
            NavigationError::RedirectLoop(e) => Some(e),
            _ => None,
        }
    }
}

impl NavigationError {
    /// Whether the navigator should recover by routing to the fallback path.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NavigationError::NoMatch(_) | NavigationError::RedirectLoop(_)
        )
    }
}

impl From<NoMatchError> for NavigationError {
    fn from(e: NoMatchError) -> Self {
        NavigationError::NoMatch(e)
    }
}

impl From<RedirectLoopError> for NavigationError {
    fn from(e: RedirectLoopError) -> Self {
        NavigationError::RedirectLoop(e)
    }
}
