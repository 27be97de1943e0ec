//! # Navigator
//!
//! The dispatcher that turns a requested URL into the view to render.
//!
//! ## Request Flow
//!
//! 1. [`Navigator::begin`] takes a ticket and matches the URL against the
//!    active tree (the locale tree if a [`LocaleRouter`] is attached)
//! 2. [`Navigator::complete`] is the suspension point before view
//!    resolution: if another navigation began in the meantime, this one is
//!    cancelled and nothing observable changes
//! 3. the matched view id is resolved to its bound handle and the new
//!    [`Navigation`] replaces the current one with a single atomic store
//!
//! [`Navigator::navigate`] runs both steps back to back.
//!
//! ## Error Handling
//!
//! No-match and redirect-loop failures are recovered by navigating to the
//! configured fallback path. Without a fallback, or if the fallback fails
//! too, the previous navigation stays current and the error is returned.

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::NavigationError;
use crate::locale::LocaleRouter;
use crate::registrar::NavigationSystem;
use crate::runtime_config::RuntimeConfig;
use crate::tree::{RouteMatch, DEFAULT_MAX_REDIRECTS};
use crate::view::ViewHandle;

/// Navigator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Redirect hop limit when no locale router is attached
    pub max_redirects: usize,
    /// Where to go when a navigation fails recoverably
    pub fallback_path: Option<String>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            fallback_path: None,
        }
    }
}

impl From<&RuntimeConfig> for NavigatorConfig {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            max_redirects: config.max_redirects,
            fallback_path: config.fallback_path.clone(),
        }
    }
}

/// A completed navigation: what is rendered and why.
#[derive(Debug, Clone)]
pub struct Navigation {
    /// URL as requested
    pub requested: String,
    /// Public URL after redirects (with locale prefix if enabled)
    pub url: String,
    /// Locale tree the match came from, if a locale router is attached
    pub locale: Option<String>,
    /// The route match
    pub route: RouteMatch,
    /// Bound handle of the matched view
    pub view: ViewHandle,
}

impl Navigation {
    /// Breadcrumb keys, root-most first.
    #[must_use]
    pub fn breadcrumbs(&self) -> &[String] {
        &self.route.breadcrumbs
    }
}

/// Outcome of [`Navigator::complete`].
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// The requested URL is now current
    Completed(Arc<Navigation>),
    /// The requested URL failed; the fallback route is now current
    Fallback {
        /// Why the requested URL failed
        error: NavigationError,
        /// The fallback navigation
        navigation: Arc<Navigation>,
    },
    /// A newer navigation superseded this one; nothing changed
    Cancelled {
        /// URL of the superseded request
        requested: String,
    },
}

impl NavigationOutcome {
    /// The navigation made current, if any.
    #[must_use]
    pub fn navigation(&self) -> Option<&Arc<Navigation>> {
        match self {
            NavigationOutcome::Completed(nav) => Some(nav),
            NavigationOutcome::Fallback { navigation, .. } => Some(navigation),
            NavigationOutcome::Cancelled { .. } => None,
        }
    }
}

#[derive(Debug)]
struct Resolved {
    locale: Option<String>,
    url: String,
    route: RouteMatch,
}

/// A matched but not yet committed navigation. See [`Navigator::begin`].
#[derive(Debug)]
pub struct PendingNavigation {
    ticket: u64,
    requested: String,
    resolved: Result<Resolved, NavigationError>,
}

impl PendingNavigation {
    /// URL as requested.
    #[must_use]
    pub fn requested(&self) -> &str {
        &self.requested
    }
}

/// Serial navigation dispatcher over a [`NavigationSystem`].
pub struct Navigator {
    system: Arc<NavigationSystem>,
    locales: Option<Arc<LocaleRouter>>,
    config: NavigatorConfig,
    generation: AtomicU64,
    current: ArcSwapOption<Navigation>,
}

impl Navigator {
    #[must_use]
    pub fn new(system: Arc<NavigationSystem>, config: NavigatorConfig) -> Self {
        Self {
            system,
            locales: None,
            config,
            generation: AtomicU64::new(0),
            current: ArcSwapOption::empty(),
        }
    }

    /// Match against locale trees instead of the system's base tree.
    #[must_use]
    pub fn with_locales(mut self, locales: Arc<LocaleRouter>) -> Self {
        self.locales = Some(locales);
        self
    }

    #[must_use]
    pub fn locales(&self) -> Option<&Arc<LocaleRouter>> {
        self.locales.as_ref()
    }

    /// The current navigation, if any has completed.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Navigation>> {
        self.current.load_full()
    }

    fn match_url(&self, url: &str) -> Result<Resolved, NavigationError> {
        match &self.locales {
            Some(locales) => {
                let matched = locales.resolve(url)?;
                Ok(Resolved {
                    locale: Some(matched.locale),
                    url: matched.url,
                    route: matched.route,
                })
            }
            None => {
                let route = self.system.tree().resolve(url, self.config.max_redirects)?;
                Ok(Resolved {
                    locale: None,
                    url: route.url.clone(),
                    route,
                })
            }
        }
    }

    fn bind(&self, requested: &str, resolved: Resolved) -> Result<Navigation, NavigationError> {
        let view = self
            .system
            .view(&resolved.route.view)
            .ok_or_else(|| NavigationError::UnboundView {
                view: resolved.route.view.clone(),
            })?;
        Ok(Navigation {
            requested: requested.to_string(),
            url: resolved.url,
            locale: resolved.locale,
            route: resolved.route,
            view,
        })
    }

    fn commit(&self, navigation: Navigation) -> Arc<Navigation> {
        let navigation = Arc::new(navigation);
        self.current.store(Some(Arc::clone(&navigation)));
        navigation
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != ticket
    }

    /// Start navigating to `url`: take a ticket and match the URL.
    ///
    /// Any navigation begun earlier and not yet completed is superseded.
    pub fn begin(&self, url: &str) -> PendingNavigation {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, url, "Navigation started");
        PendingNavigation {
            ticket,
            requested: url.to_string(),
            resolved: self.match_url(url),
        }
    }

    /// Finish a navigation begun with [`begin`](Self::begin).
    ///
    /// # Errors
    ///
    /// Returns the navigation error when it is not recoverable, or when no
    /// fallback is configured or the fallback itself fails. The current
    /// navigation is unchanged in every error case.
    pub fn complete(&self, pending: PendingNavigation) -> Result<NavigationOutcome, NavigationError> {
        let PendingNavigation {
            ticket,
            requested,
            resolved,
        } = pending;

        if self.is_superseded(ticket) {
            info!(ticket, url = %requested, "Navigation superseded");
            return Ok(NavigationOutcome::Cancelled { requested });
        }

        let err = match resolved.and_then(|r| self.bind(&requested, r)) {
            Ok(navigation) => {
                let navigation = self.commit(navigation);
                info!(
                    ticket,
                    url = %navigation.url,
                    view = %navigation.route.view,
                    breadcrumbs = ?navigation.route.breadcrumbs,
                    "Navigation completed"
                );
                return Ok(NavigationOutcome::Completed(navigation));
            }
            Err(err) => err,
        };

        if !err.is_recoverable() {
            warn!(url = %requested, error = %err, "Navigation failed");
            return Err(err);
        }
        let Some(fallback) = &self.config.fallback_path else {
            warn!(url = %requested, error = %err, "Navigation failed; keeping current state");
            return Err(err);
        };

        match self
            .match_url(fallback)
            .and_then(|r| self.bind(&requested, r))
        {
            Ok(navigation) => {
                let navigation = self.commit(navigation);
                warn!(
                    url = %requested,
                    fallback = %navigation.url,
                    error = %err,
                    "Navigation failed; fell back"
                );
                Ok(NavigationOutcome::Fallback {
                    error: err,
                    navigation,
                })
            }
            Err(fallback_err) => {
                error!(
                    url = %requested,
                    fallback = %fallback,
                    error = %fallback_err,
                    "Fallback navigation failed; keeping current state"
                );
                Err(err)
            }
        }
    }

    /// Navigate to `url`.
    pub fn navigate(&self, url: &str) -> Result<NavigationOutcome, NavigationError> {
        let pending = self.begin(url);
        self.complete(pending)
    }

    /// Switch the active locale, carrying the current position over.
    ///
    /// Supersedes any in-flight navigation, since it was matched against the
    /// previous locale's tree.
    ///
    /// # Errors
    ///
    /// [`NavigationError::UnknownLocale`] if no locale router is attached or the
    /// locale is not registered. Relocation and binding errors leave both the
    /// active locale and the current navigation unchanged.
    pub fn switch_locale(&self, locale: &str) -> Result<Option<Arc<Navigation>>, NavigationError> {
        let locales = self
            .locales
            .as_ref()
            .ok_or_else(|| NavigationError::UnknownLocale {
                locale: locale.to_string(),
            })?;
        let Some(current) = self.current() else {
            locales.activate(locale)?;
            self.generation.fetch_add(1, Ordering::SeqCst);
            return Ok(None);
        };

        // Relocate and bind before activating so a failure changes nothing.
        let matched = locales.relocate(locale, &current.route)?;
        let navigation = self.bind(
            &current.requested,
            Resolved {
                locale: Some(matched.locale),
                url: matched.url,
                route: matched.route,
            },
        )?;
        locales.activate(locale)?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.commit(navigation)))
    }
}
