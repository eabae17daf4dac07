//! Router and render pipeline.
//!
//! A navigation is split in two: [`Router::begin`] does everything that can
//! happen synchronously (loading placeholder, cache hit render) and hands back
//! [`Work`] for anything that must wait on the network. When that work
//! settles, [`Router::complete`] applies it. The site loop polls outstanding
//! work alongside new input, so a slow fetch never holds up a later
//! navigation.
//!
//! Every navigation gets a generation number. Completed fetches always
//! populate the cache, but only the latest navigation's result is rendered.

use crate::cache::PageCache;
use crate::events::{EventBus, SiteEvent};
use crate::fetch::{FetchError, FragmentSource};
use crate::i18n::Translator;
use crate::pages::{PageInitializer, ViewPatch};
use crate::route::RouteTable;
use crate::view::View;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const LOADING_HTML: &str = r#"<div class="page-loading" role="status" aria-busy="true"><span data-i18n="common.loading">Loading…</span></div>"#;

/// Result of outstanding navigation work.
pub enum Completion {
    /// A fragment fetch settled.
    Fragment {
        route: String,
        generation: u64,
        result: Result<String, FetchError>,
    },
    /// A route initializer's deferred work settled.
    Initializer {
        route: String,
        generation: u64,
        patch: ViewPatch,
    },
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Completion::Fragment {
                route,
                generation,
                result,
            } => f
                .debug_struct("Fragment")
                .field("route", route)
                .field("generation", generation)
                .field("ok", &result.is_ok())
                .finish(),
            Completion::Initializer {
                route, generation, ..
            } => f
                .debug_struct("Initializer")
                .field("route", route)
                .field("generation", generation)
                .finish_non_exhaustive(),
        }
    }
}

/// Outstanding work produced by a navigation.
pub type Work = BoxFuture<'static, Completion>;

pub struct Router {
    routes: RouteTable,
    cache: PageCache,
    source: Arc<dyn FragmentSource>,
    initializers: HashMap<String, Arc<dyn PageInitializer>>,
    bus: EventBus,
    generation: u64,
}

impl Router {
    pub fn new(routes: RouteTable, source: Arc<dyn FragmentSource>, bus: EventBus) -> Self {
        Self {
            routes,
            cache: PageCache::new(),
            source,
            initializers: HashMap::new(),
            bus,
            generation: 0,
        }
    }

    /// Register the initializer to run after every render of `route`.
    pub fn register_initializer(&mut self, route: &str, initializer: Arc<dyn PageInitializer>) {
        if !self.routes.contains(route) {
            warn!("Initializer registered for unknown route '{}'", route);
        }
        self.initializers.insert(route.to_string(), initializer);
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Generation of the most recent navigation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Route named by a navigation hash, or the default route.
    pub fn resolve_route<'a>(&'a self, hash: &str) -> &'a str {
        self.routes.resolve(hash)
    }

    /// Navigate and wait for everything the navigation started, including the
    /// route's initializer.
    pub async fn navigate(&mut self, route: &str, view: &mut dyn View, i18n: &Translator) {
        let mut next = self.begin(route, view, i18n);
        while let Some(work) = next {
            let done = work.await;
            next = self.complete(done, view, i18n);
        }
    }

    /// Start a navigation.
    ///
    /// Unknown routes redirect to the default route. Renders the loading
    /// placeholder, then either renders from the cache or returns the fetch
    /// to wait on.
    pub fn begin(&mut self, route: &str, view: &mut dyn View, i18n: &Translator) -> Option<Work> {
        if !self.routes.contains(route) {
            let default = self.routes.default_route().to_string();
            warn!("Unknown route '{}', redirecting to '{}'", route, default);
            return self.begin(&default, view, i18n);
        }

        self.generation += 1;
        let generation = self.generation;
        let route = route.to_string();

        view.set_content(LOADING_HTML);
        i18n.update_dom(view);

        if let Some(html) = self.cache.get(&route) {
            debug!("Cache hit for '{}'", route);
            let html = html.to_string();
            return self.render_page(&html, &route, generation, view, i18n);
        }

        let locator = self.routes.locator(&route)?;
        info!("Fetching '{}' from {}", route, locator);
        let fetch = self.source.fetch(locator);

        Some(
            async move {
                Completion::Fragment {
                    route,
                    generation,
                    result: fetch.await,
                }
            }
            .boxed(),
        )
    }

    /// Apply settled work. May return follow-up work (the initializer's).
    pub fn complete(
        &mut self,
        done: Completion,
        view: &mut dyn View,
        i18n: &Translator,
    ) -> Option<Work> {
        match done {
            Completion::Fragment {
                route,
                generation,
                result: Ok(html),
            } => {
                self.cache.put(&route, html.as_str());
                if generation != self.generation {
                    debug!("Discarding superseded render of '{}'", route);
                    return None;
                }
                self.render_page(&html, &route, generation, view, i18n)
            }
            Completion::Fragment {
                route,
                generation,
                result: Err(e),
            } => {
                warn!("Failed to load '{}': {}", route, e);
                if generation != self.generation {
                    return None;
                }
                self.render_error(view, i18n);
                self.bus.publish(SiteEvent::RouteFailed { route });
                None
            }
            Completion::Initializer {
                route,
                generation,
                patch,
            } => {
                if generation == self.generation {
                    patch(view);
                } else {
                    debug!("Dropping initializer result for '{}', page has changed", route);
                }
                None
            }
        }
    }

    /// Swap the page content in and bring everything around it in line.
    pub fn render_page(
        &mut self,
        html: &str,
        route: &str,
        generation: u64,
        view: &mut dyn View,
        i18n: &Translator,
    ) -> Option<Work> {
        view.set_content(html);
        i18n.update_dom(view);
        view.set_current_nav(route);
        self.refresh_meta(route, view, i18n);
        view.scroll_to_top();
        info!("Rendered '{}'", route);
        self.bus.publish(SiteEvent::RouteRendered {
            route: route.to_string(),
        });

        let task = self.initializers.get(route)?.run(view)?;
        let route = route.to_string();
        Some(
            async move {
                Completion::Initializer {
                    route,
                    generation,
                    patch: task.await,
                }
            }
            .boxed(),
        )
    }

    /// Update title and description from `page.<route>.title` and
    /// `page.<route>.meta`. Missing keys leave the current values alone.
    pub fn refresh_meta(&self, route: &str, view: &mut dyn View, i18n: &Translator) {
        let title_key = format!("page.{}.title", route);
        let title = i18n.t(&title_key);
        if title != title_key {
            view.set_title(&title);
        }

        let meta_key = format!("page.{}.meta", route);
        let description = i18n.t(&meta_key);
        if description != meta_key {
            view.set_description(&description);
        }
    }

    fn render_error(&self, view: &mut dyn View, i18n: &Translator) {
        view.set_content(&format!(
            r##"<section class="page-error" role="alert"><h1 data-i18n="error.title">Page unavailable</h1><p data-i18n="error.message">This page could not be loaded. Please try again.</p><a href="#{}" data-i18n="error.back">Back to the home page</a></section>"##,
            self.routes.default_route()
        ));
        i18n.update_dom(view);
    }
}
