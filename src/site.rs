//! Site wiring and event loop.
//!
//! [`build`] detects the language, loads translations and wires the
//! translator, router and view together around one [`EventBus`]. The
//! resulting [`Site`] consumes [`Input`]s one at a time; fetches and
//! initializer work run as in-flight futures so no input waits on the
//! network.

use crate::config::Config;
use crate::contact::{self, ContactClient, ContactForm};
use crate::events::{EventBus, SiteEvent};
use crate::fetch::FragmentSource;
use crate::i18n::{detect_language, Translator};
use crate::pages::PageInitializer;
use crate::prefs::PreferenceStore;
use crate::route::{site_routes, RouteTable};
use crate::router::{Completion, Router, Work};
use crate::view::{FormStatus, View};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Something that happened in the browser, or a programmatic request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// The navigation hash changed (link click, typed URL).
    HashChange(String),
    /// History back.
    Back,
    /// History forward.
    Forward,
    /// Programmatic navigation to a route.
    Navigate(String),
    /// Language selector used.
    SetLanguage(String),
}

/// Session history of navigation hashes.
#[derive(Debug, Clone)]
pub struct Location {
    entries: Vec<String>,
    index: usize,
}

impl Location {
    pub fn new(hash: &str) -> Self {
        Self {
            entries: vec![normalize_hash(hash)],
            index: 0,
        }
    }

    /// Current hash, without the leading `#`.
    pub fn hash(&self) -> &str {
        &self.entries[self.index]
    }

    /// Record a new hash, dropping any forward entries.
    pub fn push(&mut self, hash: &str) {
        let hash = normalize_hash(hash);
        if hash == self.hash() {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(hash);
        self.index += 1;
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

fn normalize_hash(hash: &str) -> String {
    hash.trim().trim_start_matches('#').to_string()
}

/// Startup settings for [`build`].
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub routes: RouteTable,
    /// Locator of the translations JSON resource
    pub translations: String,
    /// Explicit language override, e.g. from a `?lang=` parameter
    pub language_override: Option<String>,
    /// User agent locales, most preferred first
    pub locales: Vec<String>,
    pub initial_hash: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            routes: site_routes(),
            translations: "i18n/translations.json".to_string(),
            language_override: None,
            locales: Vec::new(),
            initial_hash: String::new(),
        }
    }
}

impl SiteOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            translations: config.translations_path.clone(),
            language_override: config.language_override.clone(),
            locales: config.locales.clone(),
            ..Self::default()
        }
    }
}

/// Assemble a site: pick the language, load translations, localize the shell.
///
/// A failed translation load is logged and the site starts with the static
/// text in its markup.
pub async fn build<V: View>(
    source: Arc<dyn FragmentSource>,
    prefs: Box<dyn PreferenceStore>,
    view: V,
    options: SiteOptions,
) -> Site<V> {
    let bus = EventBus::new();
    let language = detect_language(
        options.language_override.as_deref(),
        prefs.as_ref(),
        &options.locales,
    );

    let mut i18n = Translator::new(language, prefs, bus.clone());
    i18n.load(source.as_ref(), &options.translations).await;

    let router = Router::new(options.routes, source, bus.clone());
    Site::new(router, i18n, view, &bus, &options.initial_hash)
}

pub struct Site<V: View> {
    router: Router,
    i18n: Translator,
    view: V,
    location: Location,
    contact: Option<ContactClient>,
    events: broadcast::Receiver<SiteEvent>,
    pending: FuturesUnordered<Work>,
    started: bool,
}

impl<V: View> Site<V> {
    /// Wire the parts together. Subscribes to `bus` and localizes the view.
    pub fn new(
        router: Router,
        i18n: Translator,
        mut view: V,
        bus: &EventBus,
        initial_hash: &str,
    ) -> Self {
        let events = bus.subscribe();
        i18n.update_dom(&mut view);
        Self {
            router,
            i18n,
            view,
            location: Location::new(initial_hash),
            contact: None,
            events,
            pending: FuturesUnordered::new(),
            started: false,
        }
    }

    pub fn with_contact(mut self, client: ContactClient) -> Self {
        self.contact = Some(client);
        self
    }

    pub fn register_initializer(&mut self, route: &str, initializer: Arc<dyn PageInitializer>) {
        self.router.register_initializer(route, initializer);
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn translator(&self) -> &Translator {
        &self.i18n
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Route for the current hash. Recomputed on every call.
    pub fn current_route(&self) -> &str {
        self.router.resolve_route(self.location.hash())
    }

    /// Number of fetches and initializer tasks still in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Perform the initial navigation. Only the first call has any effect.
    pub fn init(&mut self) {
        if self.started {
            warn!("Site already initialised");
            return;
        }
        self.started = true;
        info!(
            "Starting at '{}' in {}",
            self.current_route(),
            self.i18n.language()
        );
        self.navigate_current();
    }

    /// Handle one input. Never waits on the network.
    pub fn dispatch(&mut self, input: Input) {
        debug!("Input: {:?}", input);
        match input {
            Input::HashChange(hash) => {
                self.location.push(&hash);
                self.navigate_current();
            }
            Input::Navigate(route) => {
                self.location.push(&route);
                self.navigate_current();
            }
            Input::Back => {
                if self.location.back() {
                    self.navigate_current();
                } else {
                    debug!("No history to go back to");
                }
            }
            Input::Forward => {
                if self.location.forward() {
                    self.navigate_current();
                } else {
                    debug!("No history to go forward to");
                }
            }
            Input::SetLanguage(code) => {
                match self.i18n.set_language(&code, &mut self.view) {
                    Ok(language) => debug!("Active language is now {}", language),
                    Err(e) => debug!("Language stays {}: {}", self.i18n.language(), e),
                }
                self.drain_events();
            }
        }
    }

    /// Wait for every in-flight fetch and initializer to settle.
    pub async fn settle(&mut self) {
        while let Some(done) = self.pending.next().await {
            self.apply(done);
        }
    }

    /// Process inputs and completions until the input channel closes, then
    /// let outstanding work finish.
    pub async fn run(&mut self, mut inputs: mpsc::UnboundedReceiver<Input>) {
        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.dispatch(input),
                    None => break,
                },
                Some(done) = self.pending.next(), if !self.pending.is_empty() => {
                    self.apply(done);
                }
            }
        }
        self.settle().await;
    }

    /// Submit the contact form shown on the current page.
    pub async fn submit_contact(&mut self, form: &ContactForm) -> FormStatus {
        let Some(client) = &self.contact else {
            warn!("No form endpoint configured, cannot submit contact form");
            self.view.show_form_status(FormStatus::Failed);
            return FormStatus::Failed;
        };
        contact::submit_contact(&mut self.view, client, form, self.i18n.language()).await
    }

    fn navigate_current(&mut self) {
        let route = self.current_route().to_string();
        if let Some(work) = self.router.begin(&route, &mut self.view, &self.i18n) {
            self.pending.push(work);
        }
        self.drain_events();
    }

    fn apply(&mut self, done: Completion) {
        if let Some(work) = self.router.complete(done, &mut self.view, &self.i18n) {
            self.pending.push(work);
        }
        self.drain_events();
    }

    /// React to bus notifications. A language change only refreshes the
    /// current page's title and description; content is not re-fetched.
    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(SiteEvent::LanguageChanged(language)) => {
                    debug!("Refreshing page metadata for {}", language);
                    let route = self.current_route().to_string();
                    self.router.refresh_meta(&route, &mut self.view, &self.i18n);
                }
                Ok(event) => debug!("Event: {:?}", event),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!("Missed {} site events", missed);
                }
                Err(_) => break,
            }
        }
    }
}
