//! Translation store: active language, loaded table and lookups.

use crate::events::{EventBus, SiteEvent};
use crate::fetch::FragmentSource;
use crate::i18n::{I18nError, Language, LookupMetrics, TableValidator, TranslationTable};
use crate::prefs::{PreferenceStore, LANGUAGE_KEY};
use crate::view::View;
use tracing::{debug, info, warn};

/// Owns the translation table and the active language.
///
/// Language changes are announced on the [`EventBus`] only; the store holds no
/// reference to the router.
pub struct Translator {
    table: TranslationTable,
    loaded: bool,
    language: Language,
    prefs: Box<dyn PreferenceStore>,
    bus: EventBus,
    metrics: LookupMetrics,
}

impl Translator {
    /// Create a store with an empty table. Until [`load`](Self::load)
    /// succeeds every lookup returns its key.
    pub fn new(language: Language, prefs: Box<dyn PreferenceStore>, bus: EventBus) -> Self {
        Self {
            table: TranslationTable::default(),
            loaded: false,
            language,
            prefs,
            bus,
            metrics: LookupMetrics::new(),
        }
    }

    /// Use an already-parsed table instead of loading one.
    pub fn with_table(mut self, table: TranslationTable) -> Self {
        self.table = table;
        self.loaded = true;
        self
    }

    /// Fetch and parse the translation resource.
    ///
    /// Failure is not fatal: the table stays empty, a warning is logged and
    /// `false` is returned. Once a table is loaded further calls do nothing.
    pub async fn load(&mut self, source: &dyn FragmentSource, locator: &str) -> bool {
        if self.loaded {
            debug!("Translations already loaded, skipping {}", locator);
            return true;
        }

        let text = match source.fetch(locator).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Translations unavailable, showing static text: {}", e);
                return false;
            }
        };

        let table = match TranslationTable::from_json(&text) {
            Ok(table) => table,
            Err(e) => {
                warn!("Translations at {} are malformed, showing static text: {}", locator, e);
                return false;
            }
        };

        let report = TableValidator::validate(&table);
        for error in &report.errors {
            warn!("Translation table error: {}", error);
        }
        for warning in &report.warnings {
            debug!("Translation table warning: {}", warning);
        }

        info!(
            "Loaded translations for {} languages from {}",
            table.languages().count(),
            locator
        );
        self.table = table;
        self.loaded = true;
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    pub fn prefs(&self) -> &dyn PreferenceStore {
        self.prefs.as_ref()
    }

    /// Localized text for `key` in the active language.
    ///
    /// Falls back to the fallback language, then to the key itself. Never
    /// fails.
    pub fn t(&self, key: &str) -> String {
        if let Some(text) = self.table.get(self.language.code(), key) {
            self.metrics.record_hit();
            return text.to_string();
        }

        let fallback = Language::fallback();
        if let Some(text) = self.table.get(fallback.code(), key) {
            debug!("Key '{}' missing for {}, using {}", key, self.language, fallback);
            self.metrics.record_fallback();
            return text.to_string();
        }

        warn!("Translation key '{}' not found", key);
        self.metrics.record_miss();
        key.to_string()
    }

    /// Switch the active language.
    ///
    /// Unsupported codes are logged and leave everything unchanged. Otherwise
    /// the choice is persisted, the page is re-localized and
    /// [`SiteEvent::LanguageChanged`] is published.
    pub fn set_language(&mut self, code: &str, view: &mut dyn View) -> Result<Language, I18nError> {
        let language = Language::from_code(code).map_err(|e| {
            warn!("Ignoring language change: {}", e);
            e
        })?;

        self.language = language;
        self.prefs.set(LANGUAGE_KEY, language.code());
        self.update_dom(view);
        info!("Language changed to {}", language);
        self.bus.publish(SiteEvent::LanguageChanged(language));
        Ok(language)
    }

    /// Re-apply translations to every marked element and sync the document
    /// language and the language selector.
    ///
    /// Without a loaded table the static text already in the markup is kept.
    pub fn update_dom(&self, view: &mut dyn View) {
        if self.loaded {
            view.localize(&|key| self.t(key));
        }
        view.set_document_language(self.language.code());
        view.set_active_language(self.language.code());
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("language", &self.language)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::FakeSource;
    use crate::prefs::MemoryPreferences;
    use crate::view::MemoryView;

    const TABLE: &str = r#"{
        "en": {"nav.home": "Home", "nav.about": "About", "hero": "We <em>deliver</em>"},
        "de": {"nav.home": "Startseite", "hero": "Wir <em>liefern</em>"},
        "pt": {"nav.home": "Início"}
    }"#;

    fn translator(language: Language) -> Translator {
        Translator::new(language, Box::new(MemoryPreferences::new()), EventBus::new())
            .with_table(TranslationTable::from_json(TABLE).unwrap())
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_t_active_language() {
        let i18n = translator(Language::GERMAN);
        assert_eq!(i18n.t("nav.home"), "Startseite");
        assert_eq!(i18n.metrics().hits(), 1);
    }

    #[test]
    fn test_t_falls_back_to_english() {
        let i18n = translator(Language::PORTUGUESE);
        assert_eq!(i18n.t("nav.about"), "About");
        assert_eq!(i18n.metrics().fallbacks(), 1);
    }

    #[test]
    fn test_t_missing_everywhere_returns_key() {
        let i18n = translator(Language::GERMAN);
        assert_eq!(i18n.t("page.careers.title"), "page.careers.title");
        assert_eq!(i18n.metrics().misses(), 1);
    }

    #[test]
    fn test_t_with_empty_table_returns_key() {
        let i18n = Translator::new(
            Language::ENGLISH,
            Box::new(MemoryPreferences::new()),
            EventBus::new(),
        );
        assert_eq!(i18n.t("nav.home"), "nav.home");
        assert!(!i18n.is_loaded());
    }

    // ==================== Loading Tests ====================

    #[tokio::test]
    async fn test_load_success() {
        let source = FakeSource::new().with_text("i18n/translations.json", TABLE);
        let mut i18n = Translator::new(
            Language::GERMAN,
            Box::new(MemoryPreferences::new()),
            EventBus::new(),
        );

        assert!(i18n.load(&source, "i18n/translations.json").await);
        assert_eq!(i18n.t("nav.home"), "Startseite");

        // Second load is a no-op
        assert!(i18n.load(&source, "i18n/translations.json").await);
        assert_eq!(source.calls("i18n/translations.json"), 1);
    }

    #[tokio::test]
    async fn test_load_failure_is_not_fatal() {
        let source = FakeSource::new().with_status("i18n/translations.json", 500);
        let mut i18n = Translator::new(
            Language::GERMAN,
            Box::new(MemoryPreferences::new()),
            EventBus::new(),
        );

        assert!(!i18n.load(&source, "i18n/translations.json").await);
        assert!(i18n.table().is_empty());
        assert_eq!(i18n.t("nav.home"), "nav.home");
    }

    #[tokio::test]
    async fn test_load_malformed_json() {
        let source = FakeSource::new().with_text("t.json", "{not json");
        let mut i18n = Translator::new(
            Language::ENGLISH,
            Box::new(MemoryPreferences::new()),
            EventBus::new(),
        );

        assert!(!i18n.load(&source, "t.json").await);
        assert!(!i18n.is_loaded());
    }

    // ==================== set_language Tests ====================

    #[test]
    fn test_set_language_updates_dom_persists_and_publishes() {
        let bus = EventBus::new();
        let mut events = bus.subscribe();
        let mut i18n = Translator::new(Language::ENGLISH, Box::new(MemoryPreferences::new()), bus)
            .with_table(TranslationTable::from_json(TABLE).unwrap());
        let mut view = MemoryView::new(
            r#"<a data-i18n="nav.home">Home</a><a data-i18n="nav.about">About</a><p data-i18n-html="hero"></p><button data-lang="de">DE</button>"#,
        );

        let result = i18n.set_language("de", &mut view);

        assert_eq!(result, Ok(Language::GERMAN));
        assert_eq!(view.texts("nav.home"), vec!["Startseite"]);
        assert_eq!(view.texts("nav.about"), vec!["About"]);
        assert_eq!(view.texts("hero"), vec!["Wir <em>liefern</em>"]);
        assert_eq!(view.document_language(), "de");
        assert_eq!(view.active_language(), Some("de"));
        assert_eq!(i18n.prefs().get(LANGUAGE_KEY).as_deref(), Some("de"));
        assert_eq!(
            events.try_recv().expect("event"),
            SiteEvent::LanguageChanged(Language::GERMAN)
        );
    }

    #[test]
    fn test_update_dom_without_table_keeps_static_text() {
        let i18n = Translator::new(
            Language::PORTUGUESE,
            Box::new(MemoryPreferences::new()),
            EventBus::new(),
        );
        let mut view = MemoryView::new(r#"<a data-i18n="nav.home">Home</a>"#);

        i18n.update_dom(&mut view);

        assert_eq!(view.texts("nav.home"), vec!["Home"]);
        assert_eq!(view.document_language(), "pt");
    }

    #[test]
    fn test_set_language_rejects_unsupported() {
        let bus = EventBus::new();
        let mut events = bus.subscribe();
        let mut i18n = Translator::new(Language::ENGLISH, Box::new(MemoryPreferences::new()), bus);
        let mut view = MemoryView::new("");

        let result = i18n.set_language("fr", &mut view);

        assert!(result.is_err());
        assert_eq!(i18n.language(), Language::ENGLISH);
        assert_eq!(i18n.prefs().get(LANGUAGE_KEY), None);
        assert_eq!(view.document_language(), "");
        assert!(events.try_recv().is_err());
    }
}
