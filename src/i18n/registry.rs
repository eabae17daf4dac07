//! Language registry: the fixed set of languages the site is published in.
//!
//! The registry is built once on first access and never changes afterwards.
//! It carries no mutable state; the active language lives on the
//! [`Translator`](crate::i18n::Translator) that owns it.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "de")
    pub code: &'static str,

    /// English name of the language (e.g., "German")
    pub name: &'static str,

    /// Native name of the language, shown in the language selector
    pub native_name: &'static str,

    /// Whether lookups fall back to this language (exactly one should be true)
    pub is_fallback: bool,

    /// Whether this language can be activated
    pub enabled: bool,
}

/// Registry of supported languages.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages, in selector order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get all languages (including disabled ones).
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the fallback language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one fallback language.
    /// The registry is static, so this indicates a programming error.
    pub fn fallback(&self) -> &LanguageConfig {
        let fallbacks: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_fallback)
            .collect();

        match fallbacks.len() {
            0 => panic!("No fallback language found in registry"),
            1 => fallbacks[0],
            _ => panic!("Multiple fallback languages found in registry"),
        }
    }

    /// Check if a language code is supported and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

/// Languages the site ships translations for. English is the fallback.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_fallback: true,
            enabled: true,
        },
        LanguageConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            is_fallback: false,
            enabled: true,
        },
        LanguageConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            is_fallback: false,
            enabled: true,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_fallback: false,
            enabled: true,
        },
    ]
}
