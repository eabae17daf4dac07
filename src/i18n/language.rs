//! Language type: a language code validated against the registry.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use std::fmt;
use thiserror::Error;

/// Errors raised when a language candidate is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    #[error("Unknown language code: '{0}'")]
    UnsupportedLanguage(String),

    #[error("Language '{0}' is not enabled")]
    DisabledLanguage(String),
}

/// A validated language.
///
/// Only supported, enabled languages can be constructed, so holding a
/// `Language` is proof that translations may be requested for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "de")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const GERMAN: Language = Language { code: "de" };
    pub const PORTUGUESE: Language = Language { code: "pt" };
    pub const SPANISH: Language = Language { code: "es" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is registered and enabled
    /// * `Err` if the code is unknown or the language is disabled
    pub fn from_code(code: &str) -> Result<Language, I18nError> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => Err(I18nError::DisabledLanguage(code.to_string())),
            None => Err(I18nError::UnsupportedLanguage(code.to_string())),
        }
    }

    /// Create a Language from a locale tag such as `pt-BR` or `de_DE.UTF-8`.
    ///
    /// Only the primary subtag is considered, case-insensitively.
    pub fn from_locale(locale: &str) -> Result<Language, I18nError> {
        let primary = locale
            .trim()
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Language::from_code(&primary)
    }

    /// The language consulted when a key is missing in the active language.
    pub fn fallback() -> Language {
        Language {
            code: LanguageRegistry::get().fallback().code,
        }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is not in the registry, which cannot happen for a
    /// `Language` built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Check if this is the fallback language.
    pub fn is_fallback(&self) -> bool {
        self.config().is_fallback
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
