//! Startup language selection.

use crate::i18n::Language;
use crate::prefs::{PreferenceStore, LANGUAGE_KEY, LEGACY_LANGUAGE_KEY};
use tracing::{debug, info};

/// Pick the language to activate at startup.
///
/// Candidates, in priority order:
/// 1. explicit override (e.g. a `?lang=` URL parameter)
/// 2. stored preference
/// 3. legacy stored preference
/// 4. the user agent's locales, most preferred first
/// 5. the fallback language
///
/// Candidates outside the supported set are skipped.
pub fn detect_language(
    override_code: Option<&str>,
    prefs: &dyn PreferenceStore,
    locales: &[String],
) -> Language {
    let stored = prefs.get(LANGUAGE_KEY);
    let legacy = prefs.get(LEGACY_LANGUAGE_KEY);

    let candidates = [
        ("override", override_code),
        ("preference", stored.as_deref()),
        ("legacy preference", legacy.as_deref()),
    ];

    for (source, candidate) in candidates {
        let Some(code) = candidate else { continue };
        match Language::from_code(code.trim()) {
            Ok(language) => {
                info!("Language {} selected from {}", language, source);
                return language;
            }
            Err(e) => debug!("Ignoring {} candidate: {}", source, e),
        }
    }

    for locale in locales {
        match Language::from_locale(locale) {
            Ok(language) => {
                info!("Language {} selected from locale '{}'", language, locale);
                return language;
            }
            Err(e) => debug!("Ignoring locale candidate: {}", e),
        }
    }

    let fallback = Language::fallback();
    info!("No usable language candidate, using {}", fallback);
    fallback
}
