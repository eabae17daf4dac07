//! Translation table validation.
//!
//! Checks a loaded [`TranslationTable`] for coverage gaps against the fallback
//! language and for markup that got lost in translation (rich-text entries
//! are injected as HTML, so their tag structure should survive).

use crate::i18n::{LanguageRegistry, TranslationTable};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make every lookup degrade (e.g. no fallback table)
    pub errors: Vec<String>,

    /// Gaps that degrade individual lookups
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation tables.
pub struct TableValidator;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

impl TableValidator {
    /// Validate a table against the language registry.
    ///
    /// Reports:
    /// - an error if the fallback language has no strings
    /// - a warning for each enabled language absent from the table
    /// - a warning for each language in the table that is not supported
    /// - a warning per language listing keys the fallback has but it lacks
    /// - a warning for each entry whose HTML tags or URLs differ from the
    ///   fallback entry
    pub fn validate(table: &TranslationTable) -> ValidationReport {
        let mut report = ValidationReport::new();
        let registry = LanguageRegistry::get();
        let fallback_code = registry.fallback().code;

        let Some(fallback) = table.strings(fallback_code).filter(|s| !s.is_empty()) else {
            report
                .errors
                .push(format!("Fallback language '{}' has no strings", fallback_code));
            return report;
        };

        let mut unsupported: Vec<_> = table
            .languages()
            .filter(|code| !registry.is_enabled(code))
            .collect();
        unsupported.sort_unstable();
        for code in unsupported {
            report
                .warnings
                .push(format!("Language '{}' is not supported and will never be shown", code));
        }

        for config in registry.list_enabled() {
            if config.code == fallback_code {
                continue;
            }

            let Some(strings) = table.strings(config.code) else {
                report.warnings.push(format!(
                    "Language '{}' is missing; all lookups will fall back to '{}'",
                    config.code, fallback_code
                ));
                continue;
            };

            let missing: BTreeSet<_> = fallback
                .keys()
                .filter(|key| !strings.contains_key(*key))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                report.warnings.push(format!(
                    "Language '{}' is missing {} keys: {:?}",
                    config.code,
                    missing.len(),
                    missing
                ));
            }

            let mut keys: Vec<_> = strings.keys().collect();
            keys.sort_unstable();
            for key in keys {
                let (Some(original), Some(translated)) = (fallback.get(key), strings.get(key))
                else {
                    continue;
                };
                if Self::extract_tags(original) != Self::extract_tags(translated) {
                    report.warnings.push(format!(
                        "Markup mismatch in '{}' for '{}'",
                        key, config.code
                    ));
                }
                if Self::extract_urls(original) != Self::extract_urls(translated) {
                    report.warnings.push(format!(
                        "URL mismatch in '{}' for '{}'",
                        key, config.code
                    ));
                }
            }
        }

        report
    }

    /// Extract tag names (opening and closing) in order of appearance
    fn extract_tags(text: &str) -> Vec<String> {
        let regex = TAG_REGEX
            .get_or_init(|| Regex::new(r"</?([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(0).map(|m| {
                let tag = m.as_str();
                let closing = tag.starts_with("</");
                let name = cap.get(1).map(|n| n.as_str().to_ascii_lowercase()).unwrap_or_default();
                if closing {
                    format!("/{}", name)
                } else {
                    name
                }
            }))
            .collect()
    }

    /// Extract all URLs from text
    fn extract_urls(text: &str) -> Vec<String> {
        let regex = URL_REGEX.get_or_init(|| Regex::new(r#"https?://[^\s"'<>)]+"#).unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
