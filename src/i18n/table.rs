//! Translation table: language code -> (key -> localized string).

use serde::Deserialize;
use std::collections::HashMap;

/// Flat key/value strings for one language.
pub type Strings = HashMap<String, String>;

/// The loaded translation resource.
///
/// Deserialized from JSON shaped as `{ "en": { "nav.home": "Home" }, ... }`.
/// Once built it is never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable {
    languages: HashMap<String, Strings>,
}

impl TranslationTable {
    /// Parse a table from its JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Look up `key` in exactly one language, without fallback.
    pub fn get(&self, language: &str, key: &str) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
    }

    /// All strings for one language.
    pub fn strings(&self, language: &str) -> Option<&Strings> {
        self.languages.get(language)
    }

    /// Language codes present in the table.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.languages.values().all(HashMap::is_empty)
    }
}

impl<L, K, V> FromIterator<(L, Vec<(K, V)>)> for TranslationTable
where
    L: Into<String>,
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, Vec<(K, V)>)>>(iter: I) -> Self {
        let languages = iter
            .into_iter()
            .map(|(lang, entries)| {
                let strings = entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect();
                (lang.into(), strings)
            })
            .collect();
        Self { languages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let table = TranslationTable::from_json(
            r#"{"en": {"nav.home": "Home"}, "de": {"nav.home": "Startseite"}}"#,
        )
        .expect("Should parse");

        assert_eq!(table.get("en", "nav.home"), Some("Home"));
        assert_eq!(table.get("de", "nav.home"), Some("Startseite"));
        assert_eq!(table.get("pt", "nav.home"), None);
        assert_eq!(table.get("en", "nav.about"), None);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let result = TranslationTable::from_json(r#"{"en": {"nav": {"home": "Home"}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_is_empty() {
        let table = TranslationTable::default();
        assert!(table.is_empty());
        assert_eq!(table.languages().count(), 0);
    }

    #[test]
    fn test_from_iter() {
        let table: TranslationTable = vec![("en", vec![("a", "A"), ("b", "B")])]
            .into_iter()
            .collect();
        assert_eq!(table.get("en", "b"), Some("B"));
        assert_eq!(table.strings("en").map(HashMap::len), Some(2));
    }
}
