use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Hosting
    pub base_url: String,
    pub translations_path: String,
    pub shell_path: String,

    // Contact form
    pub form_endpoint: Option<String>,

    // Language
    pub prefs_file: String,
    pub language_override: Option<String>,
    pub locales: Vec<String>,

    // Fetching
    pub fetch_max_attempts: u32,
    pub gallery_items: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Hosting
            base_url: std::env::var("SITE_BASE_URL").context("SITE_BASE_URL not set")?,
            translations_path: std::env::var("TRANSLATIONS_PATH")
                .unwrap_or_else(|_| "i18n/translations.json".to_string()),
            shell_path: std::env::var("SHELL_PATH").unwrap_or_else(|_| "index.html".to_string()),

            // Contact form
            form_endpoint: std::env::var("FORM_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            // Language
            prefs_file: std::env::var("PREFS_FILE")
                .unwrap_or_else(|_| ".site-prefs.json".to_string()),
            language_override: std::env::var("SITE_LANG")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            locales: std::env::var("SITE_LOCALES")
                .or_else(|_| std::env::var("LANG"))
                .map(|v| parse_locales(&v))
                .unwrap_or_default(),

            // Fetching
            fetch_max_attempts: std::env::var("FETCH_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(2),
            gallery_items: std::env::var("GALLERY_ITEMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6),
        })
    }
}

/// Split a comma-separated locale list, dropping empty entries.
fn parse_locales(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 10] = [
        "SITE_BASE_URL",
        "TRANSLATIONS_PATH",
        "SHELL_PATH",
        "FORM_ENDPOINT",
        "PREFS_FILE",
        "SITE_LANG",
        "SITE_LOCALES",
        "LANG",
        "FETCH_MAX_ATTEMPTS",
        "GALLERY_ITEMS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_locales() {
        assert_eq!(parse_locales("de-DE, en ,,pt_BR"), vec!["de-DE", "en", "pt_BR"]);
        assert!(parse_locales("").is_empty());
    }

    #[test]
    #[serial]
    fn test_from_env_requires_base_url() {
        clear_env();
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SITE_BASE_URL"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("SITE_BASE_URL", "https://acme.example");

        let config = Config::from_env().unwrap();

        assert_eq!(config.base_url, "https://acme.example");
        assert_eq!(config.translations_path, "i18n/translations.json");
        assert_eq!(config.shell_path, "index.html");
        assert_eq!(config.form_endpoint, None);
        assert_eq!(config.prefs_file, ".site-prefs.json");
        assert_eq!(config.language_override, None);
        assert!(config.locales.is_empty());
        assert_eq!(config.fetch_max_attempts, 2);
        assert_eq!(config.gallery_items, 6);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("SITE_BASE_URL", "https://acme.example");
        std::env::set_var("FORM_ENDPOINT", "https://forms.example/f/abc");
        std::env::set_var("SITE_LANG", "de");
        std::env::set_var("SITE_LOCALES", "pt-BR,en");
        std::env::set_var("LANG", "es_ES.UTF-8");
        std::env::set_var("FETCH_MAX_ATTEMPTS", "0");

        let config = Config::from_env().unwrap();

        assert_eq!(config.form_endpoint.as_deref(), Some("https://forms.example/f/abc"));
        assert_eq!(config.language_override.as_deref(), Some("de"));
        assert_eq!(config.locales, vec!["pt-BR", "en"]);
        assert_eq!(config.fetch_max_attempts, 2);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_locales_default_to_lang() {
        clear_env();
        std::env::set_var("SITE_BASE_URL", "https://acme.example");
        std::env::set_var("LANG", "es_ES.UTF-8");

        let config = Config::from_env().unwrap();

        assert_eq!(config.locales, vec!["es_ES.UTF-8"]);
        clear_env();
    }
}
