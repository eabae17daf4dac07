//! Translation check binary - validates a translations file before deploying it
//!
//! Usage:
//!   cargo run --bin check-translations -- i18n/translations.json
//!
//! Exits with a non-zero status when the table has errors. Warnings (missing
//! keys, markup differences between languages) are printed but do not fail.

use anyhow::{bail, Context, Result};
use polyglot_site::i18n::{Language, TableValidator, TranslationTable};
use std::fs;
use tracing::info;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_site=info".parse()?),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TRANSLATIONS_PATH").ok())
        .unwrap_or_else(|| "i18n/translations.json".to_string());

    info!("Checking translations in {}", path);
    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
    let table = TranslationTable::from_json(&text)
        .with_context(|| format!("{} is not a valid translation table", path))?;

    let fallback = Language::fallback();
    let total = table.strings(fallback.code()).map_or(0, |s| s.len());

    println!("\n{}", "=".repeat(60));
    println!("TRANSLATIONS: {}", path);
    println!("{}", "=".repeat(60));
    let mut languages: Vec<&str> = table.languages().collect();
    languages.sort_unstable();
    for code in languages {
        let count = table.strings(code).map_or(0, |s| s.len());
        let marker = if code == fallback.code() { " (fallback)" } else { "" };
        println!("  {:<4} {:>5}/{} keys{}", code, count, total, marker);
    }

    let report = TableValidator::validate(&table);
    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
    if !report.errors.is_empty() {
        println!("\nErrors:");
        for error in &report.errors {
            println!("  - {}", error);
        }
    }
    println!("{}\n", "=".repeat(60));

    if report.has_errors() {
        bail!("{} error(s) in {}", report.errors.len(), path);
    }
    if report.is_clean() {
        info!("Translations are complete");
    }
    Ok(())
}
