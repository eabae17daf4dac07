//! Internationalization (i18n) for the site.
//!
//! # Architecture
//!
//! - `registry`: the fixed set of published languages and their metadata
//! - `language`: validated `Language` type
//! - `table`: the loaded language -> key -> string table
//! - `store`: the `Translator`, owning the active language and lookups
//! - `detect`: startup language selection
//! - `validator`: coverage and markup checks on a loaded table
//! - `metrics`: lookup counters
//!
//! # Example
//!
//! ```rust,ignore
//! use polyglot_site::i18n::{detect_language, Translator};
//!
//! let language = detect_language(None, &prefs, &locales);
//! let mut i18n = Translator::new(language, Box::new(prefs), bus);
//! i18n.load(&source, "i18n/translations.json").await;
//! let title = i18n.t("page.home.title");
//! ```

mod detect;
mod language;
mod metrics;
mod registry;
mod store;
mod table;
mod validator;

pub use detect::detect_language;
pub use language::{I18nError, Language};
pub use metrics::{LookupMetrics, MetricsReport};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use store::Translator;
pub use table::{Strings, TranslationTable};
pub use validator::{TableValidator, ValidationReport};
