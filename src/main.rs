//! Headless site driver.
//!
//! Usage:
//!   polyglot-site [initial-hash]
//!
//! Reads commands from stdin, one per line:
//!   go <route>        navigate programmatically
//!   #<hash>           simulate a hash change
//!   back | forward    history navigation
//!   lang <code>       switch language
//!   submit <name>|<email>|<message>
//!   show              print the rendered page
//!   quit
//!
//! Required environment variables:
//! - SITE_BASE_URL
//!
//! Optional: TRANSLATIONS_PATH, SHELL_PATH, FORM_ENDPOINT, PREFS_FILE,
//! SITE_LANG, SITE_LOCALES, FETCH_MAX_ATTEMPTS, GALLERY_ITEMS

use anyhow::Result;
use polyglot_site::config::Config;
use polyglot_site::contact::{ContactClient, ContactForm};
use polyglot_site::fetch::{FragmentSource, HttpFragmentSource};
use polyglot_site::pages::GalleryInitializer;
use polyglot_site::prefs::FilePreferences;
use polyglot_site::retry::RetryConfig;
use polyglot_site::route::site_routes;
use polyglot_site::site::{self, Input, Site, SiteOptions};
use polyglot_site::view::{MemoryView, View};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

enum Command {
    Input(Input),
    Submit(ContactForm),
    Show,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.starts_with('#') {
        return Some(Command::Input(Input::HashChange(line.to_string())));
    }

    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match verb {
        "go" if !rest.is_empty() => Some(Command::Input(Input::Navigate(rest.to_string()))),
        "lang" if !rest.is_empty() => Some(Command::Input(Input::SetLanguage(rest.to_string()))),
        "back" => Some(Command::Input(Input::Back)),
        "forward" => Some(Command::Input(Input::Forward)),
        "submit" => {
            let mut parts = rest.splitn(3, '|').map(str::trim);
            Some(Command::Submit(ContactForm {
                name: parts.next().unwrap_or_default().to_string(),
                email: parts.next().unwrap_or_default().to_string(),
                message: parts.next().unwrap_or_default().to_string(),
                ..ContactForm::default()
            }))
        }
        "show" => Some(Command::Show),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn print_page(site: &Site<MemoryView>) {
    let view = site.view();
    println!("\n{}", "=".repeat(60));
    println!("Route:       {}", site.current_route());
    println!("Language:    {}", site.translator().language());
    println!("Title:       {}", view.title());
    println!("Description: {}", view.description());
    let nav: Vec<String> = view
        .nav_links()
        .into_iter()
        .map(|(route, current)| if current { format!("[{}]", route) } else { route })
        .collect();
    println!("Nav:         {}", nav.join(" "));
    println!("{}", "-".repeat(60));
    println!("{}", view.content());
    println!("{}\n", "=".repeat(60));
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_site=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting site driver for {}", config.base_url);

    let source = Arc::new(HttpFragmentSource::new(&config.base_url).with_retry(RetryConfig {
        max_attempts: config.fetch_max_attempts,
        ..RetryConfig::fragment()
    }));

    let view = match source.fetch(&config.shell_path).await {
        Ok(shell) => MemoryView::new(&shell),
        Err(e) => {
            warn!("Shell unavailable, using a plain one: {}", e);
            MemoryView::with_default_shell(&site_routes())
        }
    };

    let mut options = SiteOptions::from_config(&config);
    if let Some(hash) = std::env::args().nth(1) {
        options.initial_hash = hash;
    }
    let prefs = FilePreferences::open(&config.prefs_file);

    let mut site = site::build(source.clone(), Box::new(prefs), view, options).await;
    site.register_initializer(
        "gallery",
        Arc::new(GalleryInitializer::numbered(source.clone(), config.gallery_items)),
    );
    if let Some(endpoint) = &config.form_endpoint {
        site = site.with_contact(ContactClient::new(endpoint));
    }

    site.init();
    site.settle().await;
    print_page(&site);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(Command::Input(input)) => {
                site.dispatch(input);
                site.settle().await;
                println!("-> {} ({})", site.current_route(), site.translator().language());
            }
            Some(Command::Submit(form)) => {
                let status = site.submit_contact(&form).await;
                println!("-> form {:?}", status);
            }
            Some(Command::Show) => print_page(&site),
            Some(Command::Quit) => break,
            None => println!("Unknown command: {}", line.trim()),
        }
    }

    info!("{}", site.translator().metrics().report().format_summary());
    Ok(())
}
