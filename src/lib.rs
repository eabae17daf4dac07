//! Core of a hash-routed multilingual site: translations, page fragments,
//! routing and the contact form, behind a [`view::View`] rendering surface.

pub mod cache;
pub mod config;
pub mod contact;
pub mod events;
pub mod fetch;
pub mod i18n;
pub mod pages;
pub mod prefs;
pub mod retry;
pub mod route;
pub mod router;
pub mod site;
pub mod view;
