//! Rendering surface.
//!
//! The router, translation store and contact form only talk to a [`View`];
//! they never touch markup directly. [`MemoryView`] implements the trait over
//! HTML text for headless use and tests.

pub mod markup;
mod memory;

pub use memory::MemoryView;

/// State of the contact form's status area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    /// Some fields failed their shape checks; nothing was sent.
    Invalid,
    /// Submission in progress.
    Sending,
    /// Submission accepted (or silently dropped by the bot trap).
    Sent,
    /// Submission failed; the form stays editable.
    Failed,
}

pub trait View {
    /// Replace the content region's markup.
    fn set_content(&mut self, html: &str);

    /// Re-apply translations to every marked element, shell and content.
    fn localize(&mut self, lookup: &dyn Fn(&str) -> String);

    /// Set the document's `lang` attribute.
    fn set_document_language(&mut self, code: &str);

    /// Mark the language-selector control for `code` as active.
    fn set_active_language(&mut self, code: &str);

    /// Mark the nav link for `route` as the current page, and no other.
    fn set_current_nav(&mut self, route: &str);

    fn title(&self) -> &str;
    fn set_title(&mut self, title: &str);
    fn description(&self) -> &str;
    fn set_description(&mut self, description: &str);

    fn scroll_to_top(&mut self);

    /// Replace the content of the element with id `slot`. Returns false if no
    /// such element is on the page.
    fn fill_slot(&mut self, slot: &str, html: &str) -> bool;

    /// Remove the element with the given id. Returns false if absent.
    fn remove_element(&mut self, id: &str) -> bool;

    fn mark_field_invalid(&mut self, field: &str, invalid: bool);
    fn show_form_status(&mut self, status: FormStatus);
}
