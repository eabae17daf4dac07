use super::markup;
use super::{FormStatus, View};
use crate::i18n::LanguageRegistry;
use crate::route::RouteTable;
use std::collections::BTreeSet;

/// Headless [`View`] keeping the page as HTML text.
///
/// The shell (header, nav, footer) is fixed at construction; nav links are the
/// shell elements carrying `data-nav="<route>"` and language-selector controls
/// those carrying `data-lang="<code>"`.
#[derive(Debug, Clone)]
pub struct MemoryView {
    shell: String,
    content: String,
    nav_routes: Vec<String>,
    languages: Vec<String>,
    current_nav: Option<String>,
    active_language: Option<String>,
    document_language: String,
    title: String,
    description: String,
    scroll_offset: u32,
    invalid_fields: BTreeSet<String>,
    form_status: Option<FormStatus>,
    content_writes: usize,
}

impl MemoryView {
    pub fn new(shell: &str) -> Self {
        let elements = markup::elements(shell);
        let nav_routes = elements
            .iter()
            .filter_map(|el| el.attr("data-nav"))
            .map(str::to_string)
            .collect();
        let languages = elements
            .iter()
            .filter_map(|el| el.attr("data-lang"))
            .map(str::to_string)
            .collect();

        Self {
            shell: shell.to_string(),
            content: String::new(),
            nav_routes,
            languages,
            current_nav: None,
            active_language: None,
            document_language: String::new(),
            title: String::new(),
            description: String::new(),
            scroll_offset: 0,
            invalid_fields: BTreeSet::new(),
            form_status: None,
            content_writes: 0,
        }
    }

    /// A plain shell with one nav link per route and one selector button per
    /// enabled language.
    pub fn with_default_shell(routes: &RouteTable) -> Self {
        let links: String = routes
            .names()
            .map(|name| {
                format!(
                    r##"<a data-nav="{0}" href="#{0}" data-i18n="nav.{0}">{0}</a>"##,
                    name
                )
            })
            .collect();
        let buttons: String = LanguageRegistry::get()
            .list_enabled()
            .iter()
            .map(|lang| {
                format!(
                    r#"<button data-lang="{}">{}</button>"#,
                    lang.code, lang.native_name
                )
            })
            .collect();

        Self::new(&format!(
            r#"<header><nav>{}</nav><div class="lang-switch">{}</div></header><footer><p data-i18n="footer.rights">All rights reserved.</p></footer>"#,
            links, buttons
        ))
    }

    /// Seed the document title and description, as the static page would.
    pub fn with_meta(mut self, title: &str, description: &str) -> Self {
        self.title = title.to_string();
        self.description = description.to_string();
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Current content of every element marked with `key`, shell first.
    pub fn texts(&self, key: &str) -> Vec<String> {
        [&self.shell, &self.content]
            .into_iter()
            .flat_map(|html| {
                markup::marked(html)
                    .into_iter()
                    .filter(|item| item.key == key)
                    .map(|item| html[item.inner].to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Keys of every marked element currently on the page.
    pub fn marked_keys(&self) -> Vec<String> {
        [&self.shell, &self.content]
            .into_iter()
            .flat_map(|html| markup::marked(html).into_iter().map(|item| item.key))
            .collect()
    }

    /// Nav routes with their "current page" flag.
    pub fn nav_links(&self) -> Vec<(String, bool)> {
        self.nav_routes
            .iter()
            .map(|route| (route.clone(), self.current_nav.as_deref() == Some(route)))
            .collect()
    }

    pub fn current_nav(&self) -> Option<&str> {
        self.current_nav.as_deref()
    }

    pub fn active_language(&self) -> Option<&str> {
        self.active_language.as_deref()
    }

    pub fn document_language(&self) -> &str {
        &self.document_language
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn scroll_by(&mut self, delta: u32) {
        self.scroll_offset = self.scroll_offset.saturating_add(delta);
    }

    pub fn is_invalid(&self, field: &str) -> bool {
        self.invalid_fields.contains(field)
    }

    pub fn form_status(&self) -> Option<FormStatus> {
        self.form_status
    }

    /// Number of times the content region was replaced.
    pub fn content_writes(&self) -> usize {
        self.content_writes
    }

    /// Whether an element with this id is in the content region.
    pub fn has_element(&self, id: &str) -> bool {
        markup::find_by_id(&self.content, id).is_some()
    }
}

impl View for MemoryView {
    fn set_content(&mut self, html: &str) {
        self.content = html.to_string();
        self.content_writes += 1;
    }

    fn localize(&mut self, lookup: &dyn Fn(&str) -> String) {
        self.shell = markup::localize(&self.shell, lookup);
        self.content = markup::localize(&self.content, lookup);
    }

    fn set_document_language(&mut self, code: &str) {
        self.document_language = code.to_string();
    }

    fn set_active_language(&mut self, code: &str) {
        self.active_language = self
            .languages
            .iter()
            .find(|lang| *lang == code)
            .cloned();
    }

    fn set_current_nav(&mut self, route: &str) {
        self.current_nav = self
            .nav_routes
            .iter()
            .find(|nav| *nav == route)
            .cloned();
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    fn fill_slot(&mut self, slot: &str, html: &str) -> bool {
        match markup::replace_inner(&self.content, slot, html) {
            Some(content) => {
                self.content = content;
                true
            }
            None => false,
        }
    }

    fn remove_element(&mut self, id: &str) -> bool {
        match markup::remove_by_id(&self.content, id) {
            Some(content) => {
                self.content = content;
                true
            }
            None => false,
        }
    }

    fn mark_field_invalid(&mut self, field: &str, invalid: bool) {
        if invalid {
            self.invalid_fields.insert(field.to_string());
        } else {
            self.invalid_fields.remove(field);
        }
    }

    fn show_form_status(&mut self, status: FormStatus) {
        self.form_status = Some(status);
    }
}
