//! Page cache: fetched fragment text keyed by route name.

use std::collections::HashMap;

/// Session-long memo of fetched fragments.
///
/// Entries are never evicted or refreshed; the route set is small and fixed.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    pages: HashMap<String, String>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, route: &str) -> Option<&str> {
        self.pages.get(route).map(String::as_str)
    }

    /// Store fragment text, replacing any earlier entry for the route.
    pub fn put(&mut self, route: &str, text: impl Into<String>) {
        self.pages.insert(route.to_string(), text.into());
    }

    pub fn contains(&self, route: &str) -> bool {
        self.pages.contains_key(route)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
