use super::{InitTask, PageInitializer, ViewPatch};
use crate::fetch::FragmentSource;
use crate::view::View;
use futures::future::{join_all, FutureExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One gallery entry: the element to fill and the fragment to fill it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub slot: String,
    pub locator: String,
}

impl GalleryItem {
    pub fn new(slot: &str, locator: &str) -> Self {
        Self {
            slot: slot.to_string(),
            locator: locator.to_string(),
        }
    }
}

/// Loads every gallery item in parallel.
///
/// A failed item leaves its slot empty without affecting the others. The
/// loading indicator is removed once every fetch has settled.
pub struct GalleryInitializer {
    source: Arc<dyn FragmentSource>,
    items: Vec<GalleryItem>,
    loading_id: String,
}

impl GalleryInitializer {
    pub fn new(source: Arc<dyn FragmentSource>, items: Vec<GalleryItem>) -> Self {
        Self {
            source,
            items,
            loading_id: "gallery-loading".to_string(),
        }
    }

    pub fn with_loading_id(mut self, id: &str) -> Self {
        self.loading_id = id.to_string();
        self
    }

    /// The site's case-study gallery: `gallery-1` .. `gallery-<count>`, each
    /// filled from `fragments/gallery/<n>.html`.
    pub fn numbered(source: Arc<dyn FragmentSource>, count: usize) -> Self {
        let items = (1..=count)
            .map(|n| {
                GalleryItem::new(
                    &format!("gallery-{}", n),
                    &format!("fragments/gallery/{}.html", n),
                )
            })
            .collect();
        Self::new(source, items)
    }
}

impl PageInitializer for GalleryInitializer {
    fn run(&self, _view: &mut dyn View) -> Option<InitTask> {
        let loading_id = self.loading_id.clone();
        let fetches: Vec<_> = self
            .items
            .iter()
            .map(|item| {
                let slot = item.slot.clone();
                let fetch = self.source.fetch(&item.locator);
                async move { (slot, fetch.await) }
            })
            .collect();

        let task = async move {
            let results = join_all(fetches).await;
            let loaded = results.iter().filter(|(_, r)| r.is_ok()).count();
            info!("Gallery: {}/{} items loaded", loaded, results.len());

            let patch: ViewPatch = Box::new(move |view: &mut dyn View| {
                for (slot, result) in results {
                    match result {
                        Ok(html) => {
                            if !view.fill_slot(&slot, &html) {
                                debug!("Gallery slot {} is not on the page", slot);
                            }
                        }
                        Err(e) => warn!("Gallery item {} unavailable: {}", slot, e),
                    }
                }
                view.remove_element(&loading_id);
            });
            patch
        };

        Some(task.boxed())
    }
}
