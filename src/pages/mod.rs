//! Route-specific initializers.
//!
//! The router runs the initializer registered for a route after every
//! successful render of it. What the initializer does is its own business;
//! asynchronous work is handed back as an [`InitTask`] so the site loop can
//! keep handling navigation while it runs.

mod gallery;

pub use gallery::{GalleryInitializer, GalleryItem};

use crate::view::View;
use futures::future::BoxFuture;

/// Change to apply to the view once deferred work settles.
pub type ViewPatch = Box<dyn FnOnce(&mut dyn View) + Send>;

/// Deferred initializer work.
pub type InitTask = BoxFuture<'static, ViewPatch>;

pub trait PageInitializer: Send + Sync {
    /// Runs right after the route's fragment has been rendered.
    fn run(&self, view: &mut dyn View) -> Option<InitTask>;
}

/// Plain closures are synchronous initializers.
impl<F> PageInitializer for F
where
    F: Fn(&mut dyn View) + Send + Sync,
{
    fn run(&self, view: &mut dyn View) -> Option<InitTask> {
        self(view);
        None
    }
}
