//! Site-wide notifications.
//!
//! Components never call each other to announce state changes; they publish a
//! [`SiteEvent`] on the [`EventBus`] and whoever cares subscribes.

use crate::i18n::Language;
use tokio::sync::broadcast;
use tracing::debug;

const BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    /// The active language changed; carries the new language.
    LanguageChanged(Language),

    /// A route's fragment was rendered into the content region.
    RouteRendered { route: String },

    /// A route's fragment could not be fetched; the error view is showing.
    RouteFailed { route: String },
}

/// Typed publish/subscribe channel.
///
/// Cloning the bus yields another handle onto the same channel. Events are
/// delivered to every subscriber in publish order.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SiteEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: SiteEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            debug!("No subscribers for {:?}", event);
        }
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SiteEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
