use crate::api::Item;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Messages exchanged between cards and the page-level player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "kebab-case")]
pub enum PlaybackEvent {
    /// The player started rendering this item.
    NowPlayingChanged(Item),
    /// A card asked the player to play this item.
    PlayRequested(Item),
}

type Handler = Rc<dyn Fn(&PlaybackEvent)>;

struct BusInner {
    origin: String,
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(u64, Handler)>>,
}

impl BusInner {
    fn is_registered(&self, id: u64) -> bool {
        self.handlers.borrow().iter().any(|(sid, _)| *sid == id)
    }

    fn remove(&self, id: u64) {
        self.handlers.borrow_mut().retain(|(sid, _)| *sid != id);
    }
}

/// In-process publish/subscribe channel for playback events.
///
/// Delivery is synchronous and in subscription order: every subscriber has
/// seen an event before `publish` returns.
#[derive(Clone)]
pub struct PlaybackBus {
    inner: Rc<BusInner>,
}

impl fmt::Debug for PlaybackBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackBus")
            .field("origin", &self.inner.origin)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl PartialEq for PlaybackBus {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PlaybackBus {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(BusInner {
                origin: origin.into(),
                next_id: Cell::new(0),
                handlers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn origin(&self) -> &str {
        &self.inner.origin
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    pub fn subscribe(&self, handler: impl Fn(&PlaybackEvent) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler) as Handler));
        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
            active: Cell::new(true),
        }
    }

    pub fn publish(&self, event: &PlaybackEvent) {
        // Handlers may subscribe, unsubscribe or publish while we iterate.
        let snapshot: Vec<(u64, Handler)> = self.inner.handlers.borrow().clone();
        for (id, handler) in snapshot {
            if self.inner.is_registered(id) {
                handler(event);
            }
        }
    }

    /// Entry point for events coming from outside the process (window
    /// messages). Returns whether the event was delivered.
    pub fn receive(&self, origin: &str, event: &PlaybackEvent) -> bool {
        if origin != self.inner.origin {
            tracing::trace!(origin, expected = %self.inner.origin, "dropping foreign playback event");
            return false;
        }
        self.publish(event);
        true
    }
}

/// Registration handle returned by [`PlaybackBus::subscribe`].
///
/// Released by [`Subscription::unsubscribe`] or on drop, whichever comes
/// first.
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
    active: Cell<bool>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
