//! Item cards and the hooks they share.

mod listen_card;
mod playlist_item_card;

pub use listen_card::*;
pub use playlist_item_card::*;

use crate::actions::{ListActions, RemovalCanceller};
use crate::api::{FeedbackScore, Item, ListenBrainzClient};
use crate::components::AlertQueue;
use crate::db::AppSettings;
use crate::playback::{CardPlayback, PlaybackBus};
use crate::session::Session;
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub type CardActions = ListActions<ListenBrainzClient, AlertQueue>;

/// Subscribes the card to the playback bus for as long as it is mounted.
pub fn use_card_playback(item: &Item) -> (Signal<bool>, Rc<CardPlayback>) {
    let bus = use_context::<PlaybackBus>();
    let playing = use_signal(|| false);
    let card = use_hook(|| {
        Rc::new(CardPlayback::mount(&bus, item.clone(), move |now| {
            let mut playing = playing;
            playing.set(now);
        }))
    });

    use_drop({
        let card = card.clone();
        move || card.unmount()
    });

    (playing, card)
}

/// Builds the actions for one user interaction from the live session.
pub fn card_actions(
    session: &Session<ListenBrainzClient>,
    alerts: AlertQueue,
    settings: &AppSettings,
    on_feedback: Option<EventHandler<(String, FeedbackScore)>>,
) -> CardActions {
    let actions = ListActions::new(session.clone(), alerts)
        .with_grace(Duration::from_millis(settings.removal_grace_ms));
    match on_feedback {
        Some(handler) => actions.with_feedback_listener(move |msid, score| {
            handler.call((msid.to_string(), score))
        }),
        None => actions,
    }
}

/// Holds the cancel handle of a pending removal and fires it on unmount.
pub fn use_removal_slot() -> Rc<RefCell<Option<RemovalCanceller>>> {
    let slot = use_hook(|| Rc::new(RefCell::new(None::<RemovalCanceller>)));
    use_drop({
        let slot = slot.clone();
        move || {
            if let Some(canceller) = slot.borrow_mut().take() {
                canceller.cancel();
            }
        }
    });
    slot
}
