use crate::api::Item;
use crate::playback::bus::{PlaybackBus, PlaybackEvent, Subscription};
use std::cell::Cell;
use std::rc::Rc;

/// Per-card view of the shared player: "am I the item being played?"
///
/// The flag only changes when the player confirms with
/// `NowPlayingChanged`; asking to play does not flip it.
pub struct CardPlayback {
    item: Item,
    bus: PlaybackBus,
    playing: Rc<Cell<bool>>,
    subscription: Subscription,
}

impl CardPlayback {
    /// Subscribes the card. `on_change` runs whenever the flag flips.
    pub fn mount(bus: &PlaybackBus, item: Item, on_change: impl Fn(bool) + 'static) -> Self {
        let playing = Rc::new(Cell::new(false));
        let subscription = {
            let playing = Rc::clone(&playing);
            let own = item.clone();
            bus.subscribe(move |event| {
                let PlaybackEvent::NowPlayingChanged(current) = event else {
                    return;
                };
                let now = *current == own;
                if playing.replace(now) != now {
                    on_change(now);
                }
            })
        };

        Self {
            item,
            bus: bus.clone(),
            playing,
            subscription,
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    /// Asks the player for this card's item. Returns `false` when the item
    /// is already playing and nothing was sent.
    pub fn play(&self) -> bool {
        if self.is_playing() {
            return false;
        }
        tracing::debug!(track = self.item.track_name(), "requesting playback");
        self.bus
            .publish(&PlaybackEvent::PlayRequested(self.item.clone()));
        true
    }

    pub fn unmount(&self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::fixtures::{listen, pin};
    use std::cell::RefCell;

    fn cards(bus: &PlaybackBus, items: &[Item]) -> Vec<CardPlayback> {
        items
            .iter()
            .map(|item| CardPlayback::mount(bus, item.clone(), |_| {}))
            .collect()
    }

    fn playing_count(cards: &[CardPlayback]) -> usize {
        cards.iter().filter(|c| c.is_playing()).count()
    }

    #[test]
    fn exactly_one_card_plays_matching_item() {
        let bus = PlaybackBus::new("app://local");
        let items = vec![listen("rob", 1, "Roads"), listen("rob", 2, "Sour Times"), pin(3, "Teardrop")];
        let cards = cards(&bus, &items);

        bus.publish(&PlaybackEvent::NowPlayingChanged(items[1].clone()));
        assert_eq!(playing_count(&cards), 1);
        assert!(cards[1].is_playing());

        bus.publish(&PlaybackEvent::NowPlayingChanged(items[2].clone()));
        assert_eq!(playing_count(&cards), 1);
        assert!(cards[2].is_playing());
        assert!(!cards[1].is_playing());
    }

    #[test]
    fn unknown_item_turns_every_card_off() {
        let bus = PlaybackBus::new("app://local");
        let items = vec![listen("rob", 1, "Roads"), listen("rob", 2, "Sour Times")];
        let cards = cards(&bus, &items);

        bus.publish(&PlaybackEvent::NowPlayingChanged(items[0].clone()));
        bus.publish(&PlaybackEvent::NowPlayingChanged(listen("ana", 9, "Glory Box")));
        assert_eq!(playing_count(&cards), 0);
    }

    #[test]
    fn play_waits_for_confirmation() {
        let bus = PlaybackBus::new("app://local");
        let requests = Rc::new(RefCell::new(Vec::new()));
        let _player = {
            let requests = Rc::clone(&requests);
            bus.subscribe(move |event| {
                if let PlaybackEvent::PlayRequested(item) = event {
                    requests.borrow_mut().push(item.clone());
                }
            })
        };
        let card = CardPlayback::mount(&bus, listen("rob", 1, "Roads"), |_| {});

        assert!(card.play());
        assert!(!card.is_playing());
        assert_eq!(requests.borrow().len(), 1);

        bus.publish(&PlaybackEvent::NowPlayingChanged(card.item().clone()));
        assert!(card.is_playing());

        assert!(!card.play());
        assert_eq!(requests.borrow().len(), 1);
    }

    #[test]
    fn change_callback_fires_only_on_flips() {
        let bus = PlaybackBus::new("app://local");
        let flips = Rc::new(RefCell::new(Vec::new()));
        let item = listen("rob", 1, "Roads");
        let _card = {
            let flips = Rc::clone(&flips);
            CardPlayback::mount(&bus, item.clone(), move |now| flips.borrow_mut().push(now))
        };

        bus.publish(&PlaybackEvent::NowPlayingChanged(item.clone()));
        bus.publish(&PlaybackEvent::NowPlayingChanged(item.clone()));
        bus.publish(&PlaybackEvent::NowPlayingChanged(listen("rob", 2, "Mysterons")));

        assert_eq!(*flips.borrow(), vec![true, false]);
    }

    #[test]
    fn unmounted_card_stops_listening() {
        let bus = PlaybackBus::new("app://local");
        let item = listen("rob", 1, "Roads");
        let card = CardPlayback::mount(&bus, item.clone(), |_| {});
        card.unmount();
        card.unmount();

        bus.publish(&PlaybackEvent::NowPlayingChanged(item));
        assert!(!card.is_playing());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
