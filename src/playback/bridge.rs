//! Translation between bus events and the page-level player's window
//! messages.
//!
//! The player speaks the legacy BrainzPlayer dialect: requests go out as
//! `{brainzplayer_event: "play-listen", payload}` and confirmations come back
//! as `{type: "current-listen-change", payload}`. Messages in the bus' own
//! `{kind, item}` shape are accepted too. Only confirmations are ever read
//! from the window, so requests we post ourselves are never echoed back onto
//! the bus.

use crate::api::{Item, Listen};
use crate::playback::bus::PlaybackEvent;
use serde_json::{json, Value};

const LEGACY_PLAY_EVENT: &str = "play-listen";
const LEGACY_NOW_PLAYING: &str = "current-listen-change";

/// Outgoing window message for a play request.
pub fn encode_play_request(item: &Item) -> Value {
    let payload = match item {
        Item::Listen(listen) => serde_json::to_value(listen),
        other => serde_json::to_value(other),
    };
    json!({
        "brainzplayer_event": LEGACY_PLAY_EVENT,
        "payload": payload.unwrap_or(Value::Null),
    })
}

/// Incoming window message, if it is a now-playing confirmation.
pub fn decode_window_message(data: &Value) -> Option<PlaybackEvent> {
    if let Some(kind) = data.get("type").and_then(Value::as_str) {
        if kind != LEGACY_NOW_PLAYING {
            return None;
        }
        let payload = data.get("payload")?;
        let item = serde_json::from_value::<Item>(payload.clone())
            .ok()
            .or_else(|| {
                serde_json::from_value::<Listen>(payload.clone())
                    .ok()
                    .map(Item::Listen)
            })?;
        return Some(PlaybackEvent::NowPlayingChanged(item));
    }

    match serde_json::from_value::<PlaybackEvent>(data.clone()).ok()? {
        event @ PlaybackEvent::NowPlayingChanged(_) => Some(event),
        PlaybackEvent::PlayRequested(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::fixtures::{listen, pin};

    #[test]
    fn legacy_confirmation_becomes_now_playing() {
        let item = listen("rob", 1, "Roads");
        let Item::Listen(inner) = &item else { unreachable!() };
        let message = json!({ "type": LEGACY_NOW_PLAYING, "payload": inner });

        assert_eq!(
            decode_window_message(&message),
            Some(PlaybackEvent::NowPlayingChanged(item))
        );
    }

    #[test]
    fn bus_shaped_confirmation_is_accepted() {
        let event = PlaybackEvent::NowPlayingChanged(pin(4, "Angel"));
        let message = serde_json::to_value(&event).unwrap();
        assert_eq!(decode_window_message(&message), Some(event));
    }

    #[test]
    fn requests_and_noise_are_ignored() {
        let request = encode_play_request(&listen("rob", 1, "Roads"));
        assert_eq!(decode_window_message(&request), None);

        let own_request = serde_json::to_value(PlaybackEvent::PlayRequested(pin(1, "x"))).unwrap();
        assert_eq!(decode_window_message(&own_request), None);

        assert_eq!(decode_window_message(&json!({"type": "webpackOk"})), None);
        assert_eq!(decode_window_message(&json!("hello")), None);
    }

    #[test]
    fn play_request_uses_player_dialect() {
        let message = encode_play_request(&listen("rob", 1, "Roads"));
        assert_eq!(message["brainzplayer_event"], "play-listen");
        assert_eq!(message["payload"]["track_metadata"]["track_name"], "Roads");
    }
}
