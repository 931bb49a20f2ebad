//! Playback coordination between cards and the shared player.

pub mod bridge;
pub mod bus;
pub mod card;

pub use bus::{PlaybackBus, PlaybackEvent, Subscription};
pub use card::CardPlayback;

/// Origin used for the bus when there is no browser location to ask.
#[cfg(not(target_arch = "wasm32"))]
pub const LOCAL_ORIGIN: &str = "app://brainzcards";

/// Origin of the running page, which is the only origin the bus trusts.
#[cfg(target_arch = "wasm32")]
pub fn current_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn current_origin() -> String {
    LOCAL_ORIGIN.to_string()
}
