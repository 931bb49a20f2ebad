mod playlist;
mod recent_listens;
mod settings;
mod user_pins;

pub use playlist::PlaylistView;
pub use recent_listens::RecentListensView;
pub use settings::SettingsView;
pub use user_pins::UserPinsView;
