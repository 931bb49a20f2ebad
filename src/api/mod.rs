pub mod error;
pub mod listenbrainz;
pub mod models;
pub mod service;

pub use error::ApiError;
pub use listenbrainz::{ListenBrainzClient, Playlist, DEFAULT_API_URL};
pub use models::*;
pub use service::{ListenApi, STATUS_OK};
