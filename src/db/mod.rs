use crate::api::{CurrentUser, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "brainzcards.app_settings";

/// Settings storage failed (sqlite on native, LocalStorage on web).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DbError(String);

impl DbError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        Self(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<gloo_storage::errors::StorageError> for DbError {
    fn from(err: gloo_storage::errors::StorageError) -> Self {
        Self(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

/// App settings stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_removal_grace_ms")]
    pub removal_grace_ms: u64,
    #[serde(default = "default_alert_timeout_ms")]
    pub alert_timeout_ms: u64,
    #[serde(default)]
    pub user: Option<CurrentUser>,
    #[serde(default)]
    pub last_playlist_mbid: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_page_size() -> u32 {
    crate::history::pager::DEFAULT_PAGE_SIZE
}

fn default_removal_grace_ms() -> u64 {
    crate::actions::DEFAULT_REMOVAL_GRACE_MS
}

fn default_alert_timeout_ms() -> u64 {
    6000
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            removal_grace_ms: default_removal_grace_ms(),
            alert_timeout_ms: default_alert_timeout_ms(),
            user: None,
            last_playlist_mbid: None,
        }
    }
}

impl AppSettings {
    /// Normalizes values coming from storage or the settings form.
    pub fn sanitized(mut self) -> Self {
        let url = self.api_url.trim().trim_end_matches('/');
        self.api_url = if url.is_empty() {
            default_api_url()
        } else {
            url.to_string()
        };
        self.page_size = self.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self.user = self
            .user
            .map(|user| CurrentUser::new(user.name, user.auth_token))
            .filter(|user| !user.name.is_empty());
        self.last_playlist_mbid = self
            .last_playlist_mbid
            .map(|mbid| mbid.trim().to_string())
            .filter(|mbid| !mbid.is_empty());
        self
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn save_settings(settings: AppSettings) -> Result<(), DbError> {
    let conn = get_db_connection()?;
    let settings_json = serde_json::to_string(&settings.sanitized())?;

    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES ('app_settings', ?1)",
        [&settings_json],
    )?;
    tracing::debug!("settings saved");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub async fn save_settings(settings: AppSettings) -> Result<(), DbError> {
    LocalStorage::set(SETTINGS_KEY, settings.sanitized())?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load_settings() -> Result<AppSettings, DbError> {
    let conn = get_db_connection()?;

    let result: Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM settings WHERE key = 'app_settings'",
        [],
        |row: &rusqlite::Row| row.get(0),
    );

    match result {
        Ok(json) => Ok(serde_json::from_str::<AppSettings>(&json)?.sanitized()),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(AppSettings::default()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn load_settings() -> Result<AppSettings, DbError> {
    match LocalStorage::get::<AppSettings>(SETTINGS_KEY) {
        Ok(settings) => Ok(settings.sanitized()),
        Err(_) => Ok(AppSettings::default()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn initialize_database() -> Result<(), DbError> {
    let conn = get_db_connection()?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub async fn initialize_database() -> Result<(), DbError> {
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn get_db_connection() -> Result<rusqlite::Connection, DbError> {
    let data_dir = dirs::data_dir()
        .map(|dir| dir.join("brainzcards"))
        .unwrap_or_else(|| std::path::PathBuf::from(".brainzcards"));
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| DbError::new(format!("Failed to create data directory: {}", e)))?;

    rusqlite::Connection::open(data_dir.join("brainzcards.db"))
        .map_err(|e| DbError::new(format!("Failed to open database: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_and_trims() {
        let settings = AppSettings {
            api_url: " https://api.example.org/1/ ".to_string(),
            page_size: 500,
            user: Some(CurrentUser::new("  ", "token")),
            last_playlist_mbid: Some("   ".to_string()),
            ..AppSettings::default()
        }
        .sanitized();

        assert_eq!(settings.api_url, "https://api.example.org/1");
        assert_eq!(settings.page_size, MAX_PAGE_SIZE);
        assert_eq!(settings.user, None);
        assert_eq!(settings.last_playlist_mbid, None);

        let zero = AppSettings {
            page_size: 0,
            api_url: String::new(),
            ..AppSettings::default()
        }
        .sanitized();
        assert_eq!(zero.page_size, MIN_PAGE_SIZE);
        assert_eq!(zero.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"page_size": 10}"#).expect("partial settings parse");
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.removal_grace_ms, 1000);
        assert_eq!(settings.alert_timeout_ms, 6000);
    }
}
