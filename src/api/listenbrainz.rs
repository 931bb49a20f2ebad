use crate::api::models::*;
use crate::api::service::{ListenApi, STATUS_OK};
use crate::api::ApiError;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub const DEFAULT_API_URL: &str = "https://api.listenbrainz.org/1";

const JSPF_TRACK_EXTENSION: &str = "https://musicbrainz.org/doc/jspf#track";

#[derive(Debug, Clone, PartialEq)]
pub struct ListenBrainzClient {
    pub api_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PinsResponse {
    #[serde(default)]
    pinned_recordings: Vec<PinnedRecording>,
    #[serde(default, deserialize_with = "deserialize_count")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct ListensResponse {
    payload: ListensPayload,
}

#[derive(Debug, Deserialize)]
struct ListensPayload {
    #[serde(default)]
    listens: Vec<Listen>,
}

#[derive(Debug, Deserialize)]
struct FeedbackResponse {
    #[serde(default)]
    feedback: Vec<RecordingFeedback>,
}

#[derive(Debug, Deserialize)]
struct RecordingFeedback {
    #[serde(default)]
    recording_msid: Option<String>,
    score: FeedbackScore,
}

impl FeedbackResponse {
    fn into_scores(self) -> HashMap<String, FeedbackScore> {
        self.feedback
            .into_iter()
            .filter_map(|entry| Some((entry.recording_msid?, entry.score)))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    playlist: JspfPlaylist,
}

#[derive(Debug, Deserialize)]
struct JspfPlaylist {
    #[serde(default)]
    title: String,
    #[serde(default)]
    creator: String,
    #[serde(default)]
    track: Vec<JspfTrack>,
}

#[derive(Debug, Deserialize)]
struct JspfTrack {
    #[serde(default)]
    identifier: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    creator: String,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    extension: serde_json::Map<String, serde_json::Value>,
}

/// A fetched playlist, tracks in playlist order.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub mbid: String,
    pub title: String,
    pub creator: String,
    pub tracks: Vec<PlaylistTrack>,
}

impl Playlist {
    /// Drops the track at `index`, provided it is still the recording the
    /// caller removed. Repeated recordings are told apart by position.
    pub fn remove_track_at(&mut self, index: usize, identity: &ItemIdentity) -> bool {
        let matches = self
            .tracks
            .get(index)
            .is_some_and(|track| ItemIdentity::Recording(track.id.clone()) == *identity);
        if matches {
            self.tracks.remove(index);
        }
        matches
    }
}

impl From<JspfTrack> for PlaylistTrack {
    fn from(track: JspfTrack) -> Self {
        let id = track
            .identifier
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let extension = track.extension.get(JSPF_TRACK_EXTENSION);
        let field = |name: &str| {
            extension
                .and_then(|ext| ext.get(name))
                .and_then(|value| value.as_str())
                .map(str::to_string)
        };
        PlaylistTrack {
            id,
            added_by: field("added_by"),
            added_at: field("added_at"),
            identifier: track.identifier,
            title: track.title,
            creator: track.creator,
            duration_ms: track.duration,
        }
    }
}

impl ListenBrainzClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        let api_url = api_url.trim().trim_end_matches('/');
        Self {
            api_url: if api_url.is_empty() {
                DEFAULT_API_URL.to_string()
            } else {
                api_url.to_string()
            },
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Unknown error".to_string());
        tracing::debug!(code, %message, "listenbrainz request failed");
        Err(ApiError::Status { code, message })
    }

    async fn post_json(
        &self,
        path: &str,
        auth_token: &str,
        body: serde_json::Value,
    ) -> Result<u16, ApiError> {
        let response = HTTP_CLIENT
            .post(self.endpoint(path))
            .header("Authorization", format!("Token {auth_token}"))
            .json(&body)
            .send()
            .await?;
        let response = Self::checked(response).await?;
        Ok(response.status().as_u16())
    }

    pub async fn get_pins(
        &self,
        user_name: &str,
        offset: u32,
        count: u32,
    ) -> Result<ItemPage, ApiError> {
        let url = self.endpoint(&format!("{}/pins", urlencoding::encode(user_name)));
        let response = HTTP_CLIENT
            .get(&url)
            .query(&[("offset", offset), ("count", count)])
            .send()
            .await?;
        let json: PinsResponse = Self::checked(response).await?.json().await?;

        Ok(ItemPage {
            items: json
                .pinned_recordings
                .into_iter()
                .map(Item::PinnedRecording)
                .collect(),
            total_count: json.total_count,
        })
    }

    pub async fn get_recent_listens(
        &self,
        user_name: &str,
        count: u32,
    ) -> Result<Vec<Listen>, ApiError> {
        let url = self.endpoint(&format!("user/{}/listens", urlencoding::encode(user_name)));
        let response = HTTP_CLIENT
            .get(&url)
            .query(&[("count", count)])
            .send()
            .await?;
        let json: ListensResponse = Self::checked(response).await?.json().await?;
        Ok(json.payload.listens)
    }

    /// The user's stored feedback for the given recordings, keyed by msid.
    /// Recordings without feedback are absent from the map.
    pub async fn get_feedback_for_recordings(
        &self,
        user_name: &str,
        recording_msids: &[&str],
    ) -> Result<HashMap<String, FeedbackScore>, ApiError> {
        if recording_msids.is_empty() {
            return Ok(HashMap::new());
        }
        let url = self.endpoint(&format!(
            "feedback/user/{}/get-feedback-for-recordings",
            urlencoding::encode(user_name)
        ));
        let response = HTTP_CLIENT
            .get(&url)
            .query(&[("recording_msids", recording_msids.join(","))])
            .send()
            .await?;
        let json: FeedbackResponse = Self::checked(response).await?.json().await?;
        Ok(json.into_scores())
    }

    pub async fn get_playlist(&self, playlist_mbid: &str) -> Result<Playlist, ApiError> {
        let url = self.endpoint(&format!("playlist/{}", urlencoding::encode(playlist_mbid)));
        let response = HTTP_CLIENT.get(&url).send().await?;
        let json: PlaylistResponse = Self::checked(response).await?.json().await?;

        Ok(Playlist {
            mbid: playlist_mbid.to_string(),
            title: json.playlist.title,
            creator: json.playlist.creator,
            tracks: json.playlist.track.into_iter().map(PlaylistTrack::from).collect(),
        })
    }

    /// Pins `item` on the user's profile with an optional blurb.
    pub async fn pin_recording(
        &self,
        auth_token: &str,
        item: &Item,
        blurb_content: Option<&str>,
    ) -> Result<u16, ApiError> {
        let blurb = blurb_content.map(str::trim).filter(|b| !b.is_empty());
        self.post_json(
            "pin",
            auth_token,
            json!({
                "recording_msid": item.recording_msid(),
                "recording_mbid": item.recording_mbid(),
                "blurb_content": blurb,
            }),
        )
        .await
    }
}

impl ListenApi for ListenBrainzClient {
    async fn fetch_page(
        &self,
        user_name: &str,
        offset: u32,
        count: u32,
    ) -> Result<ItemPage, ApiError> {
        self.get_pins(user_name, offset, count).await
    }

    async fn submit_feedback(
        &self,
        auth_token: &str,
        recording_msid: &str,
        score: FeedbackScore,
    ) -> Result<u16, ApiError> {
        self.post_json(
            "feedback/recording-feedback",
            auth_token,
            json!({ "recording_msid": recording_msid, "score": score }),
        )
        .await
    }

    async fn delete_listen(
        &self,
        auth_token: &str,
        recording_msid: &str,
        listened_at: i64,
    ) -> Result<u16, ApiError> {
        self.post_json(
            "delete-listen",
            auth_token,
            json!({ "listened_at": listened_at, "recording_msid": recording_msid }),
        )
        .await
    }

    async fn delete_pin(&self, auth_token: &str, row_id: i64) -> Result<u16, ApiError> {
        self.post_json(&format!("pin/delete/{row_id}"), auth_token, json!({}))
            .await
    }

    async fn remove_playlist_item(
        &self,
        auth_token: &str,
        playlist_mbid: &str,
        index: usize,
    ) -> Result<u16, ApiError> {
        self.post_json(
            &format!("playlist/{}/item/delete", urlencoding::encode(playlist_mbid)),
            auth_token,
            json!({ "index": index, "count": 1 }),
        )
        .await
    }

    async fn recommend_to_followers(
        &self,
        user_name: &str,
        auth_token: &str,
        metadata: &RecommendationMetadata,
    ) -> Result<u16, ApiError> {
        let status = self
            .post_json(
                &format!(
                    "user/{}/timeline-event/create/recording",
                    urlencoding::encode(user_name)
                ),
                auth_token,
                json!({ "metadata": metadata }),
            )
            .await?;
        if status != STATUS_OK {
            tracing::debug!(status, "recommendation accepted with non-200 status");
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_is_normalized() {
        assert_eq!(
            ListenBrainzClient::new("https://lb.example/1/ ").api_url,
            "https://lb.example/1"
        );
        assert_eq!(ListenBrainzClient::new("  ").api_url, DEFAULT_API_URL);
        assert_eq!(
            ListenBrainzClient::new("https://lb.example/1").endpoint("/rob/pins"),
            "https://lb.example/1/rob/pins"
        );
    }

    #[test]
    fn pins_response_accepts_string_total() {
        let json = r#"{"pinned_recordings": [], "total_count": "60", "count": 0, "offset": 0}"#;
        let parsed: PinsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.total_count, 60);
    }

    #[test]
    fn stored_feedback_is_keyed_by_msid() {
        let json = r#"{"feedback": [
            {"recording_msid": "msid-1", "score": 1, "user_id": "rob"},
            {"recording_msid": "msid-2", "score": -1, "user_id": "rob"},
            {"recording_mbid": "mbid-only", "score": 1, "user_id": "rob"}
        ]}"#;
        let scores = serde_json::from_str::<FeedbackResponse>(json)
            .unwrap()
            .into_scores();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("msid-1"), Some(&FeedbackScore::Loved));
        assert_eq!(scores.get("msid-2"), Some(&FeedbackScore::Hated));
    }

    #[test]
    fn playlist_removal_drops_the_clicked_occurrence() {
        let track = |id: &str, added_by: &str| PlaylistTrack {
            id: id.to_string(),
            added_by: Some(added_by.to_string()),
            ..PlaylistTrack::default()
        };
        let mut playlist = Playlist {
            mbid: "p".to_string(),
            title: "Mix".to_string(),
            creator: "rob".to_string(),
            tracks: vec![track("a", "rob"), track("b", "x"), track("a", "ana")],
        };

        assert!(!playlist.remove_track_at(1, &ItemIdentity::Recording("a".to_string())));
        assert!(playlist.remove_track_at(2, &ItemIdentity::Recording("a".to_string())));

        let added_by: Vec<_> = playlist
            .tracks
            .iter()
            .filter_map(|t| t.added_by.as_deref())
            .collect();
        assert_eq!(added_by, ["rob", "x"]);
        assert!(!playlist.remove_track_at(5, &ItemIdentity::Recording("a".to_string())));
    }

    #[test]
    fn jspf_track_takes_mbid_from_identifier() {
        let json = r#"{
            "identifier": "https://musicbrainz.org/recording/5b0a1c3e-0000-4000-8000-000000000001",
            "title": "Hyperballad",
            "creator": "Björk",
            "duration": 321000,
            "extension": {
                "https://musicbrainz.org/doc/jspf#track": {"added_by": "rob", "added_at": "2021-05-01T10:00:00Z"}
            }
        }"#;
        let track: PlaylistTrack = serde_json::from_str::<JspfTrack>(json).unwrap().into();
        assert_eq!(track.id, "5b0a1c3e-0000-4000-8000-000000000001");
        assert_eq!(track.added_by.as_deref(), Some("rob"));
        assert_eq!(track.duration_ms, Some(321_000));
    }
}
