use serde::{Deserialize, Deserializer, Serialize};

/// The signed-in user. Only the name and token are known to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    pub auth_token: String,
}

impl CurrentUser {
    pub fn new(name: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            auth_token: auth_token.into().trim().to_string(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdditionalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_msid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_mbid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_msid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackMetadata {
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub track_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    #[serde(default)]
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Listen {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listened_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listened_at_iso: Option<String>,
    #[serde(default)]
    pub playing_now: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub track_metadata: TrackMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PinnedRecording {
    pub row_id: i64,
    #[serde(default)]
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurb_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_msid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_mbid: Option<String>,
    #[serde(default)]
    pub track_metadata: TrackMetadata,
}

/// A track inside a playlist. `id` is the recording MBID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlaylistTrack {
    pub id: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

/// Anything a card can render and the player can play.
///
/// Equality is structural over the whole value, which is what playback
/// matching relies on: two items are "the same" only if identity and
/// metadata agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Listen(Listen),
    PinnedRecording(PinnedRecording),
    PlaylistTrack(PlaylistTrack),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemIdentity {
    Listen {
        listened_at: i64,
        track_name: String,
        user_name: String,
    },
    Pin(i64),
    Recording(String),
}

impl Item {
    pub fn identity(&self) -> ItemIdentity {
        match self {
            Item::Listen(listen) => match (listen.listened_at, listen.user_name.as_ref()) {
                (Some(listened_at), Some(user_name)) => ItemIdentity::Listen {
                    listened_at,
                    track_name: listen.track_metadata.track_name.clone(),
                    user_name: user_name.clone(),
                },
                _ => ItemIdentity::Recording(
                    listen
                        .track_metadata
                        .additional_info
                        .recording_msid
                        .clone()
                        .unwrap_or_else(|| listen.track_metadata.track_name.clone()),
                ),
            },
            Item::PinnedRecording(pin) => ItemIdentity::Pin(pin.row_id),
            Item::PlaylistTrack(track) => ItemIdentity::Recording(track.id.clone()),
        }
    }

    pub fn track_name(&self) -> &str {
        match self {
            Item::Listen(listen) => &listen.track_metadata.track_name,
            Item::PinnedRecording(pin) => &pin.track_metadata.track_name,
            Item::PlaylistTrack(track) => &track.title,
        }
    }

    pub fn artist_name(&self) -> &str {
        match self {
            Item::Listen(listen) => &listen.track_metadata.artist_name,
            Item::PinnedRecording(pin) => &pin.track_metadata.artist_name,
            Item::PlaylistTrack(track) => &track.creator,
        }
    }

    pub fn release_name(&self) -> Option<&str> {
        match self {
            Item::Listen(listen) => listen.track_metadata.release_name.as_deref(),
            Item::PinnedRecording(pin) => pin.track_metadata.release_name.as_deref(),
            Item::PlaylistTrack(_) => None,
        }
    }

    /// The messybrainz id used by feedback and deletion endpoints.
    pub fn recording_msid(&self) -> Option<&str> {
        let msid = match self {
            Item::Listen(listen) => listen.track_metadata.additional_info.recording_msid.as_deref(),
            Item::PinnedRecording(pin) => pin
                .recording_msid
                .as_deref()
                .or(pin.track_metadata.additional_info.recording_msid.as_deref()),
            Item::PlaylistTrack(_) => None,
        };
        msid.filter(|value| !value.is_empty())
    }

    pub fn recording_mbid(&self) -> Option<&str> {
        let mbid = match self {
            Item::Listen(listen) => listen.track_metadata.additional_info.recording_mbid.as_deref(),
            Item::PinnedRecording(pin) => pin
                .recording_mbid
                .as_deref()
                .or(pin.track_metadata.additional_info.recording_mbid.as_deref()),
            Item::PlaylistTrack(track) => Some(track.id.as_str()),
        };
        mbid.filter(|value| !value.is_empty())
    }

    pub fn listened_at(&self) -> Option<i64> {
        match self {
            Item::Listen(listen) => listen.listened_at,
            _ => None,
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        match self {
            Item::Listen(listen) => listen.user_name.as_deref(),
            _ => None,
        }
    }
}

/// Love / hate score of the current user for a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum FeedbackScore {
    Hated,
    #[default]
    Neutral,
    Loved,
}

impl FeedbackScore {
    /// Requesting the score that is already set clears it.
    pub fn toggled(current: FeedbackScore, requested: FeedbackScore) -> FeedbackScore {
        if current == requested {
            FeedbackScore::Neutral
        } else {
            requested
        }
    }

    pub fn value(self) -> i8 {
        match self {
            FeedbackScore::Hated => -1,
            FeedbackScore::Neutral => 0,
            FeedbackScore::Loved => 1,
        }
    }
}

impl From<FeedbackScore> for i8 {
    fn from(score: FeedbackScore) -> Self {
        score.value()
    }
}

impl TryFrom<i8> for FeedbackScore {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(FeedbackScore::Hated),
            0 => Ok(FeedbackScore::Neutral),
            1 => Ok(FeedbackScore::Loved),
            other => Err(format!("invalid feedback score {other}")),
        }
    }
}

/// One windowed slice of a server-side list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total_count: u64,
}

/// Payload for recommending a recording to followers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationMetadata {
    pub artist_name: String,
    pub track_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_mbid: Option<String>,
    pub recording_msid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_msid: Option<String>,
}

impl RecommendationMetadata {
    /// Only items with artist, track and msid can be recommended.
    pub fn from_item(item: &Item) -> Option<Self> {
        let recording_msid = item.recording_msid()?.to_string();
        if item.artist_name().is_empty() || item.track_name().is_empty() {
            return None;
        }
        let artist_msid = match item {
            Item::Listen(listen) => listen.track_metadata.additional_info.artist_msid.clone(),
            Item::PinnedRecording(pin) => pin.track_metadata.additional_info.artist_msid.clone(),
            Item::PlaylistTrack(_) => None,
        };
        Some(Self {
            artist_name: item.artist_name().to_string(),
            track_name: item.track_name().to_string(),
            release_name: item.release_name().map(str::to_string),
            recording_mbid: item.recording_mbid().map(str::to_string),
            recording_msid,
            artist_msid,
        })
    }
}

/// Counts arrive either as numbers or as numeric strings.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(value) => Ok(value),
        Count::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn listen(user: &str, listened_at: i64, track: &str) -> Item {
        Item::Listen(Listen {
            listened_at: Some(listened_at),
            listened_at_iso: None,
            playing_now: false,
            user_name: Some(user.to_string()),
            track_metadata: TrackMetadata {
                artist_name: "Portishead".to_string(),
                track_name: track.to_string(),
                release_name: Some("Dummy".to_string()),
                additional_info: AdditionalInfo {
                    recording_msid: Some(format!("msid-{track}")),
                    recording_mbid: None,
                    artist_msid: None,
                },
            },
        })
    }

    pub fn pin(row_id: i64, track: &str) -> Item {
        Item::PinnedRecording(PinnedRecording {
            row_id,
            created: 1_600_000_000 + row_id,
            blurb_content: None,
            recording_msid: Some(format!("msid-{track}")),
            recording_mbid: None,
            track_metadata: TrackMetadata {
                artist_name: "Massive Attack".to_string(),
                track_name: track.to_string(),
                release_name: None,
                additional_info: AdditionalInfo::default(),
            },
        })
    }

    pub fn pins(range: std::ops::Range<i64>) -> Vec<Item> {
        range.map(|id| pin(id, &format!("track {id}"))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn feedback_toggle_clears_repeated_score() {
        use FeedbackScore::*;
        assert_eq!(FeedbackScore::toggled(Loved, Loved), Neutral);
        assert_eq!(FeedbackScore::toggled(Hated, Hated), Neutral);
        assert_eq!(FeedbackScore::toggled(Neutral, Loved), Loved);
        assert_eq!(FeedbackScore::toggled(Loved, Hated), Hated);
    }

    #[test]
    fn feedback_score_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&FeedbackScore::Hated).unwrap(), "-1");
        let parsed: FeedbackScore = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, FeedbackScore::Loved);
        assert!(serde_json::from_str::<FeedbackScore>("2").is_err());
    }

    #[test]
    fn listen_identity_is_timestamp_track_and_user() {
        let item = listen("rob", 1_700_000_000, "Roads");
        assert_eq!(
            item.identity(),
            ItemIdentity::Listen {
                listened_at: 1_700_000_000,
                track_name: "Roads".to_string(),
                user_name: "rob".to_string(),
            }
        );
        assert_eq!(pin(7, "Teardrop").identity(), ItemIdentity::Pin(7));
    }

    #[test]
    fn items_are_compared_structurally() {
        let a = listen("rob", 1, "Roads");
        let mut b = listen("rob", 1, "Roads");
        assert_eq!(a, b);
        if let Item::Listen(listen) = &mut b {
            listen.track_metadata.release_name = Some("Live".to_string());
        }
        assert_ne!(a, b);
    }

    #[test]
    fn recommendation_requires_msid() {
        let mut item = listen("rob", 1, "Roads");
        assert!(RecommendationMetadata::from_item(&item).is_some());
        if let Item::Listen(listen) = &mut item {
            listen.track_metadata.additional_info.recording_msid = None;
        }
        assert!(RecommendationMetadata::from_item(&item).is_none());
    }

    #[test]
    fn pinned_recording_parses_server_payload() {
        let json = r#"{
            "row_id": 3,
            "created": 1650000000,
            "recording_msid": "abc",
            "track_metadata": {"artist_name": "Björk", "track_name": "Joga"}
        }"#;
        let pin: PinnedRecording = serde_json::from_str(json).unwrap();
        assert_eq!(pin.row_id, 3);
        let item = Item::PinnedRecording(pin);
        assert_eq!(item.recording_msid(), Some("abc"));
        assert_eq!(item.track_name(), "Joga");
    }
}
