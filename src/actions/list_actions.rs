use crate::actions::removal::{PendingRemoval, DEFAULT_REMOVAL_GRACE_MS};
use crate::alerts::{AlertKind, AlertSink};
use crate::api::{
    ApiError, FeedbackScore, Item, ListenApi, RecommendationMetadata, STATUS_OK,
};
use crate::session::Session;
use std::rc::Rc;
use std::time::Duration;

type FeedbackListener = Rc<dyn Fn(&str, FeedbackScore)>;

/// Per-item mutations: feedback, deletion, recommendation.
///
/// Nothing changes locally until the server confirmed. Preconditions
/// (signed in, owner, identifiers present) are checked before any request
/// is made; a failed check is silent.
pub struct ListActions<A, N> {
    session: Session<A>,
    alerts: N,
    grace: Duration,
    feedback_listener: Option<FeedbackListener>,
}

impl<A, N> ListActions<A, N>
where
    A: ListenApi,
    N: AlertSink,
{
    pub fn new(session: Session<A>, alerts: N) -> Self {
        Self {
            session,
            alerts,
            grace: Duration::from_millis(DEFAULT_REMOVAL_GRACE_MS),
            feedback_listener: None,
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Aggregate views (e.g. a feedback map) hear about confirmed scores.
    pub fn with_feedback_listener(
        mut self,
        listener: impl Fn(&str, FeedbackScore) + 'static,
    ) -> Self {
        self.feedback_listener = Some(Rc::new(listener));
        self
    }

    pub fn session(&self) -> &Session<A> {
        &self.session
    }

    pub fn can_give_feedback(&self, item: &Item) -> bool {
        self.session.auth_token().is_some() && item.recording_msid().is_some()
    }

    pub fn can_delete_listen(&self, item: &Item) -> bool {
        matches!(item, Item::Listen(_))
            && self.session.auth_token().is_some()
            && self.session.is_current_user(item.user_name())
            && item.listened_at().is_some()
            && item.recording_msid().is_some()
    }

    pub fn can_delete_pin(&self, item: &Item, pins_owner: &str) -> bool {
        matches!(item, Item::PinnedRecording(_))
            && self.session.auth_token().is_some()
            && self.session.is_current_user(Some(pins_owner))
    }

    pub fn can_edit_playlist(&self, playlist_owner: &str) -> bool {
        self.session.auth_token().is_some() && self.session.is_current_user(Some(playlist_owner))
    }

    pub fn can_recommend(&self, item: &Item) -> bool {
        self.session.auth_token().is_some() && RecommendationMetadata::from_item(item).is_some()
    }

    /// Sends love/hate for `item`. Asking for the score already held clears
    /// it. Returns the confirmed score.
    pub async fn submit_feedback(
        &self,
        item: &Item,
        current: FeedbackScore,
        requested: FeedbackScore,
    ) -> Option<FeedbackScore> {
        let token = self.session.auth_token()?;
        let msid = item.recording_msid()?;
        let score = FeedbackScore::toggled(current, requested);

        let result = self.session.api.submit_feedback(token, msid, score).await;
        match confirmed(result) {
            Ok(()) => {
                tracing::debug!(msid, score = score.value(), "feedback recorded");
                if let Some(listener) = &self.feedback_listener {
                    listener(msid, score);
                }
                Some(score)
            }
            Err(err) => {
                self.report(&err, "Error while submitting feedback");
                None
            }
        }
    }

    /// Deletes one of the signed-in user's own listens. On success the
    /// caller shows the item as deleted and removes it once the returned
    /// timer elapses.
    pub async fn delete_listen(&self, item: &Item) -> Option<PendingRemoval> {
        if !self.can_delete_listen(item) {
            tracing::debug!(track = item.track_name(), "listen deletion not permitted");
            return None;
        }
        let token = self.session.auth_token()?;
        let msid = item.recording_msid()?;
        let listened_at = item.listened_at()?;

        let result = self.session.api.delete_listen(token, msid, listened_at).await;
        self.arm_removal(item, result, "Error while deleting listen")
    }

    pub async fn delete_pin(&self, item: &Item, pins_owner: &str) -> Option<PendingRemoval> {
        if !self.can_delete_pin(item, pins_owner) {
            return None;
        }
        let Item::PinnedRecording(pin) = item else {
            return None;
        };
        let token = self.session.auth_token()?;

        let result = self.session.api.delete_pin(token, pin.row_id).await;
        self.arm_removal(item, result, "Error while deleting pin")
    }

    pub async fn remove_playlist_track(
        &self,
        playlist_mbid: &str,
        playlist_owner: &str,
        index: usize,
        item: &Item,
    ) -> Option<PendingRemoval> {
        if !matches!(item, Item::PlaylistTrack(_)) || !self.can_edit_playlist(playlist_owner) {
            return None;
        }
        let token = self.session.auth_token()?;

        let result = self
            .session
            .api
            .remove_playlist_item(token, playlist_mbid, index)
            .await;
        self.arm_removal(item, result, "Error while removing track from playlist")
    }

    pub async fn recommend_to_followers(&self, item: &Item) -> bool {
        let (Some(user), Some(token)) = (self.session.user_name(), self.session.auth_token()) else {
            return false;
        };
        let Some(metadata) = RecommendationMetadata::from_item(item) else {
            return false;
        };

        let result = self
            .session
            .api
            .recommend_to_followers(user, token, &metadata)
            .await;
        match confirmed(result) {
            Ok(()) => {
                self.alerts.new_alert(
                    AlertKind::Success,
                    "You recommended a track to your followers!",
                    &format!("{} - {}", metadata.artist_name, metadata.track_name),
                );
                true
            }
            Err(err) => {
                self.report(
                    &err,
                    "We encountered an error when trying to recommend the track to your followers",
                );
                false
            }
        }
    }

    fn arm_removal(
        &self,
        item: &Item,
        result: Result<u16, ApiError>,
        failure_title: &str,
    ) -> Option<PendingRemoval> {
        match confirmed(result) {
            Ok(()) => {
                tracing::info!(track = item.track_name(), "item deleted, removal armed");
                Some(PendingRemoval::arm(item.identity(), self.grace))
            }
            Err(err) => {
                self.report(&err, failure_title);
                None
            }
        }
    }

    fn report(&self, err: &ApiError, title: &str) {
        tracing::warn!(error = %err, "{title}");
        self.alerts
            .new_alert(AlertKind::Danger, title, &err.to_string());
    }
}

fn confirmed(result: Result<u16, ApiError>) -> Result<(), ApiError> {
    match result? {
        STATUS_OK => Ok(()),
        status => Err(ApiError::UnexpectedStatus(status)),
    }
}
