use crate::api::{ApiError, FeedbackScore, ItemPage, RecommendationMetadata};
use std::rc::Rc;

/// HTTP status the ListenBrainz API answers with on success.
pub const STATUS_OK: u16 = 200;

/// Operations the cards and the history views need from the server.
///
/// Futures are not `Send`: everything runs on the UI thread.
#[allow(async_fn_in_trait)]
pub trait ListenApi {
    async fn fetch_page(&self, user_name: &str, offset: u32, count: u32)
        -> Result<ItemPage, ApiError>;

    async fn submit_feedback(
        &self,
        auth_token: &str,
        recording_msid: &str,
        score: FeedbackScore,
    ) -> Result<u16, ApiError>;

    async fn delete_listen(
        &self,
        auth_token: &str,
        recording_msid: &str,
        listened_at: i64,
    ) -> Result<u16, ApiError>;

    async fn delete_pin(&self, auth_token: &str, row_id: i64) -> Result<u16, ApiError>;

    async fn remove_playlist_item(
        &self,
        auth_token: &str,
        playlist_mbid: &str,
        index: usize,
    ) -> Result<u16, ApiError>;

    async fn recommend_to_followers(
        &self,
        user_name: &str,
        auth_token: &str,
        metadata: &RecommendationMetadata,
    ) -> Result<u16, ApiError>;
}

impl<T: ListenApi> ListenApi for Rc<T> {
    async fn fetch_page(
        &self,
        user_name: &str,
        offset: u32,
        count: u32,
    ) -> Result<ItemPage, ApiError> {
        (**self).fetch_page(user_name, offset, count).await
    }

    async fn submit_feedback(
        &self,
        auth_token: &str,
        recording_msid: &str,
        score: FeedbackScore,
    ) -> Result<u16, ApiError> {
        (**self).submit_feedback(auth_token, recording_msid, score).await
    }

    async fn delete_listen(
        &self,
        auth_token: &str,
        recording_msid: &str,
        listened_at: i64,
    ) -> Result<u16, ApiError> {
        (**self).delete_listen(auth_token, recording_msid, listened_at).await
    }

    async fn delete_pin(&self, auth_token: &str, row_id: i64) -> Result<u16, ApiError> {
        (**self).delete_pin(auth_token, row_id).await
    }

    async fn remove_playlist_item(
        &self,
        auth_token: &str,
        playlist_mbid: &str,
        index: usize,
    ) -> Result<u16, ApiError> {
        (**self).remove_playlist_item(auth_token, playlist_mbid, index).await
    }

    async fn recommend_to_followers(
        &self,
        user_name: &str,
        auth_token: &str,
        metadata: &RecommendationMetadata,
    ) -> Result<u16, ApiError> {
        (**self)
            .recommend_to_followers(user_name, auth_token, metadata)
            .await
    }
}
