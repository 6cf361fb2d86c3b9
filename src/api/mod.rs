pub mod spotify;
pub mod twitch;
pub mod mock;
pub mod oauth;
pub mod spotify_auth;
pub mod twitch_auth;

use crate::models::{AccountProfile, CustomReward, Playlist, RedemptionRecord, RedemptionStatus, TrackHit};
use anyhow::Result;

/// Provider trait: the destination-side operations the playlist build needs.
/// Implementations: spotify::SpotifyProvider, mock::MockProvider.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Account the session is authenticated as.
    async fn current_user(&self) -> Result<AccountProfile>;

    /// Always creates a new playlist owned by `user_id`.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist>;

    /// Free-text track search, best hit only.
    async fn search_track(&self, query: &str) -> Result<Option<TrackHit>>;

    /// Append URIs to a playlist (batching done by caller)
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<()>;

    /// Return the provider's name (for logging, UI, etc)
    fn name(&self) -> &str;

    /// Return true if the provider holds a token it can call with
    fn is_authenticated(&self) -> bool;
}

/// Read side on the streaming platform: where song requests come from.
#[async_trait::async_trait]
pub trait RedemptionSource: Send + Sync {
    /// Resolve a channel login to its broadcaster id. `None` if unknown.
    async fn get_broadcaster_id(&self, login: &str) -> Result<Option<String>>;

    async fn get_custom_rewards(&self, broadcaster_id: &str) -> Result<Vec<CustomReward>>;

    /// All redemptions of a reward, every page of each status in turn.
    async fn get_reward_redemptions(
        &self,
        broadcaster_id: &str,
        reward_id: &str,
        statuses: &[RedemptionStatus],
    ) -> Result<Vec<RedemptionRecord>>;
}
