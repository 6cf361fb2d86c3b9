use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of a channel-point redemption, as reported by helix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedemptionStatus {
    Canceled,
    Fulfilled,
    Unfulfilled,
}

impl RedemptionStatus {
    /// Every status, in the order redemptions are fetched.
    pub const ALL: [RedemptionStatus; 3] = [
        RedemptionStatus::Canceled,
        RedemptionStatus::Fulfilled,
        RedemptionStatus::Unfulfilled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RedemptionStatus::Canceled => "CANCELED",
            RedemptionStatus::Fulfilled => "FULFILLED",
            RedemptionStatus::Unfulfilled => "UNFULFILLED",
        }
    }
}

/// Custom channel-point reward configured on a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomReward {
    pub id: String,
    pub title: String,
}

/// A single redemption of the song request reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionRecord {
    #[serde(default)]
    pub id: String,
    pub user_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_input: String,
    pub redeemed_at: DateTime<Utc>,
    pub status: RedemptionStatus,
}

fn null_as_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    Direct,
    Search,
}

/// Redemption whose text carried a Spotify track reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectRequest {
    pub track_id: String,
    pub requester: String,
    pub redeemed_at: DateTime<Utc>,
    pub status: RedemptionStatus,
    pub original_input: String,
}

impl DirectRequest {
    pub fn method(&self) -> ResolutionMethod {
        ResolutionMethod::Direct
    }

    pub fn track_uri(&self) -> String {
        format!("spotify:track:{}", self.track_id)
    }
}

/// Redemption with free text that still has to be looked up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub requester: String,
    pub redeemed_at: DateTime<Utc>,
    pub status: RedemptionStatus,
}

/// Top search hit for a [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub track_id: String,
    pub track_uri: String,
    pub track_name: String,
    pub artist: String,
    pub requester: String,
    pub query: String,
}

impl SearchResult {
    pub fn method(&self) -> ResolutionMethod {
        ResolutionMethod::Search
    }
}

/// A track as returned by a provider search.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackHit {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
}

/// The authenticated destination account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub public: bool,
    pub url: Option<String>,
}

/// End-of-run counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub direct_tracks: usize,
    pub search_tracks: usize,
    pub search_misses: usize,
    pub search_errors: usize,
    pub discarded: usize,
    pub added: usize,
    pub failed: Vec<String>,
}
