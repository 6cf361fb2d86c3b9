use thiserror::Error;

/// Ways the browser authorization round-trip can fail. All of them are fatal
/// to the run.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("authorization denied: {0}")]
    Denied(String),
    #[error("state mismatch on callback (possible CSRF)")]
    StateMismatch,
    #[error("no authorization code received")]
    MissingCode,
    #[error("authorization not completed within {0}s")]
    Timeout(u64),
    #[error("token exchange failed: {0}")]
    Exchange(String),
    #[error("invalid redirect URI: {0}")]
    InvalidRedirect(String),
    #[error("callback listener failed: {0}")]
    Listener(#[from] std::io::Error),
    #[error("callback listener stopped before a result arrived")]
    CallbackDropped,
}

/// Run-level failures. Per-record and per-batch problems are never reported
/// through this type; they end up in the run summary.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to authenticate with Twitch: {0}")]
    TwitchAuth(#[source] AuthError),
    #[error("failed to authenticate with Spotify: {0}")]
    SpotifyAuth(#[source] AuthError),
    #[error("could not find broadcaster: {0}")]
    BroadcasterNotFound(String),
    #[error("could not find reward named '{reward}'. Available rewards: {available:?}")]
    RewardNotFound {
        reward: String,
        available: Vec<String>,
    },
    #[error("no valid song requests found")]
    NoRequests,
    #[error(transparent)]
    Api(#[from] anyhow::Error),
}
