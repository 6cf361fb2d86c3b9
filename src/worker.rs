use crate::api::spotify::SpotifyProvider;
use crate::api::spotify_auth::run_spotify_auth;
use crate::api::twitch::TwitchClient;
use crate::api::twitch_auth::run_twitch_auth;
use crate::api::{Provider, RedemptionSource};
use crate::assemble::assemble_track_uris;
use crate::classify::{classify_redemptions, Classification};
use crate::config::{Config, REWARD_NAME};
use crate::error::RunError;
use crate::models::{DirectRequest, Playlist, RedemptionStatus, RunSummary, SearchResult};
use crate::playlist::write_playlist;
use crate::resolve::resolve_searches;
use chrono::NaiveDate;

/// Everything the caller needs to report a finished run.
#[derive(Debug, Clone)]
pub struct PlaylistReport {
    pub playlist: Playlist,
    pub summary: RunSummary,
    pub direct: Vec<DirectRequest>,
    pub found: Vec<SearchResult>,
}

/// Look up the channel's song request reward and classify all of its
/// redemptions (every status).
///
/// When several rewards share the title, the first one listed is used.
pub async fn fetch_song_requests(
    source: &dyn RedemptionSource,
    broadcaster_login: &str,
    reward_name: &str,
) -> Result<Classification, RunError> {
    log::info!("Fetching song requests for {}", broadcaster_login);

    let broadcaster_id = source
        .get_broadcaster_id(broadcaster_login)
        .await?
        .ok_or_else(|| RunError::BroadcasterNotFound(broadcaster_login.to_string()))?;
    log::info!("Found broadcaster ID: {}", broadcaster_id);

    let rewards = source.get_custom_rewards(&broadcaster_id).await?;
    log::info!("Found {} custom rewards", rewards.len());

    let wanted = reward_name.to_lowercase();
    let reward = rewards
        .iter()
        .find(|r| r.title.to_lowercase() == wanted)
        .ok_or_else(|| RunError::RewardNotFound {
            reward: reward_name.to_string(),
            available: rewards.iter().map(|r| r.title.clone()).collect(),
        })?;
    log::info!("Found '{}' reward (ID: {})", reward.title, reward.id);

    let redemptions = source
        .get_reward_redemptions(&broadcaster_id, &reward.id, &RedemptionStatus::ALL)
        .await?;
    log::info!("Found {} total redemptions", redemptions.len());

    let requests = classify_redemptions(&redemptions);
    log::info!(
        "Parsed {} Spotify track references, {} requests need search, {} discarded",
        requests.direct.len(),
        requests.search.len(),
        requests.discarded.len()
    );
    Ok(requests)
}

/// Resolve searches, assemble the unique track list and write it to a new
/// playlist on `provider`.
pub async fn build_playlist(
    provider: &dyn Provider,
    broadcaster: &str,
    requests: &Classification,
    max_batch: usize,
    created_on: NaiveDate,
) -> Result<PlaylistReport, RunError> {
    log::info!(
        "Searching {} for {} text-based requests",
        provider.name(),
        requests.search.len()
    );
    let resolution = resolve_searches(provider, &requests.search).await;
    log::info!("Found {} tracks via search", resolution.found.len());

    let uris = assemble_track_uris(&requests.direct, &resolution.found);
    let (playlist, batches) =
        write_playlist(provider, broadcaster, &uris, max_batch, created_on).await?;

    let summary = RunSummary {
        direct_tracks: requests.direct.len(),
        search_tracks: resolution.found.len(),
        search_misses: resolution.misses.len(),
        search_errors: resolution.errors.len(),
        discarded: requests.discarded.len(),
        added: batches.added,
        failed: batches.failed,
    };

    Ok(PlaylistReport {
        playlist,
        summary,
        direct: requests.direct.clone(),
        found: resolution.found,
    })
}

/// One complete run: Twitch login, fetch and classify, Spotify login, build.
pub async fn run_once(cfg: &Config, broadcaster_login: &str) -> Result<PlaylistReport, RunError> {
    cfg.validate().map_err(|e| RunError::Config(e.to_string()))?;

    let twitch_token = run_twitch_auth(cfg).await.map_err(RunError::TwitchAuth)?;
    let source = TwitchClient::new(cfg.twitch.client_id.clone(), twitch_token.access_token)
        .with_page_size(cfg.redemption_page_size);

    let requests = fetch_song_requests(&source, broadcaster_login, REWARD_NAME).await?;
    if requests.is_empty() {
        return Err(RunError::NoRequests);
    }

    let spotify_token = run_spotify_auth(cfg).await.map_err(RunError::SpotifyAuth)?;
    let provider = SpotifyProvider::new(spotify_token.access_token);

    build_playlist(
        &provider,
        broadcaster_login,
        &requests,
        cfg.max_batch_size,
        chrono::Local::now().date_naive(),
    )
    .await
}
