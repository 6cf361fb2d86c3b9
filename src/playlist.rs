use crate::api::Provider;
use crate::config::SPOTIFY_MAX_BATCH;
use crate::models::Playlist;
use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};

/// Per-batch bookkeeping of one playlist write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub batches: usize,
    pub added: usize,
    pub failed: Vec<String>,
}

pub fn playlist_name(broadcaster: &str) -> String {
    format!("{} - Community Song Requests", broadcaster)
}

pub fn playlist_description(created_on: NaiveDate) -> String {
    format!(
        "Community requested songs from Twitch channel points. Created on {}",
        created_on.format("%Y-%m-%d")
    )
}

/// Create a new public playlist for `broadcaster` on the authenticated
/// account. Fails only if the account or playlist creation call fails.
pub async fn create_community_playlist(
    provider: &dyn Provider,
    broadcaster: &str,
    created_on: NaiveDate,
) -> Result<Playlist> {
    let me = provider.current_user().await?;
    info!(
        "Authenticated as {} user: {}",
        provider.name(),
        me.display_name.as_deref().unwrap_or(&me.id)
    );
    let playlist = provider
        .create_playlist(
            &me.id,
            &playlist_name(broadcaster),
            &playlist_description(created_on),
            true,
        )
        .await?;
    info!("Created playlist: {}", playlist.name);
    Ok(playlist)
}

/// Append `uris` in order, in chunks of at most `max_batch` (capped at the
/// service maximum). A failed chunk is recorded and skipped; later chunks
/// are still attempted and earlier ones are not rolled back.
pub async fn append_in_batches(
    provider: &dyn Provider,
    playlist_id: &str,
    uris: &[String],
    max_batch: usize,
) -> BatchReport {
    let batch_size = max_batch.clamp(1, SPOTIFY_MAX_BATCH);
    let mut report = BatchReport::default();

    for chunk in uris.chunks(batch_size) {
        report.batches += 1;
        match provider.add_tracks(playlist_id, chunk).await {
            Ok(()) => {
                report.added += chunk.len();
                info!(
                    "Added {} tracks (total: {}/{})",
                    chunk.len(),
                    report.added,
                    uris.len()
                );
            }
            Err(e) => {
                warn!("Error adding batch of {} tracks: {}", chunk.len(), e);
                report.failed.extend(chunk.iter().cloned());
            }
        }
    }

    report
}

/// Create the playlist, then submit the assembled URIs to it.
pub async fn write_playlist(
    provider: &dyn Provider,
    broadcaster: &str,
    uris: &[String],
    max_batch: usize,
    created_on: NaiveDate,
) -> Result<(Playlist, BatchReport)> {
    let playlist = create_community_playlist(provider, broadcaster, created_on).await?;
    info!("Adding {} total tracks to playlist", uris.len());
    let report = append_in_batches(provider, &playlist.id, uris, max_batch).await;
    Ok((playlist, report))
}
