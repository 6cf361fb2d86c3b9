use chrono::NaiveDate;
use twitch_community_playlist::api::mock::MockProvider;
use twitch_community_playlist::playlist::{append_in_batches, write_playlist};

fn uris(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("spotify:track:t{}", i)).collect()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[test]
fn hundred_fifty_tracks_make_two_batches_in_order() {
    let provider = MockProvider::new();
    let all = uris(150);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(append_in_batches(&provider, "pl", &all, 100));

    assert_eq!(report.batches, 2);
    assert_eq!(report.added, 150);
    assert!(report.failed.is_empty());

    let batches = provider.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 100);
    assert_eq!(batches[1].len(), 50);
    assert_eq!(batches[0][0], "spotify:track:t0");
    assert_eq!(batches[1][0], "spotify:track:t100");
    let flat: Vec<String> = batches.concat();
    assert_eq!(flat, all);
}

#[test]
fn failed_batch_does_not_stop_later_batches() {
    let provider = MockProvider::new().failing_batch(0);
    let all = uris(150);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(append_in_batches(&provider, "pl", &all, 100));

    assert_eq!(provider.batches().len(), 2);
    assert_eq!(report.added, 50);
    assert_eq!(report.failed.len(), 100);
    assert_eq!(report.failed[0], "spotify:track:t0");
    assert_eq!(report.added + report.failed.len(), all.len());
}

#[test]
fn smaller_batch_size_is_respected() {
    let provider = MockProvider::new();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let report = rt.block_on(append_in_batches(&provider, "pl", &uris(95), 30));

    assert_eq!(report.batches, 4);
    assert!(provider.batches().iter().all(|b| b.len() <= 30));
    assert_eq!(provider.batches()[3].len(), 5);
}

#[test]
fn batch_size_is_capped_at_service_limit() {
    let provider = MockProvider::new();
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(append_in_batches(&provider, "pl", &uris(250), 500));

    let sizes: Vec<usize> = provider.batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
}

#[test]
fn write_creates_public_named_playlist() {
    let provider = MockProvider::new();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (playlist, report) = rt
        .block_on(write_playlist(&provider, "somechannel", &uris(3), 100, day()))
        .unwrap();

    assert_eq!(playlist.name, "somechannel - Community Song Requests");
    assert!(playlist.public);
    assert_eq!(
        playlist.description,
        "Community requested songs from Twitch channel points. Created on 2024-05-01"
    );
    assert_eq!(report.added, 3);
    assert_eq!(provider.created_playlists().len(), 1);
}

#[test]
fn empty_track_list_still_creates_playlist() {
    let provider = MockProvider::new();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (_, report) = rt
        .block_on(write_playlist(&provider, "somechannel", &[], 100, day()))
        .unwrap();

    assert_eq!(report.batches, 0);
    assert!(provider.batches().is_empty());
    assert_eq!(provider.created_playlists().len(), 1);
}
