use crate::models::{DirectRequest, SearchResult};
use std::collections::HashSet;

/// Direct references first, then search hits, each in given order, with
/// duplicate URIs dropped after their first occurrence.
pub fn assemble_track_uris(direct: &[DirectRequest], found: &[SearchResult]) -> Vec<String> {
    let mut uris: Vec<String> = direct
        .iter()
        .map(|r| r.track_uri())
        .chain(found.iter().map(|r| r.track_uri.clone()))
        .collect();

    // Deduplicate while preserving order.
    let mut seen = HashSet::new();
    uris.retain(|u| seen.insert(u.clone()));
    uris
}
