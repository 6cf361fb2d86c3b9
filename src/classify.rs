use crate::models::{DirectRequest, RedemptionRecord, SearchRequest};
use crate::parser::parse_track_id;
use log::warn;

/// Why a redemption could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// A link that is not a Spotify track reference.
    NonSpotifyUrl,
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Discarded {
    pub requester: String,
    pub input: String,
    pub reason: DiscardReason,
}

/// Every redemption ends up in exactly one of the three buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub direct: Vec<DirectRequest>,
    pub search: Vec<SearchRequest>,
    pub discarded: Vec<Discarded>,
}

impl Classification {
    /// True when nothing can be turned into a track.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.search.is_empty()
    }

    pub fn total(&self) -> usize {
        self.direct.len() + self.search.len() + self.discarded.len()
    }
}

fn looks_like_url(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("http://") || lower.contains("https://") || lower.contains("www.")
}

/// Partition redemptions into direct track references, search queries and
/// discards, preserving input order within each bucket.
///
/// URL-shaped text that is not a Spotify track is discarded and never sent
/// to search.
pub fn classify_redemptions(records: &[RedemptionRecord]) -> Classification {
    let mut out = Classification::default();

    for rec in records {
        let input = rec.user_input.as_str();
        if let Some(track_id) = parse_track_id(input) {
            out.direct.push(DirectRequest {
                track_id: track_id.to_string(),
                requester: rec.user_name.clone(),
                redeemed_at: rec.redeemed_at,
                status: rec.status,
                original_input: input.to_string(),
            });
        } else if looks_like_url(input) {
            warn!(
                "Skipping non-Spotify URL from {}: {}",
                rec.user_name,
                input.chars().take(50).collect::<String>()
            );
            out.discarded.push(Discarded {
                requester: rec.user_name.clone(),
                input: input.to_string(),
                reason: DiscardReason::NonSpotifyUrl,
            });
        } else if !input.trim().is_empty() {
            out.search.push(SearchRequest {
                query: input.to_string(),
                requester: rec.user_name.clone(),
                redeemed_at: rec.redeemed_at,
                status: rec.status,
            });
        } else {
            warn!("Empty input from {}", rec.user_name);
            out.discarded.push(Discarded {
                requester: rec.user_name.clone(),
                input: input.to_string(),
                reason: DiscardReason::EmptyInput,
            });
        }
    }

    out
}
