use crate::api::Provider;
use crate::models::{SearchRequest, SearchResult};
use log::{info, warn};

/// Outcome of resolving every pending search query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub found: Vec<SearchResult>,
    /// Queries that returned no tracks.
    pub misses: Vec<String>,
    /// Queries whose search call failed.
    pub errors: Vec<String>,
}

fn preview(query: &str, n: usize) -> String {
    query.chars().take(n).collect()
}

/// Run one search per request, sequentially, keeping the top hit.
///
/// A miss or a failed search is logged and skipped; it never stops the
/// remaining queries.
pub async fn resolve_searches(provider: &dyn Provider, requests: &[SearchRequest]) -> Resolution {
    let mut out = Resolution::default();

    for req in requests {
        match provider.search_track(&req.query).await {
            Ok(Some(hit)) => {
                let artist = hit.artists.first().cloned().unwrap_or_default();
                info!(
                    "Found '{}' by {} (query: '{}')",
                    hit.name,
                    artist,
                    preview(&req.query, 40)
                );
                out.found.push(SearchResult {
                    track_id: hit.id,
                    track_uri: hit.uri,
                    track_name: hit.name,
                    artist,
                    requester: req.requester.clone(),
                    query: req.query.clone(),
                });
            }
            Ok(None) => {
                warn!("No results for: '{}'", preview(&req.query, 50));
                out.misses.push(req.query.clone());
            }
            Err(e) => {
                warn!("Search error for '{}': {}", preview(&req.query, 50), e);
                out.errors.push(req.query.clone());
            }
        }
    }

    out
}
