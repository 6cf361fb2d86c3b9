use super::Provider;
use crate::models::{AccountProfile, Playlist, TrackHit};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::env;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<FullTrack>,
}

#[derive(Debug, Deserialize)]
struct FullTrack {
    id: String,
    uri: String,
    name: String,
    #[serde(default)]
    artists: Vec<SimpleArtist>,
}

#[derive(Debug, Deserialize)]
struct SimpleArtist {
    name: String,
}

/// Spotify provider backed by the Spotify Web API.
/// Holds the bearer token obtained by the authorization flow for the whole run.
/// The API base may be overridden by the SPOTIFY_API_BASE env var or `with_api_base` (useful for tests).
pub struct SpotifyProvider {
    client: Client,
    access_token: String,
    api_base: String,
}

impl SpotifyProvider {
    pub fn new(access_token: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
            api_base: Self::default_api_base(),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn default_api_base() -> String {
        // include v1 path by default
        env::var("SPOTIFY_API_BASE").unwrap_or_else(|_| "https://api.spotify.com/v1".into())
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    async fn fail(what: &str, resp: Response) -> anyhow::Error {
        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return anyhow!("{} rate_limited: retry_after={:?}", what, retry_after);
        }
        let txt = resp.text().await.unwrap_or_default();
        anyhow!("{} failed: {} => {}", what, status, txt)
    }
}

#[async_trait]
impl Provider for SpotifyProvider {
    fn name(&self) -> &str {
        "spotify"
    }

    fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    async fn current_user(&self) -> Result<AccountProfile> {
        let url = format!("{}/me", self.api_base);
        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::fail("fetch /me", resp).await);
        }
        let j: serde_json::Value = resp.json().await?;
        let id = j["id"]
            .as_str()
            .ok_or_else(|| anyhow!("no id in /me response"))?
            .to_string();
        let display_name = j["display_name"].as_str().map(|s| s.to_string());
        Ok(AccountProfile { id, display_name })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist> {
        let url = format!(
            "{}/users/{}/playlists",
            self.api_base,
            url::form_urlencoded::byte_serialize(user_id.as_bytes()).collect::<String>()
        );
        let body = json!({
            "name": name,
            "description": description,
            "public": public
        });
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::fail("create playlist", resp).await);
        }
        let j: serde_json::Value = resp.json().await?;
        let id = j["id"]
            .as_str()
            .ok_or_else(|| anyhow!("no id in create playlist response"))?
            .to_string();
        debug!("Created Spotify playlist {}", id);
        Ok(Playlist {
            id,
            name: j["name"].as_str().unwrap_or(name).to_string(),
            description: description.to_string(),
            public: j["public"].as_bool().unwrap_or(public),
            url: j["external_urls"]["spotify"].as_str().map(|s| s.to_string()),
        })
    }

    async fn search_track(&self, query: &str) -> Result<Option<TrackHit>> {
        let url = format!(
            "{}/search?q={}&type=track&limit=1",
            self.api_base,
            urlencoding::encode(query)
        );
        let resp = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.bearer())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::fail("search", resp).await);
        }
        let page: SearchResponse = resp.json().await?;
        Ok(page.tracks.items.into_iter().next().map(|t| TrackHit {
            id: t.id,
            uri: t.uri,
            name: t.name,
            artists: t.artists.into_iter().map(|a| a.name).collect(),
        }))
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", self.api_base, playlist_id);
        let body = json!({ "uris": uris });
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::fail("add tracks", resp).await);
        }
        Ok(())
    }
}
