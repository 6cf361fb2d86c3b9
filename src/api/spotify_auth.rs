use super::oauth::{AccessToken, AuthorizationFlow, ClientAuth, OAuthEndpoints};
use crate::config::{Config, SPOTIFY_SCOPES};
use crate::error::AuthError;
use std::env;
use std::time::Duration;
use tracing::info;

fn auth_base() -> String {
    env::var("SPOTIFY_AUTH_BASE").unwrap_or_else(|_| "https://accounts.spotify.com".into())
}

pub fn spotify_endpoints() -> OAuthEndpoints {
    let base = auth_base();
    OAuthEndpoints {
        authorize_url: format!("{}/authorize", base),
        token_url: format!("{}/api/token", base),
        client_auth: ClientAuth::BasicHeader,
    }
}

pub fn spotify_flow(cfg: &Config) -> Result<AuthorizationFlow, AuthError> {
    AuthorizationFlow::new(
        spotify_endpoints(),
        &cfg.spotify.client_id,
        &cfg.spotify.client_secret,
        &cfg.spotify.redirect_uri,
        SPOTIFY_SCOPES,
    )
}

/// Obtain a Spotify access token allowed to create and modify playlists.
pub async fn run_spotify_auth(cfg: &Config) -> Result<AccessToken, AuthError> {
    println!("Starting Spotify OAuth flow...");
    let token = spotify_flow(cfg)?
        .run(Duration::from_secs(cfg.auth_timeout_secs))
        .await?;
    info!("Obtained Spotify access token");
    Ok(token)
}
