use super::oauth::{AccessToken, AuthorizationFlow, ClientAuth, OAuthEndpoints};
use crate::config::{Config, TWITCH_SCOPES};
use crate::error::AuthError;
use std::env;
use std::time::Duration;
use tracing::info;

fn auth_base() -> String {
    env::var("TWITCH_AUTH_BASE").unwrap_or_else(|_| "https://id.twitch.tv".into())
}

pub fn twitch_endpoints() -> OAuthEndpoints {
    let base = auth_base();
    OAuthEndpoints {
        authorize_url: format!("{}/oauth2/authorize", base),
        token_url: format!("{}/oauth2/token", base),
        client_auth: ClientAuth::FormBody,
    }
}

pub fn twitch_flow(cfg: &Config) -> Result<AuthorizationFlow, AuthError> {
    AuthorizationFlow::new(
        twitch_endpoints(),
        &cfg.twitch.client_id,
        &cfg.twitch.client_secret,
        &cfg.twitch.redirect_uri,
        TWITCH_SCOPES,
    )
}

/// Obtain a Twitch user access token able to read channel-point redemptions.
pub async fn run_twitch_auth(cfg: &Config) -> Result<AccessToken, AuthError> {
    println!("Starting Twitch OAuth flow...");
    let token = twitch_flow(cfg)?
        .run(Duration::from_secs(cfg.auth_timeout_secs))
        .await?;
    info!("Obtained Twitch user access token");
    Ok(token)
}
