//! Authorization-code helper shared by the Twitch and Spotify logins:
//! 1. Build the authorization URL with a fresh anti-forgery `state` and print it.
//! 2. Listen on the redirect URI's host/port for the browser redirect.
//! 3. Reject denials and `state` mismatches, exchange the `code` for a token.
//! 4. Give up once the timeout elapses.
//!
//! Nothing is persisted; the token lives for the current run only.

use crate::error::AuthError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// How the client authenticates at the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAuth {
    /// `client_id` / `client_secret` in the form body (Twitch).
    FormBody,
    /// HTTP Basic header (Spotify).
    BasicHeader,
}

#[derive(Debug, Clone)]
pub struct OAuthEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub client_auth: ClientAuth,
}

#[derive(Debug, Clone)]
pub struct AuthorizationFlow {
    client: Client,
    endpoints: OAuthEndpoints,
    client_id: String,
    client_secret: String,
    redirect_uri: Url,
    scope: String,
}

/// Random opaque value bound to one flow: 32 bytes, URL-safe base64.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

const SUCCESS_PAGE: &str = r#"<html>
  <head><title>Authorization Successful</title></head>
  <body style="font-family: Arial; text-align: center; padding: 50px;">
    <h1>Authorization Successful!</h1>
    <p>You can close this window and return to the application.</p>
  </body>
</html>"#;

#[derive(Clone)]
struct CallbackState {
    flow: Arc<AuthorizationFlow>,
    expected_state: Arc<str>,
    outcome: Arc<Mutex<Option<oneshot::Sender<Result<AccessToken, AuthError>>>>>,
}

impl AuthorizationFlow {
    pub fn new(
        endpoints: OAuthEndpoints,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        scope: &str,
    ) -> Result<Self, AuthError> {
        let redirect_uri = Url::parse(redirect_uri)
            .map_err(|e| AuthError::InvalidRedirect(format!("{}: {}", redirect_uri, e)))?;
        if redirect_uri.host_str().is_none() {
            return Err(AuthError::InvalidRedirect(format!("{} has no host", redirect_uri)));
        }
        Ok(Self {
            client: Client::new(),
            endpoints,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri,
            scope: scope.to_string(),
        })
    }

    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    pub fn authorize_url(&self, state: &str) -> Result<Url, AuthError> {
        let mut url = Url::parse(&self.endpoints.authorize_url)
            .map_err(|e| AuthError::InvalidRedirect(format!("authorize url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope)
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let mut req = self.client.post(&self.endpoints.token_url);
        match self.endpoints.client_auth {
            ClientAuth::FormBody => {
                params.push(("client_id", self.client_id.as_str()));
                params.push(("client_secret", self.client_secret.as_str()));
            }
            ClientAuth::BasicHeader => {
                let auth_header = format!(
                    "Basic {}",
                    general_purpose::STANDARD
                        .encode(format!("{}:{}", self.client_id, self.client_secret))
                );
                req = req.header(AUTHORIZATION, auth_header);
            }
        }
        let resp = req
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(AuthError::Exchange(format!("{} => {}", status, txt)));
        }
        resp.json::<AccessToken>()
            .await
            .map_err(|e| AuthError::Exchange(format!("bad token response: {}", e)))
    }

    /// Full interactive flow: bind the callback listener, print the
    /// authorization URL and wait for the redirect.
    pub async fn run(&self, timeout: Duration) -> Result<AccessToken, AuthError> {
        let host = self
            .redirect_uri
            .host_str()
            .ok_or_else(|| AuthError::InvalidRedirect(self.redirect_uri.to_string()))?
            .to_string();
        let port = self.redirect_uri.port_or_known_default().unwrap_or(80);
        let listener = TcpListener::bind((host.as_str(), port)).await?;
        info!("Callback listener started on {}:{}", host, port);

        let state = generate_state();
        let url = self.authorize_url(&state)?;
        println!(
            "Open this URL in your browser and authorize the application:\n\n{}\n",
            url
        );
        self.await_callback(listener, &state, timeout).await
    }

    /// Serve the redirect path on `listener` until the first callback
    /// settles the flow or `timeout` elapses.
    pub async fn await_callback(
        &self,
        listener: TcpListener,
        state: &str,
        timeout: Duration,
    ) -> Result<AccessToken, AuthError> {
        let (tx, rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let cb = CallbackState {
            flow: Arc::new(self.clone()),
            expected_state: Arc::from(state),
            outcome: Arc::new(Mutex::new(Some(tx))),
        };
        let app = Router::new()
            .route(self.redirect_uri.path(), get(handle_callback))
            .with_state(cb);

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let outcome = tokio::time::timeout(timeout, rx).await;

        let _ = shutdown_tx.send(());
        match tokio::time::timeout(Duration::from_secs(5), server).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warn!("Callback listener exited with error: {}", e),
            Ok(Err(e)) => warn!("Callback listener task failed: {}", e),
            Err(_) => warn!("Callback listener did not shut down in time"),
        }

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AuthError::CallbackDropped),
            Err(_) => Err(AuthError::Timeout(timeout.as_secs())),
        }
    }
}

impl CallbackState {
    async fn evaluate(&self, params: &HashMap<String, String>) -> Result<AccessToken, AuthError> {
        if let Some(err) = params.get("error") {
            let desc = params
                .get("error_description")
                .cloned()
                .unwrap_or_else(|| err.clone());
            return Err(AuthError::Denied(desc));
        }
        if params.get("state").map(String::as_str) != Some(&*self.expected_state) {
            return Err(AuthError::StateMismatch);
        }
        let code = params
            .get("code")
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCode)?;
        self.flow.exchange_code(code).await
    }
}

async fn handle_callback(
    State(cb): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let result = cb.evaluate(&params).await;
    let response = match &result {
        Ok(_) => {
            info!("Authorization callback accepted");
            (StatusCode::OK, Html(SUCCESS_PAGE.to_string()))
        }
        Err(e) => {
            warn!("Authorization callback rejected: {}", e);
            let status = match e {
                AuthError::Exchange(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            };
            (status, Html(format!("<p>Authorization failed: {}</p>", e)))
        }
    };
    // The first callback settles the flow; later hits only get a page.
    if let Some(tx) = cb.outcome.lock().await.take() {
        let _ = tx.send(result);
    }
    response
}
