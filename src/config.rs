use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Title of the channel-point reward whose redemptions are song requests.
/// Matched case-insensitively against the broadcaster's custom rewards.
pub const REWARD_NAME: &str = "song request bot";

/// Twitch scope needed to list channel-point redemptions.
pub const TWITCH_SCOPES: &str = "channel:read:redemptions";

/// Spotify scopes needed to create a playlist and append to it.
pub const SPOTIFY_SCOPES: &str = "playlist-modify-public playlist-modify-private";

/// Hard upper bound of the Spotify "add items to playlist" call.
pub const SPOTIFY_MAX_BATCH: usize = 100;

/// Hard upper bound of helix `first` for the redemptions endpoint.
pub const TWITCH_MAX_PAGE_SIZE: u32 = 50;

const CONFIG_ENV: &str = "COMMUNITY_PLAYLIST_CONFIG";
const APP_DIR: &str = "twitch-community-playlist";

/// OAuth application credentials for one platform.
#[derive(Debug, Clone, Default)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl AppCredentials {
    /// Read `{PREFIX}_CLIENT_ID`, `{PREFIX}_CLIENT_SECRET` and
    /// `{PREFIX}_CALLBACK_URL`. Id and secret are required.
    pub fn from_env(prefix: &str, default_redirect: &str) -> anyhow::Result<Self> {
        let required = |suffix: &str| -> anyhow::Result<String> {
            let key = format!("{}_{}", prefix, suffix);
            match env::var(&key) {
                Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(anyhow!("missing environment variable {}", key)),
            }
        };
        let redirect_uri = env::var(format!("{}_CALLBACK_URL", prefix))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default_redirect.to_string());
        Ok(Self {
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            redirect_uri,
        })
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// How long to wait for the browser to hit the local callback.
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout_secs: u64,

    #[serde(default = "default_max_batch")]
    pub max_batch_size: usize,

    #[serde(default = "default_page_size")]
    pub redemption_page_size: u32,

    // Credentials never come from the TOML file.
    #[serde(skip)]
    pub twitch: AppCredentials,
    #[serde(skip)]
    pub spotify: AppCredentials,
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
fn default_auth_timeout() -> u64 { 120 }
fn default_max_batch() -> usize { SPOTIFY_MAX_BATCH }
fn default_page_size() -> u32 { TWITCH_MAX_PAGE_SIZE }

pub const DEFAULT_TWITCH_CALLBACK: &str = "http://localhost:5000/twitch/callback";
pub const DEFAULT_SPOTIFY_CALLBACK: &str = "http://127.0.0.1:8888/callback";

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            auth_timeout_secs: default_auth_timeout(),
            max_batch_size: default_max_batch(),
            redemption_page_size: default_page_size(),
            twitch: AppCredentials::default(),
            spotify: AppCredentials::default(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Location of the optional settings file: `$COMMUNITY_PLAYLIST_CONFIG`,
    /// else `<config dir>/twitch-community-playlist/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(p) = env::var(CONFIG_ENV) {
            if !p.trim().is_empty() {
                return Some(PathBuf::from(p));
            }
        }
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Settings file (when present) plus credentials from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match Self::default_path() {
            Some(p) if p.exists() => Self::from_path(&p)
                .with_context(|| format!("loading config from {}", p.display()))?,
            _ => Self::default(),
        };
        cfg.twitch = AppCredentials::from_env("TWITCH", DEFAULT_TWITCH_CALLBACK)?;
        cfg.spotify = AppCredentials::from_env("SPOTIFY", DEFAULT_SPOTIFY_CALLBACK)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_batch_size == 0 || self.max_batch_size > SPOTIFY_MAX_BATCH {
            return Err(anyhow!(
                "max_batch_size must be between 1 and {}, got {}",
                SPOTIFY_MAX_BATCH,
                self.max_batch_size
            ));
        }
        if self.redemption_page_size == 0 || self.redemption_page_size > TWITCH_MAX_PAGE_SIZE {
            return Err(anyhow!(
                "redemption_page_size must be between 1 and {}, got {}",
                TWITCH_MAX_PAGE_SIZE,
                self.redemption_page_size
            ));
        }
        if self.auth_timeout_secs == 0 {
            return Err(anyhow!("auth_timeout_secs must be positive"));
        }
        Ok(())
    }
}
