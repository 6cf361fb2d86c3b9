use super::RedemptionSource;
use crate::config::TWITCH_MAX_PAGE_SIZE;
use crate::models::{CustomReward, RedemptionRecord, RedemptionStatus};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;

/// Helix response envelope.
#[derive(Debug, Deserialize)]
struct HelixPage<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelixUser {
    id: String,
}

/// Read-only helix client authenticated with a user access token.
/// The API base may be overridden by the TWITCH_API_BASE env var or `with_api_base`.
pub struct TwitchClient {
    client: Client,
    client_id: String,
    access_token: String,
    api_base: String,
    page_size: u32,
}

impl TwitchClient {
    pub fn new(client_id: String, access_token: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
            access_token,
            api_base: Self::default_api_base(),
            page_size: TWITCH_MAX_PAGE_SIZE,
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, TWITCH_MAX_PAGE_SIZE);
        self
    }

    fn default_api_base() -> String {
        env::var("TWITCH_API_BASE").unwrap_or_else(|_| "https://api.twitch.tv/helix".into())
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<HelixPage<T>> {
        let url = format!("{}{}", self.api_base, path);
        let resp = self
            .client
            .get(&url)
            .header("Client-ID", &self.client_id)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("helix GET {} failed: {} => {}", path, status, txt));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl RedemptionSource for TwitchClient {
    async fn get_broadcaster_id(&self, login: &str) -> Result<Option<String>> {
        let page: HelixPage<HelixUser> = self.get_page("/users", &[("login", login)]).await?;
        Ok(page.data.into_iter().next().map(|u| u.id))
    }

    async fn get_custom_rewards(&self, broadcaster_id: &str) -> Result<Vec<CustomReward>> {
        let page: HelixPage<CustomReward> = self
            .get_page(
                "/channel_points/custom_rewards",
                &[("broadcaster_id", broadcaster_id)],
            )
            .await?;
        Ok(page.data)
    }

    async fn get_reward_redemptions(
        &self,
        broadcaster_id: &str,
        reward_id: &str,
        statuses: &[RedemptionStatus],
    ) -> Result<Vec<RedemptionRecord>> {
        let first = self.page_size.to_string();
        let mut all = Vec::new();

        for status in statuses {
            let mut after: Option<String> = None;
            loop {
                let mut query = vec![
                    ("broadcaster_id", broadcaster_id),
                    ("reward_id", reward_id),
                    ("status", status.as_str()),
                    ("first", first.as_str()),
                ];
                if let Some(cursor) = after.as_deref() {
                    query.push(("after", cursor));
                }
                let page: HelixPage<RedemptionRecord> = self
                    .get_page("/channel_points/custom_rewards/redemptions", &query)
                    .await?;
                debug!(
                    "Fetched {} {} redemptions for reward {}",
                    page.data.len(),
                    status.as_str(),
                    reward_id
                );
                all.extend(page.data);
                match page.pagination.cursor {
                    Some(c) if !c.is_empty() => after = Some(c),
                    _ => break,
                }
            }
        }

        Ok(all)
    }
}
