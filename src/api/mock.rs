use super::{Provider, RedemptionSource};
use crate::models::{AccountProfile, CustomReward, Playlist, RedemptionRecord, RedemptionStatus, TrackHit};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::info;

/// Scripted outcome of one mock search.
#[derive(Debug, Clone)]
pub enum MockSearch {
    Hit(TrackHit),
    Miss,
    Error(String),
}

/// In-memory provider used in tests. Searches answer from a script (unknown
/// queries miss), and add_tracks calls are recorded in order.
pub struct MockProvider {
    user_id: String,
    searches: HashMap<String, MockSearch>,
    failing_batches: HashSet<usize>,
    search_log: Mutex<Vec<String>>,
    batches: Mutex<Vec<Vec<String>>>,
    created: Mutex<Vec<Playlist>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            user_id: "mock_user".into(),
            searches: HashMap::new(),
            failing_batches: HashSet::new(),
            search_log: Mutex::new(Vec::new()),
            batches: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn with_search(mut self, query: &str, outcome: MockSearch) -> Self {
        self.searches.insert(query.to_string(), outcome);
        self
    }

    /// Make the n-th (0-based) add_tracks call fail.
    pub fn failing_batch(mut self, index: usize) -> Self {
        self.failing_batches.insert(index);
        self
    }

    /// Every add_tracks call made so far, including failed ones.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn searches_made(&self) -> Vec<String> {
        self.search_log.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn created_playlists(&self) -> Vec<Playlist> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    async fn current_user(&self) -> Result<AccountProfile> {
        Ok(AccountProfile {
            id: self.user_id.clone(),
            display_name: Some("Mock User".into()),
        })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist> {
        info!("MockProvider: create_playlist {} for {}", name, user_id);
        let playlist = Playlist {
            id: format!("mock-playlist-{}", name),
            name: name.to_string(),
            description: description.to_string(),
            public,
            url: None,
        };
        if let Ok(mut c) = self.created.lock() {
            c.push(playlist.clone());
        }
        Ok(playlist)
    }

    async fn search_track(&self, query: &str) -> Result<Option<TrackHit>> {
        info!("MockProvider: search {}", query);
        if let Ok(mut log) = self.search_log.lock() {
            log.push(query.to_string());
        }
        match self.searches.get(query) {
            Some(MockSearch::Hit(hit)) => Ok(Some(hit.clone())),
            Some(MockSearch::Error(e)) => Err(anyhow!("{}", e)),
            Some(MockSearch::Miss) | None => Ok(None),
        }
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        info!("MockProvider: add_tracks {} -> {} tracks", playlist_id, uris.len());
        let index = {
            let mut b = self
                .batches
                .lock()
                .map_err(|_| anyhow!("mock batch log poisoned"))?;
            b.push(uris.to_vec());
            b.len() - 1
        };
        if self.failing_batches.contains(&index) {
            return Err(anyhow!("mock add_tracks failure on batch {}", index));
        }
        Ok(())
    }
}

/// In-memory redemption source used in tests.
#[derive(Default)]
pub struct MockRedemptionSource {
    broadcasters: HashMap<String, String>,
    rewards: Vec<CustomReward>,
    redemptions: HashMap<String, Vec<RedemptionRecord>>,
}

impl MockRedemptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_broadcaster(mut self, login: &str, id: &str) -> Self {
        self.broadcasters.insert(login.to_string(), id.to_string());
        self
    }

    pub fn with_reward(mut self, id: &str, title: &str) -> Self {
        self.rewards.push(CustomReward {
            id: id.to_string(),
            title: title.to_string(),
        });
        self
    }

    pub fn with_redemptions(mut self, reward_id: &str, records: Vec<RedemptionRecord>) -> Self {
        self.redemptions
            .entry(reward_id.to_string())
            .or_default()
            .extend(records);
        self
    }
}

#[async_trait]
impl RedemptionSource for MockRedemptionSource {
    async fn get_broadcaster_id(&self, login: &str) -> Result<Option<String>> {
        Ok(self.broadcasters.get(login).cloned())
    }

    async fn get_custom_rewards(&self, _broadcaster_id: &str) -> Result<Vec<CustomReward>> {
        Ok(self.rewards.clone())
    }

    async fn get_reward_redemptions(
        &self,
        _broadcaster_id: &str,
        reward_id: &str,
        statuses: &[RedemptionStatus],
    ) -> Result<Vec<RedemptionRecord>> {
        let records = self.redemptions.get(reward_id).cloned().unwrap_or_default();
        // Same ordering the helix client produces: grouped by status.
        Ok(statuses
            .iter()
            .flat_map(|s| records.iter().filter(move |r| r.status == *s).cloned())
            .collect())
    }
}
