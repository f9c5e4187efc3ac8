// gametools.network API client
// Battlefield player stats, fetched for the whole squad in one request

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::roster::{Platform, StatsQuery};

/// Source of raw squad stats
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch stats for every query in a single round trip.
    /// Returns the raw response body; shape normalisation is left to the caller.
    async fn fetch_batch(&self, queries: &[StatsQuery]) -> Result<Value>;
}

/// Identifiers needed to add a player to the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIds {
    pub user_name: String,
    pub player_id: u64,
    pub user_id: u64,
}

pub struct GameToolsClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GameToolsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Look up a single player by name to find their ids
    pub async fn lookup_player(&self, name: &str, platform: Platform) -> Result<Option<PlayerIds>> {
        let response = self
            .client
            .get(format!("{}/bf6/stats/", self.base_url))
            .query(&[("name", name), ("platform", platform.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() == 404 {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Stats API error: status={}, body={}", status, body));
        }

        let data: LookupResponse = response.json().await?;
        match (data.id, data.user_id) {
            (Some(player_id), Some(user_id)) => Ok(Some(PlayerIds {
                user_name: data.user_name.unwrap_or_else(|| name.to_string()),
                player_id,
                user_id,
            })),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl StatsSource for GameToolsClient {
    async fn fetch_batch(&self, queries: &[StatsQuery]) -> Result<Value> {
        debug!(count = queries.len(), "Requesting squad stats");

        let response = self
            .client
            .post(format!("{}/bf6/multiple/", self.base_url))
            .json(queries)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Stats API error: status={}, body={}", status, body));
        }

        Ok(response.json().await?)
    }
}

// Response structures
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    user_name: Option<String>,
    id: Option<u64>,
    user_id: Option<u64>,
}
