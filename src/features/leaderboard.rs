// Squad leaderboard aggregation
// Resolves handles through the roster, fetches all stats in one batched
// request, then ranks by K/D and derives the presentation rows.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::gametools::StatsSource;
use crate::models::roster::{Roster, StatsQuery};
use crate::models::stats::{finite_or_zero, CategoryKills, LeaderboardRow, StatsResult};
use crate::utils::config::{NOT_AVAILABLE, UNKNOWN_PLAYER};
use crate::utils::level::level_from_experience;

pub struct StatsAggregator {
    roster: Arc<Roster>,
    source: Arc<dyn StatsSource>,
}

impl StatsAggregator {
    pub fn new(roster: Arc<Roster>, source: Arc<dyn StatsSource>) -> Self {
        Self { roster, source }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Build the ranked leaderboard for `handles`.
    ///
    /// An empty result means no data is available (nothing resolved, or the
    /// stats request failed) and callers should not post anything.
    pub async fn fetch_leaderboard(&self, handles: &[String]) -> Vec<LeaderboardRow> {
        let (queries, _skipped) = resolve_queries(&self.roster, handles);
        if queries.is_empty() {
            warn!("No roster handles resolved, skipping stats request");
            return Vec::new();
        }

        let body = match self.source.fetch_batch(&queries).await {
            Ok(body) => body,
            Err(e) => {
                error!("Stats API request failed: {:?}", e);
                return Vec::new();
            }
        };

        let mut results = normalize_response(body);
        rank_results(&mut results);

        let rows: Vec<LeaderboardRow> = results
            .iter()
            .enumerate()
            .map(|(i, result)| build_row(i + 1, result, &self.roster))
            .collect();

        info!(requested = queries.len(), returned = rows.len(), "Squad leaderboard built");
        rows
    }
}

/// Turn handles into stats queries, returning the handles that were skipped
pub fn resolve_queries(roster: &Roster, handles: &[String]) -> (Vec<StatsQuery>, Vec<String>) {
    let mut queries = Vec::with_capacity(handles.len());
    let mut skipped = Vec::new();

    for handle in handles {
        match roster.resolve(handle) {
            Some(entry) => queries.push(entry.to_query()),
            None => {
                warn!(handle = %handle, "Handle not found in roster, skipping");
                skipped.push(handle.clone());
            }
        }
    }

    (queries, skipped)
}

/// Accept `{ "data": [...] }`, a bare list, or a single object
pub fn normalize_response(body: Value) -> Vec<StatsResult> {
    let payload = match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_truthy(&data) => data,
            _ => Value::Object(map),
        },
        other => other,
    };

    let items = match payload {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<StatsResult>(item) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Skipping malformed stats record: {}", e);
                None
            }
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Sort by K/D descending. Stable, so equal ratios keep response order.
pub fn rank_results(results: &mut [StatsResult]) {
    results.sort_by(|a, b| b.kd().total_cmp(&a.kd()));
}

/// Name for a result: id match, then roster handle, then the API's user name
pub fn resolve_display_name(result: &StatsResult, roster: &Roster) -> String {
    if let Some(entry) = roster.find_by_ids(result.player_id, result.user_id) {
        return entry.display_name().to_string();
    }

    match result.user_name.as_deref() {
        Some(name) => roster
            .find_by_handle_ignore_case(name)
            .map(|entry| entry.display_name())
            .unwrap_or(name)
            .to_string(),
        None => UNKNOWN_PLAYER.to_string(),
    }
}

pub fn derive_level(result: &StatsResult) -> u64 {
    result
        .explicit_level()
        .unwrap_or_else(|| level_from_experience(result.total_experience()))
}

/// Name of the entry with the most kills. Ties go to the first one listed.
pub fn top_by_kills(entries: &[CategoryKills]) -> String {
    let mut best: Option<&CategoryKills> = None;
    for entry in entries {
        if best.map_or(true, |b| entry.kills > b.kills) {
            best = Some(entry);
        }
    }

    best.and_then(|b| b.name.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn count(value: Option<f64>) -> u64 {
    finite_or_zero(value).max(0.0).round() as u64
}

pub fn build_row(rank: usize, result: &StatsResult, roster: &Roster) -> LeaderboardRow {
    LeaderboardRow {
        rank,
        display_name: resolve_display_name(result, roster),
        level: derive_level(result),
        kd: result.kd(),
        kills: count(result.kills),
        deaths: count(result.deaths),
        assists: count(result.kill_assists),
        revives: count(result.revives),
        resupplies: count(result.resupplies),
        repairs: count(result.repairs),
        accuracy: finite_or_zero(result.accuracy),
        top_class: top_by_kills(&result.classes),
        top_vehicle: top_by_kills(&result.vehicles),
        top_weapon: top_by_kills(&result.weapons),
    }
}
