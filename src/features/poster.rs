// Leaderboard poster - renders rows into a message and sends it to a channel

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::features::leaderboard::StatsAggregator;
use crate::models::stats::LeaderboardRow;
use crate::utils::config::colors;
use crate::utils::formatters::leaderboard_field;

/// Discord allows at most 25 fields per embed
pub const MAX_EMBED_FIELDS: usize = 25;
/// Total characters allowed across title, fields and footer
pub const MAX_EMBED_CHARS: usize = 6000;

pub const LEADERBOARD_TITLE: &str = "🏆 Squad Leaderboard 🏆";

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Channel {channel_id} lookup failed: {reason}")]
    ChannelLookup { channel_id: u64, reason: String },

    #[error("Failed to send message: {0}")]
    Send(String),
}

/// Plain leaderboard message, independent of the Discord builders
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardMessage {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub generated_at: DateTime<Utc>,
}

impl LeaderboardMessage {
    /// Fields are added in rank order until the field count or the total
    /// embed size limit is reached
    pub fn from_rows(rows: &[LeaderboardRow]) -> Self {
        let mut message = Self {
            title: LEADERBOARD_TITLE.to_string(),
            fields: Vec::new(),
            generated_at: Utc::now(),
        };

        let mut used = message.title.chars().count() + message.footer().chars().count();
        for row in rows.iter().take(MAX_EMBED_FIELDS) {
            let (name, value) = leaderboard_field(row);
            let size = name.chars().count() + value.chars().count();
            if used + size > MAX_EMBED_CHARS {
                break;
            }
            used += size;
            message.fields.push((name, value));
        }

        let dropped = rows.len() - message.fields.len();
        if dropped > 0 {
            warn!(
                shown = message.fields.len(),
                dropped, "Leaderboard too large for one embed, lower ranks left out"
            );
        }

        message
    }

    /// Characters counted against Discord's embed size limit
    pub fn embed_chars(&self) -> usize {
        self.title.chars().count()
            + self.footer().chars().count()
            + self
                .fields
                .iter()
                .map(|(name, value)| name.chars().count() + value.chars().count())
                .sum::<usize>()
    }

    pub fn footer(&self) -> String {
        format!(
            "Stats via gametools.network • Sorted by K/D • {}",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )
    }

    pub fn to_embed(&self) -> serenity::CreateEmbed {
        let timestamp = serenity::Timestamp::from_unix_timestamp(self.generated_at.timestamp())
            .unwrap_or_else(|_| serenity::Timestamp::now());

        let mut embed = serenity::CreateEmbed::new()
            .title(&self.title)
            .color(colors::LEADERBOARD)
            .footer(serenity::CreateEmbedFooter::new(self.footer()))
            .timestamp(timestamp);

        for (name, value) in &self.fields {
            embed = embed.field(name, value, false);
        }

        embed
    }
}

/// Where leaderboard messages go
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_message(&self, channel_id: u64, message: &LeaderboardMessage) -> Result<(), PostError>;
}

/// Sends through the serenity HTTP client
pub struct ChannelSink {
    http: Arc<serenity::Http>,
}

impl ChannelSink {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send_message(&self, channel_id: u64, message: &LeaderboardMessage) -> Result<(), PostError> {
        let channel = serenity::ChannelId::new(channel_id);

        // Make sure the channel exists and is visible before sending
        channel
            .to_channel(&self.http)
            .await
            .map_err(|e| PostError::ChannelLookup {
                channel_id,
                reason: e.to_string(),
            })?;

        channel
            .send_message(&self.http, serenity::CreateMessage::new().embed(message.to_embed()))
            .await
            .map_err(|e| PostError::Send(e.to_string()))?;

        Ok(())
    }
}

/// Fetch the leaderboard and post it. Returns false when there was nothing to post.
pub async fn post_leaderboard(
    aggregator: &StatsAggregator,
    sink: &dyn MessageSink,
    channel_id: u64,
    handles: &[String],
) -> Result<bool, PostError> {
    let rows = aggregator.fetch_leaderboard(handles).await;
    if rows.is_empty() {
        info!("No stats available, skipping leaderboard post");
        return Ok(false);
    }

    let message = LeaderboardMessage::from_rows(&rows);
    sink.send_message(channel_id, &message).await?;
    info!(channel_id, players = rows.len(), "Leaderboard posted");
    Ok(true)
}

/// Post the leaderboard now and then once per `period`, forever
pub async fn run_poster(
    aggregator: Arc<StatsAggregator>,
    sink: Arc<dyn MessageSink>,
    channel_id: u64,
    handles: Vec<String>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if let Err(e) = post_leaderboard(&aggregator, sink.as_ref(), channel_id, &handles).await {
            error!("Leaderboard post failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::gametools::StatsSource;
    use crate::models::roster::{Platform, Roster, RosterEntry, StatsQuery};
    use anyhow::{anyhow, Result};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct FixedSource(Option<Value>);

    #[async_trait]
    impl StatsSource for FixedSource {
        async fn fetch_batch(&self, _queries: &[StatsQuery]) -> Result<Value> {
            self.0.clone().ok_or_else(|| anyhow!("timed out"))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(u64, LeaderboardMessage)>>,
        fail_lookup: bool,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send_message(&self, channel_id: u64, message: &LeaderboardMessage) -> Result<(), PostError> {
            if self.fail_lookup {
                return Err(PostError::ChannelLookup {
                    channel_id,
                    reason: "Unknown Channel".to_string(),
                });
            }
            self.sent.lock().unwrap().push((channel_id, message.clone()));
            Ok(())
        }
    }

    fn aggregator(body: Option<Value>) -> StatsAggregator {
        let roster = Roster::new(vec![
            RosterEntry::new("Alpha", 1, 10, Platform::Pc),
            RosterEntry::new("Bravo", 2, 20, Platform::Pc),
        ])
        .unwrap();
        StatsAggregator::new(Arc::new(roster), Arc::new(FixedSource(body)))
    }

    fn handles() -> Vec<String> {
        vec!["Alpha".to_string(), "Bravo".to_string()]
    }

    fn row(rank: usize, name: &str) -> LeaderboardRow {
        LeaderboardRow {
            rank,
            display_name: name.to_string(),
            level: 1,
            kd: 1.0,
            kills: 1,
            deaths: 1,
            assists: 0,
            revives: 0,
            resupplies: 0,
            repairs: 0,
            accuracy: 0.0,
            top_class: "N/A".to_string(),
            top_vehicle: "N/A".to_string(),
            top_weapon: "N/A".to_string(),
        }
    }

    #[test]
    fn test_message_from_rows() {
        let message = LeaderboardMessage::from_rows(&[row(1, "Alpha"), row(2, "Bravo")]);
        assert_eq!(message.title, LEADERBOARD_TITLE);
        assert_eq!(message.fields.len(), 2);
        assert!(message.fields[0].0.contains("Alpha"));
        assert!(message.fields[1].0.contains("Bravo"));
        assert!(message.footer().starts_with("Stats via gametools.network"));
    }

    #[test]
    fn test_message_field_cap() {
        let rows: Vec<_> = (1..=30).map(|i| row(i, &format!("P{}", i))).collect();
        let message = LeaderboardMessage::from_rows(&rows);
        assert_eq!(message.fields.len(), MAX_EMBED_FIELDS);
    }

    #[test]
    fn test_message_stays_under_embed_size_limit() {
        let long = "X".repeat(400);
        let rows: Vec<_> = (1..=25)
            .map(|i| LeaderboardRow {
                top_class: long.clone(),
                top_vehicle: long.clone(),
                top_weapon: long.clone(),
                ..row(i, &format!("P{}", i))
            })
            .collect();

        let message = LeaderboardMessage::from_rows(&rows);
        assert!(message.embed_chars() <= MAX_EMBED_CHARS);
        assert!(!message.fields.is_empty());
        assert!(message.fields.len() < rows.len());
        // Highest ranks are the ones kept
        assert!(message.fields[0].0.contains("P1 "));
    }

    #[tokio::test]
    async fn test_post_sends_one_message() {
        let aggregator = aggregator(Some(json!([
            {"id": 2, "killDeath": 0.5},
            {"id": 1, "killDeath": 1.5}
        ])));
        let sink = RecordingSink::default();

        let posted = post_leaderboard(&aggregator, &sink, 42, &handles()).await.unwrap();
        assert!(posted);

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 42);
        assert!(sent[0].1.fields[0].0.contains("Alpha"));
    }

    #[tokio::test]
    async fn test_no_post_when_fetch_fails() {
        let aggregator = aggregator(None);
        let sink = RecordingSink::default();

        let posted = post_leaderboard(&aggregator, &sink, 42, &handles()).await.unwrap();
        assert!(!posted);
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_channel_lookup_failure_is_reported() {
        let aggregator = aggregator(Some(json!([{"id": 1}])));
        let sink = RecordingSink {
            fail_lookup: true,
            ..Default::default()
        };

        let err = post_leaderboard(&aggregator, &sink, 7, &handles()).await.unwrap_err();
        assert!(matches!(err, PostError::ChannelLookup { channel_id: 7, .. }));
    }
}
