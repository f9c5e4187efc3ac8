// Squad roster - known players and their stats API identifiers

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Context as _, Result};
use serde::{Deserialize, Serialize};

/// Platforms understood by the stats API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, poise::ChoiceParameter)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[name = "PC"]
    Pc,
    #[name = "PlayStation 4"]
    Ps4,
    #[name = "PlayStation 5"]
    Ps5,
    #[name = "Xbox One"]
    XboxOne,
    #[name = "Xbox Series"]
    XboxSeries,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Pc => "pc",
            Platform::Ps4 => "ps4",
            Platform::Ps5 => "ps5",
            Platform::XboxOne => "xboxone",
            Platform::XboxSeries => "xboxseries",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One known player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub handle: String,
    pub player_id: u64,
    pub user_id: u64,
    pub platform: Platform,
    #[serde(default)]
    display_name: Option<String>,
}

impl RosterEntry {
    pub fn new(handle: impl Into<String>, player_id: u64, user_id: u64, platform: Platform) -> Self {
        Self {
            handle: handle.into(),
            player_id,
            user_id,
            platform,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name shown on the leaderboard, falls back to the handle
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.handle)
    }

    pub fn to_query(&self) -> StatsQuery {
        StatsQuery {
            name: self.handle.clone(),
            player_id: self.player_id,
            user_id: self.user_id,
            platform: self.platform,
            skip_battlelog: true,
        }
    }
}

/// One element of the batched stats request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsQuery {
    pub name: String,
    pub player_id: u64,
    pub user_id: u64,
    pub platform: Platform,
    pub skip_battlelog: bool,
}

/// Read-only handle -> identity registry, built once at startup
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    by_handle: HashMap<String, usize>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Result<Self> {
        let mut by_handle = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if by_handle.insert(entry.handle.clone(), i).is_some() {
                return Err(anyhow!("Duplicate roster handle: {}", entry.handle));
            }
        }
        Ok(Self { entries, by_handle })
    }

    /// The squad the bot was first set up for
    pub fn builtin() -> Self {
        let entries = vec![
            RosterEntry::new("BlueDragon12336", 891692513, 1000091551547, Platform::XboxOne),
            RosterEntry::new("Waterishshark67", 1845585091, 1004812473201, Platform::XboxOne),
        ];
        // Handles above are distinct
        let by_handle = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.handle.clone(), i))
            .collect();
        Self { entries, by_handle }
    }

    /// Load a JSON array of entries
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<RosterEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    pub fn resolve(&self, handle: &str) -> Option<&RosterEntry> {
        self.by_handle.get(handle).map(|&i| &self.entries[i])
    }

    /// First entry whose player id or user id matches
    pub fn find_by_ids(&self, player_id: Option<u64>, user_id: Option<u64>) -> Option<&RosterEntry> {
        if player_id.is_none() && user_id.is_none() {
            return None;
        }
        self.entries.iter().find(|e| {
            player_id.is_some_and(|id| id == e.player_id) || user_id.is_some_and(|id| id == e.user_id)
        })
    }

    /// Case-insensitive handle match, used when ids are missing from a result
    pub fn find_by_handle_ignore_case(&self, name: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.handle.eq_ignore_ascii_case(name))
    }

    pub fn handles(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.handle.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
