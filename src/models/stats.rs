// Stats models for the squad leaderboard
// Everything coming back from the stats API is optional; missing or oddly
// typed values deserialize to None instead of failing the whole record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One player record as returned by the stats API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_name: Option<String>,
    #[serde(default, rename = "id", deserialize_with = "lenient_u64")]
    pub player_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub user_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kill_death: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kills: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub deaths: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kill_assists: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revives: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub resupplies: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub repairs: Option<f64>,
    /// Either a number or a percent string like "23.5%"
    #[serde(default, deserialize_with = "lenient_f64")]
    pub accuracy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub rank: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub level: Option<u64>,
    #[serde(default, rename = "XP", deserialize_with = "lenient_list")]
    pub experience: Vec<ExperienceByMode>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub classes: Vec<CategoryKills>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub vehicles: Vec<CategoryKills>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub weapons: Vec<CategoryKills>,
}

impl StatsResult {
    /// Kill/death ratio, 0 when absent or not a finite number
    pub fn kd(&self) -> f64 {
        finite_or_zero(self.kill_death)
    }

    pub fn total_experience(&self) -> u64 {
        self.experience
            .iter()
            .map(|xp| finite_or_zero(xp.total).max(0.0) as u64)
            .fold(0u64, u64::saturating_add)
    }

    /// Explicit rank/level when the API supplies a positive one
    pub fn explicit_level(&self) -> Option<u64> {
        self.rank
            .filter(|&l| l > 0)
            .or(self.level.filter(|&l| l > 0))
    }
}

/// Experience earned in one game mode
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceByMode {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: Option<f64>,
}

/// One entry of a per-class, per-vehicle or per-weapon breakdown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryKills {
    pub name: Option<String>,
    pub kills: f64,
}

// Name keys differ per breakdown, and class entries carry more than one
const NAME_KEYS: &[&str] = &["className", "characterName", "vehicleName", "weaponName", "name"];

impl<'de> Deserialize<'de> for CategoryKills {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let name = NAME_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let kills = finite_or_zero(map.get("kills").and_then(value_as_f64));
        Ok(Self { name, kills })
    }
}

/// Presentation row for one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub display_name: String,
    pub level: u64,
    pub kd: f64,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub revives: u64,
    pub resupplies: u64,
    pub repairs: u64,
    pub accuracy: f64,
    pub top_class: String,
    pub top_vehicle: String,
    pub top_weapon: String,
}

pub fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Deserialize an array, skipping elements that don't fit and treating
/// anything that isn't an array as empty
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let result: StatsResult = serde_json::from_value(json!({
            "userName": "BlueDragon12336",
            "id": 891692513,
            "userId": 1000091551547u64,
            "killDeath": 1.75,
            "kills": 700,
            "deaths": 400,
            "killAssists": 120,
            "revives": 33,
            "accuracy": "23.5%",
            "XP": [{"total": 100000}, {"total": 25000}],
            "classes": [{"className": "Assault", "characterName": "Boris", "kills": 300}],
            "weapons": [{"weaponName": "M5A3", "kills": 250}],
        }))
        .unwrap();

        assert_eq!(result.user_name.as_deref(), Some("BlueDragon12336"));
        assert_eq!(result.player_id, Some(891692513));
        assert_eq!(result.user_id, Some(1000091551547));
        assert_eq!(result.kd(), 1.75);
        assert_eq!(result.accuracy, Some(23.5));
        assert_eq!(result.total_experience(), 125000);
        assert_eq!(result.classes[0].name.as_deref(), Some("Assault"));
        assert_eq!(result.weapons[0].kills, 250.0);
        assert!(result.vehicles.is_empty());
    }

    #[test]
    fn test_empty_record_defaults() {
        let result: StatsResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result.kd(), 0.0);
        assert_eq!(result.total_experience(), 0);
        assert_eq!(result.explicit_level(), None);
        assert!(result.user_name.is_none());
    }

    #[test]
    fn test_odd_types_do_not_fail() {
        let result: StatsResult = serde_json::from_value(json!({
            "id": "42",
            "killDeath": null,
            "kills": "n/a",
            "XP": "not a list",
            "weapons": [{"weaponName": "AK", "kills": 5}, 17, {"kills": "3"}],
            "rank": 0,
        }))
        .unwrap();
        assert_eq!(result.player_id, Some(42));
        assert_eq!(result.kd(), 0.0);
        assert_eq!(result.kills, None);
        assert!(result.experience.is_empty());
        assert_eq!(result.weapons.len(), 2);
        assert_eq!(result.weapons[1].kills, 3.0);
        assert_eq!(result.explicit_level(), None);
    }

    #[test]
    fn test_explicit_level_prefers_rank() {
        let result: StatsResult =
            serde_json::from_value(json!({"rank": 37, "level": 12})).unwrap();
        assert_eq!(result.explicit_level(), Some(37));

        // A zero rank counts as absent, so level is used
        let result: StatsResult =
            serde_json::from_value(json!({"rank": 0, "level": 12})).unwrap();
        assert_eq!(result.explicit_level(), Some(12));

        let result: StatsResult =
            serde_json::from_value(json!({"rank": 0, "level": 0})).unwrap();
        assert_eq!(result.explicit_level(), None);
    }

    #[test]
    fn test_total_experience_saturates() {
        let result: StatsResult = serde_json::from_value(json!({
            "XP": [{"total": 1e20}, {"total": 1e20}, {"total": 5}]
        }))
        .unwrap();
        assert_eq!(result.total_experience(), u64::MAX);
    }
}
