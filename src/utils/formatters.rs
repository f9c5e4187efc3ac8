// Formatting utilities

use crate::models::stats::LeaderboardRow;

/// Discord caps embed field names at 256 and values at 1024 chars
pub const FIELD_NAME_LIMIT: usize = 256;
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format a kill/death ratio with two decimals
pub fn format_kd(kd: f64) -> String {
    if kd.is_finite() {
        format!("{:.2}", kd)
    } else {
        "0.00".to_string()
    }
}

/// Truncate string to max chars with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Medal for the podium, plain rank otherwise
pub fn rank_badge(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{}", n),
    }
}

/// Embed field (name, value) for one leaderboard row
pub fn leaderboard_field(row: &LeaderboardRow) -> (String, String) {
    let name = truncate(
        &format!("{} {} (Lvl {})", rank_badge(row.rank), row.display_name, row.level),
        FIELD_NAME_LIMIT,
    );

    let value = format!(
        "**K/D:** {} | **Kills:** {} | **Deaths:** {}\n\
        **Assists:** {} | **Revives:** {} | **Accuracy:** {:.1}%\n\
        **Resupplies:** {} | **Repairs:** {}\n\
        **Class:** {} | **Vehicle:** {}\n\
        **Weapon:** {}",
        format_kd(row.kd),
        format_number(row.kills),
        format_number(row.deaths),
        format_number(row.assists),
        format_number(row.revives),
        row.accuracy,
        format_number(row.resupplies),
        format_number(row.repairs),
        row.top_class,
        row.top_vehicle,
        row.top_weapon,
    );

    (name, truncate(&value, FIELD_VALUE_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> LeaderboardRow {
        LeaderboardRow {
            rank: 1,
            display_name: "BlueDragon12336".to_string(),
            level: 42,
            kd: 1.756,
            kills: 12345,
            deaths: 7000,
            assists: 900,
            revives: 55,
            resupplies: 3,
            repairs: 0,
            accuracy: 23.46,
            top_class: "Assault".to_string(),
            top_vehicle: "N/A".to_string(),
            top_weapon: "M5A3".to_string(),
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1000000), "1,000,000");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn test_format_kd() {
        assert_eq!(format_kd(1.756), "1.76");
        assert_eq!(format_kd(0.0), "0.00");
        assert_eq!(format_kd(f64::NAN), "0.00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("ööööö", 4), "ö...");
    }

    #[test]
    fn test_rank_badge() {
        assert_eq!(rank_badge(1), "🥇");
        assert_eq!(rank_badge(3), "🥉");
        assert_eq!(rank_badge(4), "#4");
    }

    #[test]
    fn test_leaderboard_field() {
        let (name, value) = leaderboard_field(&row());
        assert_eq!(name, "🥇 BlueDragon12336 (Lvl 42)");
        assert!(value.contains("**K/D:** 1.76"));
        assert!(value.contains("**Kills:** 12,345"));
        assert!(value.contains("**Accuracy:** 23.5%"));
        assert!(value.contains("**Vehicle:** N/A"));
        assert!(value.contains("**Weapon:** M5A3"));
        assert_eq!(value.lines().count(), 5);
    }
}
