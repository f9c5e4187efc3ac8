// Experience -> level approximation
//
// Two linear segments: 13k xp per level up to level 50, then 25k per level.
// These constants are an approximation, not the game's real progression
// table. Replace them only with confirmed values.

/// Experience at which the second segment starts (level 50)
pub const SEGMENT_THRESHOLD_XP: u64 = 650_000;
/// Experience per level below the threshold
pub const LOW_RATE_XP: u64 = 13_000;
/// Experience per level at or above the threshold
pub const HIGH_RATE_XP: u64 = 25_000;
pub const THRESHOLD_LEVEL: u64 = 50;
pub const MIN_LEVEL: u64 = 1;

/// Derive a level from total experience
pub fn level_from_experience(xp: u64) -> u64 {
    if xp < SEGMENT_THRESHOLD_XP {
        (xp / LOW_RATE_XP).max(MIN_LEVEL)
    } else {
        THRESHOLD_LEVEL + (xp - SEGMENT_THRESHOLD_XP) / HIGH_RATE_XP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(12_999, 1)]
    #[case(13_000, 1)]
    #[case(26_000, 2)]
    #[case(649_999, 49)]
    #[case(650_000, 50)]
    #[case(674_999, 50)]
    #[case(900_000, 60)]
    fn test_level_from_experience(#[case] xp: u64, #[case] expected: u64) {
        assert_eq!(level_from_experience(xp), expected);
    }

    #[test]
    fn test_matches_segment_formulas() {
        assert_eq!(level_from_experience(649_999), 649_999 / 13_000);
        assert_eq!(level_from_experience(900_000), 50 + 250_000 / 25_000);
    }
}
