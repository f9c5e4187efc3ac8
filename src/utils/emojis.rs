// Emoji data for acknowledgment replies

use rand::seq::IndexedRandom;

pub const EMOJIS: &[&str] = &[
    "😭", "😄", "😌", "🤓", "😎", "😤", "🤖", "😶‍🌫️", "🌏", "📸", "💿", "👋", "🌊", "✨",
];

/// Pick a random emoji for acknowledgment replies
pub fn random_emoji() -> &'static str {
    EMOJIS.choose(&mut rand::rng()).copied().unwrap_or("✨")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_emoji_from_list() {
        for _ in 0..20 {
            assert!(EMOJIS.contains(&random_emoji()));
        }
    }
}
