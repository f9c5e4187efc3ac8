// Bot features
pub mod interactions;
pub mod leaderboard;
pub mod poster;
