// Data models
pub mod roster;
pub mod stats;
