// Slash commands
pub mod help;
pub mod lookup;
pub mod ping;
pub mod squad;
