// Third-party API clients
pub mod gametools;
