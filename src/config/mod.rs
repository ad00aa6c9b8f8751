/// Application settings loaded from config.toml
pub mod app;

/// Database configuration and connection management
pub mod database;
