/// Default administrator credentials from environment variables
pub mod admin;

/// Server and import settings from config.toml
pub mod app;

/// Database configuration and connection management
pub mod database;

pub use app::{AppConfig, ImportConfig, ServerConfig};
