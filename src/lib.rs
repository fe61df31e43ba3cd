pub mod client;
pub mod config;
pub mod date_utils;
pub mod db;
pub mod error;
pub mod form_utils;
pub mod handlers;
pub mod models;
pub mod server;
pub mod services;
pub mod state;

/// Application version from Cargo.toml (single source of truth)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
