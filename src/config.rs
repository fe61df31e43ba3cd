use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("TALLY_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("TALLY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            database_path: env::var("TALLY_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/tally.db")),
            migrations_path: env::var("TALLY_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the `tally-report` client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_url: env::var("TALLY_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://127.0.0.1:7070".into()),
        }
    }
}
