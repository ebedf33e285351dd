//! Service configuration, read from the environment.

use std::path::PathBuf;

/// Runtime configuration for the quotes service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path of the local database file.
    pub db_path: PathBuf,
    /// Port the HTTP server binds on.
    pub port: u16,
}

impl ServiceConfig {
    /// Build a config from environment variables.
    ///
    /// `DATABASE_URL` supplies the store location (a `sqlite://` prefix is
    /// accepted and stripped); absent, the service falls back to a local
    /// file under `./data/`. `QUOTES_PORT` overrides the default port.
    pub fn from_env() -> Self {
        let db_path = std::env::var("DATABASE_URL")
            .map(|url| {
                let path = url
                    .strip_prefix("sqlite://")
                    .or_else(|| url.strip_prefix("sqlite:"))
                    .unwrap_or(&url);
                PathBuf::from(path)
            })
            .unwrap_or_else(|_| PathBuf::from("./data/quotes.db"));

        let port: u16 = std::env::var("QUOTES_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        Self { db_path, port }
    }
}
