use anyhow::{anyhow, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub lunch_seed_group: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/kst_bot.db".to_string());
        let database_url = if database_url.trim().is_empty() {
            "sqlite:./data/kst_bot.db".to_string()
        } else {
            database_url
        };

        // The store is a local SQLite file; anything else is a misconfiguration.
        if !database_url.trim_start().starts_with("sqlite:") {
            return Err(anyhow!("DATABASE_URL must be a sqlite: URL"));
        }

        let lunch_seed_group = env::var("LUNCH_SEED_GROUP")
            .ok()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        Ok(Config {
            database_url,
            lunch_seed_group,
        })
    }
}
