//! Runtime configuration read from the environment

use std::str::FromStr;

use anyhow::Context;
use review_core::schedule::{MAX_DECKS_PER_DAY, MAX_SEARCH_DAYS};
use review_core::ReviewScheduler;

/// Server settings, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub max_decks_per_day: u32,
    pub review_search_days: u32,
}

impl Config {
    /// Load from process environment (after `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            max_decks_per_day: at_least_one(
                "MAX_DECKS_PER_DAY",
                parse_or(&lookup, "MAX_DECKS_PER_DAY", MAX_DECKS_PER_DAY)?,
            )?,
            review_search_days: at_least_one(
                "REVIEW_SEARCH_DAYS",
                parse_or(&lookup, "REVIEW_SEARCH_DAYS", MAX_SEARCH_DAYS)?,
            )?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn scheduler(&self) -> ReviewScheduler {
        ReviewScheduler::new(self.max_decks_per_day, self.review_search_days)
    }
}

/// A zero capacity or search window would reject every run completion
fn at_least_one(key: &str, value: u32) -> anyhow::Result<u32> {
    anyhow::ensure!(value >= 1, "{} must be at least 1, got {}", key, value);
    Ok(value)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/flashcards")]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.scheduler(), ReviewScheduler::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/flashcards"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("MAX_DECKS_PER_DAY", "4"),
            ("REVIEW_SEARCH_DAYS", "90"),
        ])
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.scheduler(), ReviewScheduler::new(4, 90));
    }

    #[test]
    fn test_missing_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_URL must be set");
    }

    #[test]
    fn test_invalid_number() {
        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("MAX_DECKS_PER_DAY", "0")])
            .unwrap_err();
        assert_eq!(err.to_string(), "MAX_DECKS_PER_DAY must be at least 1, got 0");

        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("REVIEW_SEARCH_DAYS", "0")])
            .unwrap_err();
        assert!(err.to_string().contains("REVIEW_SEARCH_DAYS"));
    }
}
