use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_PREVIEW_URL: &str =
    "https://images.unsplash.com/photo-1542272604-787c3835535d?q=80&w=1200&auto=format&fit=crop";

/// Value of `DATABASE_URL` selecting the in-process store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Unset means the service runs without a store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub preview_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 10,
            host: "0.0.0.0".into(),
            port: 8000,
            preview_url: DEFAULT_PREVIEW_URL.into(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let database_url = var("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS {v:?}"))?,
            None => defaults.max_connections,
        };
        let port = match var("APP_PORT").or_else(|| var("PORT")) {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("invalid port {v:?}"))?,
            None => defaults.port,
        };

        Ok(Self {
            database_url,
            max_connections,
            host: var("APP_HOST").unwrap_or(defaults.host),
            port,
            preview_url: var("PREVIEW_URL").unwrap_or(defaults.preview_url),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.server_address(), "0.0.0.0:8000");
        assert_eq!(config.preview_url, DEFAULT_PREVIEW_URL);
    }

    #[test]
    fn app_port_wins_over_port() {
        let config = load(&[("PORT", "9000"), ("APP_PORT", "9100")]).unwrap();
        assert_eq!(config.port, 9100);
        let config = load(&[("PORT", "9000")]).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn blank_database_url_counts_as_unset() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn rejects_unparsable_numbers() {
        assert!(load(&[("APP_PORT", "eighty")]).is_err());
        assert!(load(&[("DATABASE_MAX_CONNECTIONS", "-1")]).is_err());
    }
}
