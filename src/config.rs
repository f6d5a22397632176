use std::env;

use thiserror::Error;

use crate::infrastructure::sales_repo::DEFAULT_TIME_ZONE;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_pool_size: u32,
    /// Zone whose calendar days `fecha_desde` / `fecha_hasta` refer to.
    pub time_zone: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "a valid port number",
                value,
            })?,
            None => 8080,
        };
        let db_pool_size = match lookup("DB_POOL_SIZE") {
            Some(value) => match value.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DB_POOL_SIZE",
                        expected: "a positive integer",
                        value,
                    })
                }
            },
            None => 10,
        };
        let time_zone = lookup("TIME_ZONE")
            .map(|zone| zone.trim().to_string())
            .filter(|zone| !zone.is_empty())
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());

        Ok(Self {
            database_url,
            host,
            port,
            db_pool_size,
            time_zone,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let settings = Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.db_pool_size, 10);
        assert_eq!(settings.time_zone, "UTC");
    }

    #[test]
    fn time_zone_is_read_from_environment() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("TIME_ZONE", " America/Santiago "),
        ]))
        .unwrap();
        assert_eq!(settings.time_zone, "America/Santiago");
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(
            Settings::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn bad_port_is_reported() {
        let err = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "PORT must be a valid port number, got 'eighty'");
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("DB_POOL_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DB_POOL_SIZE", .. }));
    }
}
