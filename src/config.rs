use ledger_core::StakePresets;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub http_host: String,
    pub http_port: u16,
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
    pub stake_presets: StakePresets,
    pub max_photo_bytes: usize,
    pub log_file_path: String,
    pub log_archive_pattern: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or_default = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let jwt_secret = get("LEDGER_JWT_SECRET").ok_or(ConfigError::Missing("LEDGER_JWT_SECRET"))?;

        let http_port = parse(&get, "LEDGER_HTTP_PORT", 3004u16)?;
        let ttl_hours = parse(&get, "LEDGER_SESSION_TTL_HOURS", 24i64)?;
        if ttl_hours <= 0 {
            return Err(invalid("LEDGER_SESSION_TTL_HOURS", ttl_hours.to_string(), "must be positive"));
        }
        let max_photo_bytes = parse(&get, "LEDGER_MAX_PHOTO_BYTES", 256 * 1024usize)?;

        let stake_presets = match get("LEDGER_STAKE_PRESETS") {
            None => StakePresets::default(),
            Some(raw) => parse_presets(&raw)?,
        };

        Ok(Self {
            database_url: or_default("LEDGER_DATABASE_URL", "sqlite://ledger.db?mode=rwc"),
            http_host: or_default("LEDGER_HTTP_HOST", "127.0.0.1"),
            http_port,
            jwt_secret,
            session_ttl: chrono::Duration::hours(ttl_hours),
            stake_presets,
            max_photo_bytes,
            log_file_path: or_default("LOG_FILE_PATH", "logs/vball-ledger.log"),
            log_archive_pattern: or_default("LOG_ARCHIVE_PATTERN", "logs/vball-ledger.{}.log.gz"),
        })
    }
}

fn parse<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(name, raw, e)),
    }
}

fn parse_presets(raw: &str) -> Result<StakePresets, ConfigError> {
    let stakes = raw
        .split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid("LEDGER_STAKE_PRESETS", raw.to_string(), e))?;
    StakePresets::new(stakes)
        .ok_or_else(|| invalid("LEDGER_STAKE_PRESETS", raw.to_string(), "needs a non-zero stake"))
}

fn invalid(name: &'static str, value: String, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        name,
        value,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("LEDGER_JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.database_url, "sqlite://ledger.db?mode=rwc");
        assert_eq!(config.http_host, "127.0.0.1");
        assert_eq!(config.http_port, 3004);
        assert_eq!(config.session_ttl, chrono::Duration::hours(24));
        assert_eq!(config.stake_presets, StakePresets::default());
        assert_eq!(config.max_photo_bytes, 262144);
        assert_eq!(config.log_file_path, "logs/vball-ledger.log");
    }

    #[test]
    fn test_secret_is_required() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("LEDGER_JWT_SECRET")
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("LEDGER_JWT_SECRET", "  ")])).unwrap_err(),
            ConfigError::Missing("LEDGER_JWT_SECRET")
        );
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LEDGER_JWT_SECRET", "s3cret"),
            ("LEDGER_HTTP_PORT", "8080"),
            ("LEDGER_STAKE_PRESETS", "5, 50,5"),
            ("LEDGER_SESSION_TTL_HOURS", "2"),
            ("LEDGER_DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.stake_presets.as_slice(), &[5, 50]);
        assert_eq!(config.session_ttl, chrono::Duration::hours(2));
        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_invalid_values() {
        let with = |name, value| {
            AppConfig::from_lookup(lookup(&[("LEDGER_JWT_SECRET", "s3cret"), (name, value)]))
        };
        assert!(matches!(
            with("LEDGER_HTTP_PORT", "70000"),
            Err(ConfigError::Invalid { name: "LEDGER_HTTP_PORT", .. })
        ));
        assert!(matches!(
            with("LEDGER_STAKE_PRESETS", "10,abc"),
            Err(ConfigError::Invalid { name: "LEDGER_STAKE_PRESETS", .. })
        ));
        assert!(matches!(
            with("LEDGER_STAKE_PRESETS", "0,0"),
            Err(ConfigError::Invalid { name: "LEDGER_STAKE_PRESETS", .. })
        ));
        assert!(matches!(
            with("LEDGER_SESSION_TTL_HOURS", "0"),
            Err(ConfigError::Invalid { name: "LEDGER_SESSION_TTL_HOURS", .. })
        ));
    }
}
