use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// One year.
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 86_400;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,
    #[error("Invalid value for {0}: `{1}`")]
    Invalid(&'static str, String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSourceMode {
    /// Probe the live store and fall back to demo data if it is unreachable.
    Auto,
    Live,
    Mock,
}

impl FromStr for DataSourceMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(DataSourceMode::Auto),
            "live" => Ok(DataSourceMode::Live),
            "mock" => Ok(DataSourceMode::Mock),
            _ => Err(()),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub data_source: DataSourceMode,
    pub bcrypt_cost: u32,
    pub log_level: String,
    pub cors_origin: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("data_source", &self.data_source)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("log_level", &self.log_level)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let token_ttl_secs: u64 = parse_or("TOKEN_TTL_SECS", &lookup, 86_400)?;
        if token_ttl_secs == 0 || token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECS", token_ttl_secs.to_string()));
        }

        let bcrypt_cost: u32 = parse_or("BCRYPT_COST", &lookup, 10)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST", bcrypt_cost.to_string()));
        }

        let data_source = match lookup("DATA_SOURCE") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("DATA_SOURCE", raw.clone()))?,
            None => DataSourceMode::Auto,
        };

        Ok(Self {
            port: parse_or("PORT", &lookup, 8000)?,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://medipass.db".to_string()),
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            data_source,
            bcrypt_cost,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            cors_origin: lookup("CORS_ORIGIN").filter(|s| !s.trim().is_empty()),
        })
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_secret_fails_fast() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "9000")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingSecret);

        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "   ")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingSecret);
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.token_ttl, Duration::from_secs(86_400));
        assert_eq!(config.data_source, DataSourceMode::Auto);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s"), ("DATA_SOURCE", "mongo")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid("DATA_SOURCE", "mongo".to_string())
        );

        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "2")]));
        assert!(matches!(result, Err(ConfigError::Invalid("BCRYPT_COST", _))));

        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s"), ("PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::Invalid("PORT", _))));
    }

    #[test]
    fn token_ttl_is_bounded() {
        let result = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid("TOKEN_TTL_SECS", _))));

        let result = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s"),
            ("TOKEN_TTL_SECS", "18446744073709551615"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid("TOKEN_TTL_SECS", _))));

        let max = MAX_TOKEN_TTL_SECS.to_string();
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", &max)])).unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(MAX_TOKEN_TTL_SECS));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "topsecret")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("<redacted>"));
    }
}
