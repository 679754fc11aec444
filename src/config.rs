use std::env;
use std::time::Duration;

use url::Url;

use crate::animeworld::DEFAULT_BASE_URL;

const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a valid url: {source}")]
    Url {
        key: &'static str,
        source: url::ParseError,
    },

    #[error("{key} must be a non-negative integer, got {value:?}")]
    Number { key: &'static str, value: String },

    #[error("{key} must be at least one second")]
    ZeroTimeout { key: &'static str },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub base_url: Url,
    /// Language index used by the HTTP API when the caller gives none.
    pub api_language_option: usize,
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Reads the process environment; `main` loads `.env` into it first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = get("ANIMEWORLD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());

        let base_url = get("ANIMEWORLD_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_url.trim()).map_err(|source| ConfigError::Url {
            key: "ANIMEWORLD_BASE_URL",
            source,
        })?;

        let api_language_option = match get("ANIMEWORLD_API_LANGUAGE") {
            Some(value) => parse_number("ANIMEWORLD_API_LANGUAGE", &value)?,
            None => 0,
        };

        let request_timeout = match get("ANIMEWORLD_TIMEOUT_SECS") {
            Some(value) => match parse_number("ANIMEWORLD_TIMEOUT_SECS", &value)? {
                0 => {
                    return Err(ConfigError::ZeroTimeout {
                        key: "ANIMEWORLD_TIMEOUT_SECS",
                    });
                }
                secs => Some(Duration::from_secs(secs)),
            },
            None => None,
        };

        Ok(Self {
            bind_addr,
            base_url,
            api_language_option,
            request_timeout,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Number {
        key,
        value: value.to_string(),
    })
}
