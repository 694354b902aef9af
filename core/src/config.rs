//! Client configuration.
//!
//! Set once at construction and read-only afterwards. `from_env` mirrors the
//! builder for hosts that configure through the environment:
//!
//! | variable              | field       |
//! |-----------------------|-------------|
//! | `GEOAPI_KEY`          | `api_key` (required) |
//! | `GEOAPI_USER_ID`      | `user_id`   |
//! | `GEOAPI_BASE_URL`     | `base_url`  |
//! | `GEOAPI_DEBUG`        | `debugging` (`1` / `true`) |
//! | `GEOAPI_TIMEOUT_SECS` | `timeout`   |

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://geoapi.fwix.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub user_id: Option<String>,
    pub base_url: String,
    /// Log every request URL and POST body at `debug` level.
    pub debugging: bool,
    /// Whole-request timeout. `None` blocks until the server answers.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            user_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            debugging: false,
            timeout: None,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn debugging(mut self, debugging: bool) -> Self {
        self.debugging = debugging;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GEOAPI_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("GEOAPI_KEY is not set".to_string()))?;
        let mut config = Self::new(api_key);
        if let Some(user_id) = lookup("GEOAPI_USER_ID").filter(|u| !u.is_empty()) {
            config = config.user_id(user_id);
        }
        if let Some(base_url) = lookup("GEOAPI_BASE_URL") {
            config = config.base_url(&base_url);
        }
        if let Some(debug) = lookup("GEOAPI_DEBUG") {
            config.debugging = matches!(debug.as_str(), "1" | "true" | "TRUE" | "yes");
        }
        if let Some(secs) = lookup("GEOAPI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Config(format!("GEOAPI_TIMEOUT_SECS is not a number: {secs}")))?;
            config = config.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
