use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Url;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.llmgateway.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_ENV: &str = "LLMGATEWAY_API_KEY";
pub const BASE_URL_ENV: &str = "LLMGATEWAY_BASE_URL";
pub const TIMEOUT_ENV: &str = "LLMGATEWAY_TIMEOUT";

pub(crate) const HEALTH_PATH: &str = "/";
pub(crate) const MODELS_PATH: &str = "/v1/models";
pub(crate) const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Connection settings shared by the blocking and the async transport.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl ToString) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads the configuration from `LLMGATEWAY_*` variables, after loading a
    /// `.env` file from the working directory if there is one.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }
        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            let seconds = timeout.trim().parse::<u64>().map_err(|_| {
                Error::InvalidConfig(format!(
                    "{TIMEOUT_ENV} must be a whole number of seconds, got {timeout:?}"
                ))
            })?;
            config = config.with_timeout(Duration::from_secs(seconds));
        }

        Ok(config)
    }

    /// Sets the gateway address. Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Sets the timeout applied to connecting and to every read.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidConfig(format!("invalid base url {}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "base url must use http or https: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(Error::InvalidApiKey)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("llmgateway-rust/", env!("CARGO_PKG_VERSION"))),
        );
        Ok(headers)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    fn reset_env() {
        env::remove_var(API_KEY_ENV);
        env::remove_var(BASE_URL_ENV);
        env::remove_var(TIMEOUT_ENV);
    }

    #[test]
    fn test_defaults() {
        let actual = Config::new("test-api-key");

        assert_eq!(actual.api_key(), "test-api-key");
        assert_eq!(actual.base_url(), "https://api.llmgateway.io");
        assert_eq!(actual.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let actual = Config::new("key").with_base_url("http://localhost:8080//");
        assert_eq!(actual.base_url(), "http://localhost:8080");
        assert_eq!(actual.url(MODELS_PATH), "http://localhost:8080/v1/models");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let actual = format!("{:?}", Config::new("super-secret"));
        assert!(!actual.contains("super-secret"));
        assert!(actual.contains("[REDACTED]"));
    }

    #[test]
    fn test_headers_carry_bearer_token() {
        let headers = Config::new("test-api-key").headers().unwrap();
        let actual = headers.get(AUTHORIZATION).unwrap();

        assert_eq!(actual.to_str().unwrap(), "Bearer test-api-key");
        assert!(actual.is_sensitive());
    }

    #[test]
    fn test_headers_reject_unprintable_key() {
        let actual = Config::new("bad\nkey").headers();
        assert!(matches!(actual, Err(Error::InvalidApiKey(_))));
    }

    #[test]
    fn test_validate() {
        assert!(Config::new("key").validate().is_ok());
        assert!(Config::new("key").with_base_url("not a url").validate().is_err());
        assert!(Config::new("key").with_base_url("ftp://example.com").validate().is_err());
        assert!(Config::new("key").with_timeout(Duration::ZERO).validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        reset_env();
        env::set_var(API_KEY_ENV, "env-key");
        env::set_var(BASE_URL_ENV, "http://127.0.0.1:9000/");
        env::set_var(TIMEOUT_ENV, "5");

        let actual = Config::from_env().unwrap();
        let expected = Config::new("env-key")
            .with_base_url("http://127.0.0.1:9000")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(actual, expected);
        reset_env();
    }

    #[test]
    #[serial]
    fn test_from_env_without_key() {
        reset_env();

        let actual = Config::from_env();
        assert!(matches!(actual, Err(Error::MissingApiKey)));
    }

    #[test]
    #[serial]
    fn test_from_env_with_invalid_timeout() {
        reset_env();
        env::set_var(API_KEY_ENV, "env-key");
        env::set_var(TIMEOUT_ENV, "soon");

        let actual = Config::from_env();
        assert!(matches!(actual, Err(Error::InvalidConfig(_))));
        reset_env();
    }
}
