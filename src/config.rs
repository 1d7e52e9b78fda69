use std::{env, path::PathBuf, time::Duration};
use tracing::warn;
use url::Url;

use crate::errors::ApiError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_SESSION_PATH: &str = "data/session.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub session_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Builds the configuration from `BLOPA_API_URL`, `BLOPA_SESSION_PATH`
    /// and `BLOPA_TIMEOUT_SECS` as returned by `lookup`.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup("BLOPA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let session_path = lookup("BLOPA_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH));
        let timeout = match lookup("BLOPA_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("invalid BLOPA_TIMEOUT_SECS value {raw:?}, using default");
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            timeout,
            session_path,
        })
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ApiError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

/// Endpoint paths are joined relative to the base, so the base path always
/// ends with a slash.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::resolve(|_| None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.session_path, PathBuf::from("data/session.json"));
    }

    #[test]
    fn reads_overrides_and_keeps_base_path() {
        let config = ClientConfig::resolve(lookup_from(&[
            ("BLOPA_API_URL", "https://focus.example/backend"),
            ("BLOPA_SESSION_PATH", "/tmp/blopa.json"),
            ("BLOPA_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://focus.example/backend/");
        assert_eq!(
            config.base_url.join("users/login").unwrap().as_str(),
            "https://focus.example/backend/users/login"
        );
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.session_path, PathBuf::from("/tmp/blopa.json"));
    }

    #[test]
    fn bad_timeout_falls_back() {
        let config = ClientConfig::resolve(lookup_from(&[("BLOPA_TIMEOUT_SECS", "soon")])).unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn bad_url_is_rejected() {
        let result = ClientConfig::resolve(lookup_from(&[("BLOPA_API_URL", "not a url")]));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
