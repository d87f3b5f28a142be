//! Player configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `TRAILHUNT_API_URL` - Backend base URL (default: http://localhost:3000)
//! - `TRAILHUNT_CHAT_PATH` - Chat endpoint path (default: /api/chat)
//! - `TRAILHUNT_REQUEST_TIMEOUT_MS` - Per-request deadline (default: 15000)
//! - `TRAILHUNT_PROXIMITY_THRESHOLD_M` - Distance counting as "found" (default: 50)
//! - `TRAILHUNT_USER_ID` / `TRAILHUNT_TRAIL_REF` - Session identity (optional)
//!
//! Missing or unparseable values fall back to their defaults.

use std::str::FromStr;

use trailhunt_domain::{DomainError, SessionContext};
use trailhunt_shared::DEFAULT_CHAT_PATH;

use crate::application::error::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::application::proximity::{ProximityConfig, DEFAULT_PROXIMITY_THRESHOLD_M};
use crate::infrastructure::http_client::DEFAULT_API_URL;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub api_url: String,
    pub chat_path: String,
    pub request_timeout_ms: u64,
    pub proximity: ProximityConfig,
    pub user_id: Option<String>,
    pub trail_ref: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            proximity: ProximityConfig::default(),
            user_id: None,
            trail_ref: None,
        }
    }
}

impl PlayerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed_or<T: FromStr>(value: Option<String>, default: T) -> T {
            value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        }

        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_url: non_blank("TRAILHUNT_API_URL").unwrap_or(defaults.api_url),
            chat_path: non_blank("TRAILHUNT_CHAT_PATH").unwrap_or(defaults.chat_path),
            request_timeout_ms: parsed_or(
                lookup("TRAILHUNT_REQUEST_TIMEOUT_MS"),
                defaults.request_timeout_ms,
            ),
            proximity: ProximityConfig {
                threshold_m: parsed_or(
                    lookup("TRAILHUNT_PROXIMITY_THRESHOLD_M"),
                    DEFAULT_PROXIMITY_THRESHOLD_M,
                ),
            },
            user_id: non_blank("TRAILHUNT_USER_ID"),
            trail_ref: non_blank("TRAILHUNT_TRAIL_REF"),
        }
    }

    /// Session identity from configuration, if both halves are present.
    pub fn session(&self) -> Result<SessionContext, DomainError> {
        SessionContext::new(
            self.user_id.clone().unwrap_or_default(),
            self.trail_ref.clone().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.request_timeout_ms, 15_000);
        assert_eq!(config.proximity.threshold_m, 50.0);
        assert!(config.session().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = PlayerConfig::from_lookup(lookup(&[
            ("TRAILHUNT_API_URL", "https://trails.example.com"),
            ("TRAILHUNT_CHAT_PATH", "/api/characters/chat"),
            ("TRAILHUNT_REQUEST_TIMEOUT_MS", "2500"),
            ("TRAILHUNT_PROXIMITY_THRESHOLD_M", "12.5"),
            ("TRAILHUNT_USER_ID", "42"),
            ("TRAILHUNT_TRAIL_REF", "DragonReturn_Brandon"),
        ]));
        assert_eq!(config.api_url, "https://trails.example.com");
        assert_eq!(config.chat_path, "/api/characters/chat");
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.proximity.threshold_m, 12.5);
        assert_eq!(config.session().unwrap().trail_ref(), "DragonReturn_Brandon");
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = PlayerConfig::from_lookup(lookup(&[
            ("TRAILHUNT_REQUEST_TIMEOUT_MS", "soon"),
            ("TRAILHUNT_API_URL", "  "),
        ]));
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
