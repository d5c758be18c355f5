use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DebounceConfig {
    pub search_ms: u64,
    pub commit_ms: u64,
}

impl DebounceConfig {
    pub fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    pub fn commit(&self) -> Duration {
        Duration::from_millis(self.commit_ms)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            search_ms: 100,
            commit_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub debounce: DebounceConfig,
    pub user_state_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = DebounceConfig::default();
        let api_base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into())
            .trim_end_matches('/')
            .to_string();
        anyhow::ensure!(
            api_base_url.starts_with("http://") || api_base_url.starts_with("https://"),
            "API_BASE_URL must be an http(s) url, got {api_base_url}"
        );
        let debounce = DebounceConfig {
            search_ms: env_u64("SEARCH_DEBOUNCE_MS").unwrap_or(defaults.search_ms),
            commit_ms: env_u64("COMMIT_DEBOUNCE_MS").unwrap_or(defaults.commit_ms),
        };
        Ok(Self {
            api_base_url,
            request_timeout_secs: env_u64("REQUEST_TIMEOUT_SECS").unwrap_or(60),
            debounce,
            user_state_path: std::env::var("USER_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".brotein_user_id")),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok())
}
