use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;
const DEFAULT_VOTE_RATE_LIMIT: u32 = 30;
const DEFAULT_VOTE_RATE_WINDOW_SECS: u64 = 60;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub store_timeout: Duration,
    pub seed_list_path: Option<PathBuf>,
    pub admin_token: Option<String>,
    pub vote_rate_limit: u32,
    pub vote_rate_window: Duration,
    pub allowed_origin: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            seed_list_path: None,
            admin_token: None,
            vote_rate_limit: DEFAULT_VOTE_RATE_LIMIT,
            vote_rate_window: Duration::from_secs(DEFAULT_VOTE_RATE_WINDOW_SECS),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.into(),
        }
    }
}

impl ServiceConfig {
    /// Reads settings by key, e.g. `|key| secret_store.get(key)`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let admin_token = non_empty(lookup("ADMIN_TOKEN"));
        if admin_token.is_none() {
            warn!("ADMIN_TOKEN not found - admin reload will be disabled");
        }

        Self {
            store_timeout: Duration::from_millis(try_load(&lookup, "STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)),
            seed_list_path: non_empty(lookup("SEED_LIST_PATH")).map(PathBuf::from),
            admin_token,
            vote_rate_limit: try_load(&lookup, "VOTE_RATE_LIMIT", DEFAULT_VOTE_RATE_LIMIT),
            vote_rate_window: Duration::from_secs(try_load(&lookup, "VOTE_RATE_WINDOW_SECS", DEFAULT_VOTE_RATE_WINDOW_SECS)),
            allowed_origin: non_empty(lookup("ALLOWED_ORIGIN")).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.into()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = non_empty(lookup(key)) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
