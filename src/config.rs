use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WEEK_PATH: &str = "data/week.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub item_id: Option<i64>,
    pub week_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            item_id: None,
            week_path: PathBuf::from(DEFAULT_WEEK_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("LEDGER_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_url);
        let timeout = lookup("LEDGER_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let item_id = lookup("LEDGER_ITEM_ID").and_then(|value| value.trim().parse::<i64>().ok());
        let week_path = lookup("LEDGER_WEEK_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.week_path);

        Self {
            api_url,
            timeout,
            item_id,
            week_path,
        }
    }
}
