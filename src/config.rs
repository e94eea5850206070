use crate::models::DashboardRequest;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub port: u16,
    pub upstream_url: String,
    pub request: DashboardRequest,
    pub request_timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            request: DashboardRequest::default(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let upstream_url = lookup("UPSTREAM_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.upstream_url);

        Self {
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            upstream_url,
            request: DashboardRequest {
                window_days: parsed(&lookup, "DASHBOARD_WINDOW_DAYS")
                    .filter(|days| *days > 0)
                    .unwrap_or(defaults.request.window_days),
                recent_limit: parsed(&lookup, "RECENT_LEADS_LIMIT")
                    .filter(|limit| *limit > 0)
                    .unwrap_or(defaults.request.recent_limit),
            },
            request_timeout: parsed(&lookup, "UPSTREAM_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring unparseable {key}={raw:?}");
            None
        }
    }
}
