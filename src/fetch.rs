use crate::errors::{Endpoint, FetchError};
use crate::models::{DailyLeadCounts, DashboardRequest, LeadSummary, MetricsSummary, RawBundle};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Anything that can produce a complete [`RawBundle`] for one dashboard load.
/// Implementations return [`FetchError::Cancelled`] once `cancel` fires.
pub trait DashboardSource: Send + Sync + 'static {
    fn fetch_bundle(
        &self,
        request: DashboardRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<RawBundle, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            timeout,
        }
    }

    /// Fetches stats, the daily series and recent leads concurrently and
    /// succeeds only if all three do. Cancelling `cancel` abandons the
    /// in-flight requests and yields [`FetchError::Cancelled`].
    pub async fn load_dashboard(
        &self,
        request: DashboardRequest,
        cancel: &CancellationToken,
    ) -> Result<RawBundle, FetchError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("dashboard load cancelled before settling");
                Err(FetchError::Cancelled)
            }
            result = self.fetch_all(request) => result,
        }
    }

    async fn fetch_all(&self, request: DashboardRequest) -> Result<RawBundle, FetchError> {
        let days = request.window_days.to_string();
        let limit = request.recent_limit.to_string();
        let daily_query = [("days", days.as_str())];
        let recent_query = [("limit", limit.as_str())];

        let (summary, daily, recent) = tokio::join!(
            self.get_json::<MetricsSummary>(Endpoint::Stats, &[]),
            self.get_json::<Vec<Value>>(Endpoint::LeadsPerDay, &daily_query),
            self.get_json::<Vec<Value>>(Endpoint::RecentLeads, &recent_query),
        );

        // First failure in fixed order wins when several requests fail.
        let summary = summary?;
        let daily = daily_rows(daily?);
        let mut recent = lead_rows(recent?);

        if daily.len() != request.window_days as usize {
            warn!(
                "daily series has {} entries, expected {}",
                daily.len(),
                request.window_days
            );
        }
        if recent.len() > request.recent_limit as usize {
            warn!(
                "upstream returned {} recent leads, keeping {}",
                recent.len(),
                request.recent_limit
            );
            recent.truncate(request.recent_limit as usize);
        }

        Ok(RawBundle {
            summary,
            daily,
            recent,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let result = tokio::time::timeout(self.timeout, self.send_and_decode(endpoint, query))
            .await
            .unwrap_or_else(|_| {
                Err(FetchError::Timeout {
                    endpoint,
                    after_ms: self.timeout.as_millis() as u64,
                })
            });

        if let Err(err) = &result {
            warn!("upstream request failed: {err}");
        }
        result
    }

    async fn send_and_decode<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        debug!("GET {url} {query:?}");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::Network {
                endpoint,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|err| FetchError::Network {
            endpoint,
            message: err.to_string(),
        })?;
        serde_json::from_slice::<T>(&body).map_err(|err| FetchError::Decode {
            endpoint,
            message: err.to_string(),
        })
    }
}

impl DashboardSource for DashboardClient {
    async fn fetch_bundle(
        &self,
        request: DashboardRequest,
        cancel: &CancellationToken,
    ) -> Result<RawBundle, FetchError> {
        self.load_dashboard(request, cancel).await
    }
}

/// Rows that are not objects become zero-count days so the series keeps one
/// entry per day of the window.
fn daily_rows(rows: Vec<Value>) -> Vec<DailyLeadCounts> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).unwrap_or_else(|err| {
                warn!("daily row #{index} unreadable, counting it as empty: {err}");
                DailyLeadCounts::default()
            })
        })
        .collect()
}

fn lead_rows(rows: Vec<Value>) -> Vec<LeadSummary> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(lead) => Some(lead),
            Err(err) => {
                warn!("skipping unreadable recent lead #{index}: {err}");
                None
            }
        })
        .collect()
}
