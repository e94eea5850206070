#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration as DateDuration, NaiveDate};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Stand-in for the lead API. Each endpoint can be switched to fail or stall.
#[derive(Clone, Default)]
pub struct Upstream {
    pub stats_status: Arc<AtomicU16>,
    pub daily_status: Arc<AtomicU16>,
    pub stats_delay_ms: Arc<AtomicU64>,
    pub malformed_leads: Arc<AtomicBool>,
    pub null_rows: Arc<AtomicBool>,
    pub queries: Arc<Mutex<Vec<(String, String)>>>,
}

impl Upstream {
    pub fn fail_stats(&self, status: u16) {
        self.stats_status.store(status, Ordering::SeqCst);
    }

    pub fn fail_daily(&self, status: u16) {
        self.daily_status.store(status, Ordering::SeqCst);
    }

    pub fn stall_stats(&self, delay: Duration) {
        self.stats_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn seen_query(&self, key: &str) -> Option<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn record(&self, params: &HashMap<String, String>) {
        let mut queries = self.queries.lock().unwrap();
        for (key, value) in params {
            queries.push((key.clone(), value.clone()));
        }
    }
}

fn failure(status: &AtomicU16) -> Option<Response> {
    match status.load(Ordering::SeqCst) {
        0 => None,
        code => Some(
            StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
        ),
    }
}

async fn stats(State(upstream): State<Upstream>) -> Response {
    let delay = upstream.stats_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if let Some(response) = failure(&upstream.stats_status) {
        return response;
    }
    Json(json!({
        "total_conversations": 120,
        "total_leads": 40,
        "hot_leads": 8,
        "conversion_rate": 33,
        "leads_by_stage": { "awareness": 10, "purchase": 0 }
    }))
    .into_response()
}

async fn leads_per_day(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    upstream.record(&params);
    if let Some(response) = failure(&upstream.daily_status) {
        return response;
    }
    let days: i64 = params.get("days").and_then(|d| d.parse().ok()).unwrap_or(7);
    let first = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let null_rows = upstream.null_rows.load(Ordering::SeqCst);
    let series: Vec<_> = (0..days)
        .map(|offset| {
            if null_rows && offset == 1 {
                return serde_json::Value::Null;
            }
            let date = first + DateDuration::days(offset);
            json!({ "date": date.to_string(), "hot": offset, "warm": 2, "cold": 1 })
        })
        .collect();
    Json(series).into_response()
}

async fn leads(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    upstream.record(&params);
    if upstream.malformed_leads.load(Ordering::SeqCst) {
        return Json(json!({ "leads": "not a list" })).into_response();
    }
    let null_rows = upstream.null_rows.load(Ordering::SeqCst);
    let hotness = ["hot", "warm", "cold"];
    let rows: Vec<_> = (0..7usize)
        .map(|n| {
            if null_rows && n == 0 {
                return serde_json::Value::Null;
            }
            let customer = (n > 0).then(|| format!("Customer {n}"));
            let intent = (n == 1).then_some("wants a demo");
            let stage = if n == 2 { "negotiation" } else { "interest" };
            json!({
                "id": format!("lead-{n}"),
                "customer_name": customer,
                "intent": intent,
                "stage": stage,
                "hotness": hotness[n % 3],
                "score": 50 + n
            })
        })
        .collect();
    Json(rows).into_response()
}

pub async fn spawn_upstream(upstream: Upstream) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/leads-per-day", get(leads_per_day))
        .route("/leads", get(leads))
        .with_state(upstream);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream server");
    });
    format!("http://{addr}")
}
