use axum::http::StatusCode;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Upstream endpoints the dashboard depends on, in error-reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Stats,
    LeadsPerDay,
    RecentLeads,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Stats => "/dashboard/stats",
            Self::LeadsPerDay => "/dashboard/leads-per-day",
            Self::RecentLeads => "/leads",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{endpoint}: network error: {message}")]
    Network { endpoint: Endpoint, message: String },
    #[error("{endpoint}: upstream returned HTTP {status}")]
    Http { endpoint: Endpoint, status: u16 },
    #[error("{endpoint}: malformed payload: {message}")]
    Decode { endpoint: Endpoint, message: String },
    #[error("{endpoint}: no response within {after_ms}ms")]
    Timeout { endpoint: Endpoint, after_ms: u64 },
    #[error("dashboard load cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Http { .. } => "http",
            Self::Decode { .. } => "decode",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Network { endpoint, .. }
            | Self::Http { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Timeout { endpoint, .. } => Some(*endpoint),
            Self::Cancelled => None,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            endpoint: self.endpoint(),
            status: match self {
                Self::Http { status, .. } => Some(*status),
                _ => None,
            },
            message: self.to_string(),
        }
    }
}

/// Serializable form of a [`FetchError`] handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub endpoint: Option<Endpoint>,
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
