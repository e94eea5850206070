use crate::controller::{Trigger, ViewState};
use crate::encoding::{palette, Palette};
use crate::errors::AppError;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{extract::State, http::StatusCode, response::Html, Json};
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.dashboard.request()))
}

/// Reading the dashboard counts as activating the view.
pub async fn get_dashboard(State(state): State<AppState>) -> Json<ViewState> {
    if let Trigger::Started(_) = state.dashboard.activate().await {
        debug!("dashboard activated by first read");
    }
    Json(state.dashboard.snapshot().await)
}

pub async fn refresh_dashboard(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ViewState>), AppError> {
    match state.dashboard.refresh().await {
        Trigger::Disposed => Err(AppError::conflict("dashboard view has been disposed")),
        Trigger::AlreadyLoading => {
            debug!("refresh ignored, load already in flight");
            Ok((StatusCode::ACCEPTED, Json(state.dashboard.snapshot().await)))
        }
        Trigger::Started(_) | Trigger::AlreadyActive => {
            Ok((StatusCode::ACCEPTED, Json(state.dashboard.snapshot().await)))
        }
    }
}

pub async fn get_encodings() -> Json<&'static Palette> {
    Json(palette())
}
