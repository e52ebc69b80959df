//! View and widget endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::view::{ViewState, Widget};

/// GET /api/view - The whole view from the latest cycle.
pub async fn get_view(State(state): State<Arc<AppState>>) -> Json<ViewState> {
    Json(state.snapshot().await)
}

/// GET /api/widgets/{name} - One widget's data and its source.
pub async fn get_widget(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let widget =
        Widget::from_name(&name).ok_or_else(|| ApiError::NotFound(format!("Widget '{name}'")))?;
    let view = state.view.read().await;
    Ok(Json(view.widget_json(widget)?))
}

/// POST /api/refresh - Run a cycle now and return the new view.
pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<ViewState> {
    Json(state.refresh().await)
}
