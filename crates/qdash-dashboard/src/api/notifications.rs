//! Notification listing.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::notify::{MAX_NOTIFICATIONS, Notification};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<usize>,
}

/// GET /api/notifications - Recent notifications, newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NotificationQuery>,
) -> Json<Vec<Notification>> {
    let limit = query.limit.unwrap_or(MAX_NOTIFICATIONS);
    Json(state.notifications.recent(limit))
}
