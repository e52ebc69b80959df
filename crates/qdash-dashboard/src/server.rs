//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::render;
use crate::state::AppState;
use crate::ws;

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/probe", get(api::health::probe))
        .route("/view", get(api::view::get_view))
        .route("/widgets/{name}", get(api::view::get_widget))
        .route("/refresh", post(api::view::refresh))
        .route(
            "/notifications",
            get(api::notifications::list_notifications),
        );

    let page_routes = Router::new()
        .route("/", get(serve_page))
        .route("/index.html", get(serve_page))
        .route("/ws", get(ws::handler::events));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let view = state.snapshot().await;
    let notifications = state.notifications.recent(crate::notify::MAX_NOTIFICATIONS);
    let options = render::RenderOptions::from_config(&state.config);
    Html(render::html::page(&view, &notifications, &options))
}
