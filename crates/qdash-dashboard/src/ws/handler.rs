//! GET /ws - stream dashboard events as JSON text frames.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;
use crate::ws::events::DashboardEvent;

pub async fn events(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

async fn stream_events(mut socket: WebSocket, state: Arc<AppState>) {
    let mut events = state.subscribe();
    debug!("WebSocket client connected");

    // Start every client from the current view.
    let initial = {
        let view = state.view.read().await;
        let (live, total) = view.live_counts();
        DashboardEvent::ViewUpdated {
            cycle: view.cycle,
            connection: view.connection,
            live_widgets: live,
            total_widgets: total,
        }
    };
    if send_event(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("WebSocket client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("WebSocket client disconnected");
}

async fn send_event(socket: &mut WebSocket, event: &DashboardEvent) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to encode event: {}", e);
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await
}
