//! Application state for the dashboard server.

use tokio::sync::{RwLock, broadcast};

use crate::client::FetchResult;
use crate::config::DashboardConfig;
use crate::controller::Controller;
use crate::notify::{Notification, NotificationCenter};
use crate::view::ViewState;
use crate::ws::events::DashboardEvent;

/// Capacity of the event channel; slow WebSocket clients skip older events.
const EVENT_CAPACITY: usize = 64;

/// Shared application state.
pub struct AppState {
    /// Dashboard configuration.
    pub config: DashboardConfig,
    /// Fetches, fallback and refresh logic.
    pub controller: Controller,
    /// View produced by the latest cycle.
    pub view: RwLock<ViewState>,
    /// Recent user-facing notifications.
    pub notifications: NotificationCenter,
    events: broadcast::Sender<DashboardEvent>,
}

impl AppState {
    /// Create application state with a controller built from `config`.
    pub fn with_config(config: DashboardConfig) -> FetchResult<Self> {
        let controller = Controller::from_config(&config)?;
        Ok(Self::new(config, controller))
    }

    pub fn new(config: DashboardConfig, controller: Controller) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            controller,
            view: RwLock::new(ViewState::connecting()),
            notifications: NotificationCenter::new(),
            events,
        }
    }

    /// Run one refresh cycle now.
    pub async fn refresh(&self) -> ViewState {
        self.controller.refresh(self).await
    }

    /// Copy of the current view.
    pub async fn snapshot(&self) -> ViewState {
        self.view.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Send an event to connected clients, if any.
    pub fn publish(&self, event: DashboardEvent) {
        // No receivers is not an error.
        let _ = self.events.send(event);
    }

    /// Record a notification and push it to clients.
    pub fn notify(&self, notification: Notification) {
        self.notifications.push(notification.clone());
        self.publish(DashboardEvent::Notification(notification));
    }
}
