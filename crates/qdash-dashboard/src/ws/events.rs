//! WebSocket event types for real-time updates.

use serde::Serialize;

use crate::notify::Notification;
use crate::view::ConnectionStatus;

/// Events sent to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// A refresh cycle replaced the view.
    ViewUpdated {
        cycle: u64,
        connection: ConnectionStatus,
        live_widgets: usize,
        total_widgets: usize,
    },
    /// Backend reachability changed between cycles.
    ConnectionChanged {
        from: ConnectionStatus,
        to: ConnectionStatus,
    },
    /// A notification was raised.
    Notification(Notification),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;

    #[test]
    fn test_events_are_tagged() {
        let event = DashboardEvent::ConnectionChanged {
            from: ConnectionStatus::Live,
            to: ConnectionStatus::Offline,
        };
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["type"], "connection_changed");
        assert_eq!(v["to"], "offline");

        let event = DashboardEvent::Notification(Notification::new(NotificationLevel::Info, "hi"));
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["type"], "notification");
        assert_eq!(v["message"], "hi");
    }
}
