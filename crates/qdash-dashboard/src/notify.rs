//! User-facing notifications.
//!
//! A bounded in-memory queue; the page and `/api/notifications` show the
//! most recent entries.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Maximum number of notifications kept.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded queue of recent notifications.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    entries: Mutex<VecDeque<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification, evicting the oldest beyond [`MAX_NOTIFICATIONS`].
    pub fn push(&self, notification: Notification) {
        let mut entries = self.lock();
        entries.push_back(notification);
        while entries.len() > MAX_NOTIFICATIONS {
            entries.pop_front();
        }
    }

    /// Most recent first.
    pub fn recent(&self, limit: usize) -> Vec<Notification> {
        self.lock().iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_is_newest_first() {
        let center = NotificationCenter::new();
        center.push(Notification::new(NotificationLevel::Info, "first"));
        center.push(Notification::new(NotificationLevel::Warning, "second"));

        let recent = center.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "second");
        assert_eq!(recent[1].message, "first");
    }

    #[test]
    fn test_queue_is_bounded() {
        let center = NotificationCenter::new();
        for i in 0..(MAX_NOTIFICATIONS + 10) {
            center.push(Notification::new(NotificationLevel::Info, format!("n{i}")));
        }
        assert_eq!(center.len(), MAX_NOTIFICATIONS);
        let recent = center.recent(1);
        assert_eq!(recent[0].message, format!("n{}", MAX_NOTIFICATIONS + 9));
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let n = Notification::new(NotificationLevel::Warning, "x");
        let v = serde_json::to_value(&n).unwrap();
        assert_eq!(v["level"], "warning");
    }
}
