//! WebSocket push of dashboard events.

pub mod events;
pub mod handler;

pub use events::DashboardEvent;
