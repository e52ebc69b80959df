//! qdash - polling web dashboard for quantum jobs and backends.
//!
//! The dashboard periodically fetches eight JSON endpoints from a backend
//! (`/api/metrics`, `/api/jobs`, `/api/backends`, ...), substitutes randomly
//! generated demo data for any endpoint that fails, and renders the result
//! as a server-side HTML page, a JSON API, a WebSocket event stream, and a
//! terminal snapshot.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qdash_dashboard::{AppState, DashboardConfig, create_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::default();
//!     let bind = config.bind_addr()?;
//!     let state = Arc::new(AppState::with_config(config)?);
//!     state.refresh().await;
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind(bind).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod notify;
pub mod render;
pub mod server;
pub mod state;
pub mod view;
pub mod ws;

pub use client::{ApiClient, FetchError, FetchResult};
pub use config::{ConfigError, ConfigOverrides, DashboardConfig};
pub use controller::{Controller, run_poller};
pub use error::{ApiError, ApiResult};
pub use fallback::Fallback;
pub use notify::{Notification, NotificationCenter, NotificationLevel};
pub use server::create_router;
pub use state::AppState;
pub use view::{ConnectionStatus, CycleData, DataSource, Sourced, ViewState, Widget};
pub use ws::DashboardEvent;
