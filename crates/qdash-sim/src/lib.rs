//! qdash-sim: a local stand-in for the dashboard backend.
//!
//! Serves every JSON endpoint the dashboard polls, backed by a [`World`]
//! whose jobs advance from queued to running to completed/failed as time
//! passes. Endpoints can be switched into failure modes at runtime so the
//! dashboard's demo-data fallback can be exercised end to end.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qdash_sim::{SimState, create_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = Arc::new(SimState::default());
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     axum::serve(listener, create_router(state)).await.unwrap();
//! }
//! ```

pub mod server;
pub mod state;
pub mod world;

pub use server::create_router;
pub use state::{FailureMode, SimState};
pub use world::{World, WorldConfig};
