//! Subcommand implementations.

pub mod probe;
pub mod serve;
pub mod snapshot;
