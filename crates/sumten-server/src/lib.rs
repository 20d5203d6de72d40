//! sumten-server
//!
//! Multi-room async TCP server for Sum Ten.

pub mod config;
pub mod types;
pub mod server;
pub mod scheduler;

// these are internal modules, not re-exported
mod client;
mod engine_task;
