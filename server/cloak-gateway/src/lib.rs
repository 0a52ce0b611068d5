//! Cloak HTTP gateway.
//!
//! Routes the northbound JSON API onto the three core services, enforces
//! the access-token middleware on protected routes, retries transient
//! backend faults with exponential backoff, and owns the TLS bootstrap.

pub mod backend;
pub mod config;
pub mod cookies;
pub mod duration;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod retry;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod tls;

pub use config::GatewaySettings;
pub use state::AppState;
