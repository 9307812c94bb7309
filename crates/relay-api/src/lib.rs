//! # relay-api
//!
//! HTTP surface of the presence relay, built with Axum, and the wiring that
//! starts the gateway client next to it.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, run};
pub use state::AppState;
