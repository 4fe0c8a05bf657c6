//! # forum-api
//!
//! JSON API server built with Axum. Sessions travel in an `HttpOnly` cookie
//! or a bearer header; action endpoints redirect anonymous callers to the
//! login page.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
