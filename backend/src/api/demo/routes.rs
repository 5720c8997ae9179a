//! Defines the HTTP routes for the demo endpoint.

use super::handlers::say_hello;
use crate::auth::middleware::require_authenticated;
use axum::{Router, middleware, routing::get};

pub fn demo_router() -> Router {
    Router::new().route(
        "/",
        get(say_hello).layer(middleware::from_fn(require_authenticated)),
    )
}
