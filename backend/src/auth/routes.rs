//! Defines the HTTP routes for registration and login.
//!
//! Mounted under `/api/v1/auth` by `main.rs`. Both routes are public; the
//! bearer-token middleware still runs over them but never blocks.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

/// Creates the authentication router
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/authenticate", post(authenticate))
}
