//! Central module for assembling the application's HTTP surface.
//!
//! Every route sits behind the bearer-token middleware, which only annotates
//! requests; the individual routers decide what needs authentication.

pub mod common;
pub mod demo;

use crate::api::common::ApiResponse;
use crate::auth::filter::JwtAuthenticationFilter;
use crate::auth::middleware::jwt_authentication;
use crate::utils::jwt::JwtService;
use axum::{Extension, Router, middleware, response::Json, routing::get};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Builds the full router with its shared state attached.
pub fn app_router(
    pool: SqlitePool,
    jwt_service: Arc<JwtService>,
    filter: JwtAuthenticationFilter,
) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/v1/auth", crate::auth::routes::auth_router())
        .nest("/api/v1/demo-controller", demo::routes::demo_router())
        .layer(middleware::from_fn_with_state(filter, jwt_authentication))
        .layer(Extension(jwt_service))
        .layer(Extension(pool))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Token Auth Backend",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to the Token Auth API",
    ))
}
