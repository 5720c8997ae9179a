//! Handler functions for the registration and login endpoints.
//!
//! These parse the request body and delegate to `auth::service`; the token
//! they return is the only thing clients need for later requests.

use crate::api::common::{ApiError, service_error_to_http};
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::JwtService;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_service): Extension<Arc<JwtService>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<AuthenticationResponse>), ApiError> {
    let auth_service = AuthService::new(&pool, &jwt_service);

    match auth_service.register(payload).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn authenticate(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_service): Extension<Arc<JwtService>>,
    Json(payload): Json<AuthenticationRequest>,
) -> Result<ResponseJson<AuthenticationResponse>, ApiError> {
    let auth_service = AuthService::new(&pool, &jwt_service);

    match auth_service.authenticate(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
