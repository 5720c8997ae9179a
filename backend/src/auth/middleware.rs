//! Axum middleware for bearer-token authentication and the minimal
//! authorization guard used by protected routes.

use crate::auth::context::SecurityContext;
use crate::auth::filter::JwtAuthenticationFilter;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// JWT authentication middleware.
///
/// Always forwards the request. Afterwards the request extensions hold a
/// `SecurityContext`, populated when a valid bearer token was presented.
pub async fn jwt_authentication(
    State(filter): State<JwtAuthenticationFilter>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut ctx = request
        .extensions_mut()
        .remove::<SecurityContext>()
        .unwrap_or_default();

    // A header that is not valid UTF-8 cannot carry a bearer token.
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    filter.authenticate(authorization, &mut ctx).await;

    request.extensions_mut().insert(ctx);
    next.run(request).await
}

/// Rejects anonymous requests with 403 Forbidden.
pub async fn require_authenticated(request: Request, next: Next) -> Result<Response, StatusCode> {
    let authenticated = request
        .extensions()
        .get::<SecurityContext>()
        .is_some_and(SecurityContext::is_authenticated);

    if !authenticated {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}
