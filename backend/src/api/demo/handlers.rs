//! Handler functions for the demo endpoint.

use crate::auth::context::SecurityContext;
use axum::extract::Extension;

#[axum::debug_handler]
pub async fn say_hello(Extension(ctx): Extension<SecurityContext>) -> &'static str {
    if let Some(principal) = ctx.principal() {
        tracing::debug!("Demo endpoint called by {}", principal.subject());
    }
    "Hello from secured endpoint"
}
