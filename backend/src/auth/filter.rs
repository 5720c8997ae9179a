//! Bearer-token authentication filter.
//!
//! Runs once per request before any protected handler. It only annotates the
//! request's [`SecurityContext`]; it never rejects. Every failure (missing
//! header, unparsable token, unknown subject, bad signature, expiry) leaves
//! the request anonymous and downstream authorization decides what to do.

use std::sync::Arc;

use crate::auth::context::{Principal, SecurityContext};
use crate::auth::identity::IdentityLookup;
use crate::errors::LookupError;
use crate::utils::jwt::JwtService;

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct JwtAuthenticationFilter {
    jwt_service: Arc<JwtService>,
    identity_lookup: Arc<dyn IdentityLookup>,
}

impl JwtAuthenticationFilter {
    pub fn new(jwt_service: Arc<JwtService>, identity_lookup: Arc<dyn IdentityLookup>) -> Self {
        Self {
            jwt_service,
            identity_lookup,
        }
    }

    /// Authenticate from the raw `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>, ctx: &mut SecurityContext) {
        let Some(token) = authorization.and_then(|value| value.strip_prefix(BEARER_PREFIX)) else {
            return;
        };

        let subject = match self.jwt_service.extract_subject(token) {
            Ok(subject) => subject,
            Err(e) => {
                tracing::debug!("Ignoring bearer token: {}", e);
                return;
            }
        };

        if ctx.is_authenticated() {
            return;
        }

        let identity = match self.identity_lookup.load_identity_by_subject(&subject).await {
            Ok(identity) => identity,
            Err(LookupError::NotFound) => {
                tracing::debug!("No identity for token subject");
                return;
            }
            Err(LookupError::Store(e)) => {
                tracing::warn!("Identity lookup failed, continuing anonymously: {}", e);
                return;
            }
        };

        if !self.jwt_service.is_valid(token, identity.as_ref()) {
            return;
        }

        let principal = Principal::from_identity(identity.as_ref());
        if ctx.authenticate(principal).is_ok() {
            tracing::debug!(subject = %subject, "Request authenticated");
        }
    }
}
