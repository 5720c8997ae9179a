//! Contracts between the authentication core and whatever stores users.
//!
//! The pipeline never sees a concrete user type: it asks an [`IdentityLookup`]
//! for an [`Identity`] by subject and reads only the subject identifier and
//! the authorization attributes from it.

use crate::errors::LookupError;
use async_trait::async_trait;

/// A principal known to the user store.
pub trait Identity: Send + Sync {
    /// Unique identifier bound into tokens as `sub` (the user's email).
    fn subject_id(&self) -> &str;

    /// Authorization attributes (roles) granted to this identity.
    fn authorities(&self) -> Vec<String>;
}

/// Resolves identities by subject. Must be safe for concurrent calls.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn load_identity_by_subject(
        &self,
        subject: &str,
    ) -> Result<Box<dyn Identity>, LookupError>;
}
