//! Request-scoped security context.
//!
//! One `SecurityContext` lives in the extensions of each in-flight request.
//! It starts out anonymous and can be populated exactly once; later attempts
//! leave the existing principal in place so several authentication layers
//! can be stacked without clobbering each other.

use crate::auth::identity::Identity;
use thiserror::Error;

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    authorities: Vec<String>,
}

impl Principal {
    pub fn new(subject: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            subject: subject.into(),
            authorities,
        }
    }

    /// Snapshot the subject and authorities of a looked-up identity.
    pub fn from_identity(identity: &dyn Identity) -> Self {
        Self::new(identity.subject_id(), identity.authorities())
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Security context is already authenticated")]
pub struct AlreadyAuthenticated;

#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Attach `principal` to an anonymous context.
    ///
    /// A populated context is never overwritten.
    pub fn authenticate(&mut self, principal: Principal) -> Result<(), AlreadyAuthenticated> {
        if self.principal.is_some() {
            return Err(AlreadyAuthenticated);
        }
        self.principal = Some(principal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_by_default() {
        let ctx = SecurityContext::default();
        assert!(!ctx.is_authenticated());
        assert!(ctx.principal().is_none());
    }

    #[test]
    fn test_authenticate_is_write_once() {
        let mut ctx = SecurityContext::anonymous();
        let alice = Principal::new("alice@example.com", vec!["USER".to_string()]);
        let bob = Principal::new("bob@example.com", vec!["ADMIN".to_string()]);

        assert_eq!(ctx.authenticate(alice.clone()), Ok(()));
        assert_eq!(ctx.authenticate(bob), Err(AlreadyAuthenticated));
        assert_eq!(ctx.principal(), Some(&alice));
    }

    #[test]
    fn test_principal_authorities() {
        let principal = Principal::new("alice@example.com", vec!["ADMIN".to_string()]);
        assert!(principal.has_authority("ADMIN"));
        assert!(!principal.has_authority("USER"));
        assert_eq!(principal.authorities(), ["ADMIN".to_string()]);
    }
}
