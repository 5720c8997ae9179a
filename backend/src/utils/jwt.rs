//! JWT token service for stateless authentication.
//!
//! Issues and verifies HS256-signed bearer tokens over a symmetric secret
//! supplied at startup. Nothing here touches I/O or server-side state: a
//! token is valid purely by its signature, its subject and its expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::auth::identity::Identity;
use crate::config::TokenSettings;
use crate::errors::TokenError;

const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// JWT claims: the standard subject/issued-at/expiry plus free-form extras.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (the user's email)
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// A token is expired from its `exp` second onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[derive(Deserialize)]
struct SubjectOnly {
    sub: String,
}

/// Token service holding the signing keys.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    unverified: Validation,
    lifetime: Duration,
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(settings: &TokenSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        // Expiry is checked against an explicit clock in `verify_at`, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let mut unverified = Validation::new(Algorithm::HS256);
        unverified.insecure_disable_signature_validation();
        unverified.validate_exp = false;
        unverified.validate_aud = false;
        unverified.set_required_spec_claims(&["sub"]);

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            unverified,
            lifetime: Duration::from_std(settings.lifetime).unwrap_or(Duration::MAX),
        }
    }

    /// Issue a token for `identity` valid from now for the configured lifetime.
    pub fn issue(
        &self,
        identity: &dyn Identity,
        extra_claims: Map<String, Value>,
    ) -> Result<String, TokenError> {
        self.issue_at(identity, extra_claims, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &dyn Identity,
        mut extra_claims: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let exp = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".to_string()))?;

        for reserved in RESERVED_CLAIMS {
            extra_claims.remove(reserved);
        }

        let claims = Claims {
            sub: identity.subject_id().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            extra: extra_claims,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Read the subject without checking signature or expiry.
    ///
    /// Only fails when the token cannot be parsed or has no `sub`.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        decode::<SubjectOnly>(token, &self.decoding_key, &self.unverified)
            .map(|data| data.claims.sub)
            .map_err(|e| TokenError::MalformedToken(e.to_string()))
    }

    /// Whether `token` is a currently valid token for `identity`.
    pub fn is_valid(&self, token: &str, identity: &dyn Identity) -> bool {
        self.is_valid_at(token, identity, Utc::now())
    }

    pub fn is_valid_at(&self, token: &str, identity: &dyn Identity, now: DateTime<Utc>) -> bool {
        match self.verify_at(token, identity, now) {
            Ok(_) => true,
            Err(reason) => {
                tracing::debug!(subject = identity.subject_id(), %reason, "token rejected");
                false
            }
        }
    }

    /// Full verification returning the reason for rejection.
    pub fn verify_at(
        &self,
        token: &str,
        identity: &dyn Identity,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                _ => TokenError::MalformedToken(e.to_string()),
            })?;

        if claims.sub != identity.subject_id() {
            return Err(TokenError::SubjectMismatch);
        }

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::TimeZone;
    use serde_json::json;

    struct TestIdentity(&'static str);

    impl Identity for TestIdentity {
        fn subject_id(&self) -> &str {
            self.0
        }

        fn authorities(&self) -> Vec<String> {
            vec!["USER".to_string()]
        }
    }

    fn service(secret: &str, lifetime_secs: u64) -> JwtService {
        JwtService::new(&TokenSettings {
            secret: secret.to_string(),
            lifetime: std::time::Duration::from_secs(lifetime_secs),
        })
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_then_extract_and_validate() {
        let jwt = service("secret", 3600);
        let alice = TestIdentity("alice@example.com");

        let token = jwt.issue(&alice, Map::new()).unwrap();

        assert_eq!(jwt.extract_subject(&token).unwrap(), "alice@example.com");
        assert!(jwt.is_valid(&token, &alice));
    }

    #[test]
    fn test_claims_carry_issue_and_expiry_times() {
        let jwt = service("secret", 3600);
        let alice = TestIdentity("alice@example.com");
        let now = fixed_now();

        let token = jwt.issue_at(&alice, Map::new(), now).unwrap();
        let claims = jwt.verify_at(&token, &alice, now).unwrap();

        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 3600);
    }

    #[test]
    fn test_expiry_boundary() {
        let jwt = service("secret", 60);
        let alice = TestIdentity("alice@example.com");
        let now = fixed_now();
        let token = jwt.issue_at(&alice, Map::new(), now).unwrap();

        assert!(jwt.is_valid_at(&token, &alice, now));
        assert!(jwt.is_valid_at(&token, &alice, now + Duration::seconds(59)));
        assert!(!jwt.is_valid_at(&token, &alice, now + Duration::seconds(60)));
        assert!(!jwt.is_valid_at(&token, &alice, now + Duration::days(1)));
        assert_eq!(
            jwt.verify_at(&token, &alice, now + Duration::seconds(60)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = service("issuer-secret", 3600);
        let verifier = service("verifier-secret", 3600);
        let alice = TestIdentity("alice@example.com");

        let token = issuer.issue(&alice, Map::new()).unwrap();

        assert!(!verifier.is_valid(&token, &alice));
        assert_eq!(
            verifier.verify_at(&token, &alice, Utc::now()),
            Err(TokenError::SignatureInvalid)
        );
        // The subject is still readable for routing purposes.
        assert_eq!(verifier.extract_subject(&token).unwrap(), "alice@example.com");
    }

    #[test]
    fn test_subject_mismatch_is_rejected() {
        let jwt = service("secret", 3600);
        let alice = TestIdentity("alice@example.com");
        let bob = TestIdentity("bob@example.com");

        let token = jwt.issue(&alice, Map::new()).unwrap();

        assert!(!jwt.is_valid(&token, &bob));
        assert_eq!(
            jwt.verify_at(&token, &bob, Utc::now()),
            Err(TokenError::SubjectMismatch)
        );
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let jwt = service("secret", 3600);
        let alice = TestIdentity("alice@example.com");
        let mallory = TestIdentity("mallory@example.com");
        let token = jwt.issue(&alice, Map::new()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let mut payload: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        payload["sub"] = json!("mallory@example.com");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap()),
            parts[2]
        );

        assert_eq!(jwt.extract_subject(&forged).unwrap(), "mallory@example.com");
        assert!(!jwt.is_valid(&forged, &mallory));
    }

    #[test]
    fn test_malformed_token() {
        let jwt = service("secret", 3600);
        let alice = TestIdentity("alice@example.com");

        for garbage in ["", "not-a-jwt", "a.b.c", "....."] {
            assert!(matches!(
                jwt.extract_subject(garbage),
                Err(TokenError::MalformedToken(_))
            ));
            assert!(!jwt.is_valid(garbage, &alice));
        }
    }

    #[test]
    fn test_extra_claims_cannot_override_reserved() {
        let jwt = service("secret", 3600);
        let alice = TestIdentity("alice@example.com");
        let now = fixed_now();

        let mut extra = Map::new();
        extra.insert("sub".to_string(), json!("mallory@example.com"));
        extra.insert("exp".to_string(), json!(i64::MAX));
        extra.insert("tenant".to_string(), json!("blue"));

        let token = jwt.issue_at(&alice, extra, now).unwrap();
        let claims = jwt.verify_at(&token, &alice, now).unwrap();

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.exp, now.timestamp() + 3600);
        assert_eq!(claims.extra.get("tenant"), Some(&json!("blue")));
    }
}
