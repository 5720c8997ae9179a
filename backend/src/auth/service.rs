//! Registration and login flows: both end by issuing a bearer token.

use crate::auth::models::*;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::user_service::{UserService, validation_message};
use crate::utils::jwt::JwtService;
use serde_json::Map;
use sqlx::SqlitePool;
use validator::Validate;

pub struct AuthService<'a> {
    user_service: UserService<'a>,
    jwt_service: &'a JwtService,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, jwt_service: &'a JwtService) -> Self {
        AuthService {
            user_service: UserService::new(pool),
            jwt_service,
        }
    }

    /// Create the account and hand back a token for it.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthenticationResponse> {
        let user = self.user_service.create_user(request).await?;
        let token = self.jwt_service.issue(&user, Map::new())?;

        Ok(AuthenticationResponse { token })
    }

    /// Verify credentials and issue a fresh token.
    pub async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> ServiceResult<AuthenticationResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(validation_message(&e)))?;

        let user = self
            .user_service
            .authenticate_user(&request.email, &request.password)
            .await?;
        let token = self.jwt_service.issue(&user, Map::new())?;

        tracing::debug!("Issued token for user {}", user.id);
        Ok(AuthenticationResponse { token })
    }
}
