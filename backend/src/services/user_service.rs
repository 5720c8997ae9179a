//! User business logic service.
//!
//! Handles registration rules and password checks, and adapts the user table
//! to the authentication pipeline's `IdentityLookup` contract.

use crate::auth::identity::{Identity, IdentityLookup};
use crate::auth::models::RegisterRequest;
use crate::database::models::{CreateUser, Role, User};
use crate::errors::{LookupError, ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use validator::Validate;

// Tests hash with the minimum cost to stay fast.
const PASSWORD_HASH_COST: u32 = if cfg!(test) { 4 } else { DEFAULT_COST };

const BAD_CREDENTIALS: &str = "Invalid email or password";

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers a new user with the `USER` role.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures
    /// - An email that is already registered
    pub async fn create_user(&self, request: RegisterRequest) -> ServiceResult<User> {
        let request = request.trimmed();
        request
            .validate()
            .map_err(|e| ServiceError::validation(validation_message(&e)))?;

        let email = normalize_email(&request.email);
        let repo = UserRepository::new(self.pool);

        if repo.email_exists(&email).await? {
            return Err(ServiceError::already_exists("User", email));
        }

        let password_hash = Self::hash_password(&request.password)?;

        let data = CreateUser {
            id: uuid::Uuid::now_v7().to_string(),
            first_name: request.firstname,
            last_name: request.lastname,
            email: email.clone(),
            password_hash,
            role: Role::User,
        };

        // A concurrent registration can win the race past `email_exists`.
        let user = repo
            .create_user(data)
            .await
            .map_err(|e| insert_error(e, &email))?;
        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Checks an email/password pair.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn authenticate_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| ServiceError::unauthorized(BAD_CREDENTIALS))?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(ServiceError::unauthorized(BAD_CREDENTIALS));
        }

        Ok(user)
    }

    /// Function to hash a password before storing in database
    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, PASSWORD_HASH_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn insert_error(error: anyhow::Error, email: &str) -> ServiceError {
    match error.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            ServiceError::already_exists("User", email)
        }
        _ => ServiceError::from(error),
    }
}

/// Flattens validator errors into `field: message, ...`.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

/// Identity lookup backed by the users table.
#[derive(Clone)]
pub struct UserIdentityLookup {
    pool: SqlitePool,
}

impl UserIdentityLookup {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityLookup for UserIdentityLookup {
    async fn load_identity_by_subject(
        &self,
        subject: &str,
    ) -> Result<Box<dyn Identity>, LookupError> {
        UserRepository::new(&self.pool)
            .get_user_by_email(subject)
            .await?
            .map(|user| Box::new(user) as Box<dyn Identity>)
            .ok_or(LookupError::NotFound)
    }
}
