//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that they differ from the API payloads in
//! `auth::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::identity::Identity;

/// Coarse-grained role carried as the user's single authority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity for User {
    fn subject_id(&self) -> &str {
        &self.email
    }

    fn authorities(&self) -> Vec<String> {
        vec![self.role.to_string()]
    }
}

/// Row data for inserting a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_text() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_identity_uses_email_and_role() {
        let now = Utc::now();
        let user = User {
            id: "id".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(user.subject_id(), "ada@example.com");
        assert_eq!(user.authorities(), vec!["ADMIN".to_string()]);
        assert!(!serde_json::to_string(&user).unwrap().contains("hash"));
    }
}
