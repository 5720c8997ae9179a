//! Authentication module: bearer-token verification for every request plus
//! the registration and login endpoints that issue those tokens.
//!
//! The request path is `middleware::jwt_authentication` → `filter` →
//! (`utils::jwt`, `identity::IdentityLookup`) → `context::SecurityContext`.

pub mod context;
pub mod filter;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
