//! Module for the protected demo endpoint.
//!
//! Exists to show the authenticated/anonymous split end to end.

pub mod handlers;
pub mod routes;
