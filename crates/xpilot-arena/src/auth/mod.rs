//! Bearer-token identity for the arena API.
//!
//! Accounts are provisioned out of band; the server only issues and checks
//! signed access tokens.

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::JwtManager;
