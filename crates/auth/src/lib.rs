//! `cropsight-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod account;
pub mod claims;
pub mod jwt;
pub mod owner;
pub mod password;

pub use account::{ProfilePatch, UserAccount};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256Jwt, JwtValidator};
pub use owner::{Owned, assert_owner, assert_owns};
pub use password::{PasswordError, hash_password, verify_password};
