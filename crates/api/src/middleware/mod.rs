//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the signed-in identity from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but an absent token means "signed out".
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
