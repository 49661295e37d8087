//! Bearer token authentication against GoTrue.
//!
//! The login endpoint hands out GoTrue access tokens and every protected
//! route expects one back in the `Authorization` header. There is no local
//! session state: each request is validated by asking GoTrue who the token
//! belongs to, so revocation takes effect immediately.
//!
//! Two extractors cover the two levels of trust handlers need:
//!
//! - [`BearerToken`]: the raw token, present but not validated. Logout wants
//!   this; a revoked or expired token should still log out cleanly.
//! - [`CurrentUser`](current_user::CurrentUser): the token resolved to a user
//!   id through GoTrue. Everything that touches data wants this.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::{Error, Result};

pub mod current_user;

pub use current_user::CurrentUser;

/// Pull the token out of a `Bearer` authorization header.
///
/// Anything other than the exact `Bearer ` prefix (missing header, another
/// scheme, not valid UTF-8) is treated as no token at all.
pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The raw bearer token from the request, without validation.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        match bearer_token(parts) {
            Some(token) => Ok(Self(token.to_string())),
            None => Err(Error::Unauthenticated { message: None }),
        }
    }
}
