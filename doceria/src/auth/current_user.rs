//! Request extractor for the authenticated user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::{debug, instrument};

use crate::AppState;
use crate::auth::bearer_token;
use crate::errors::{Error, Result};
use crate::types::{UserId, abbrev_uuid};

/// The user behind a validated bearer token.
///
/// Extraction asks GoTrue to resolve the token on every request. Any failure
/// there (a revoked or expired token, GoTrue unreachable) rejects the request
/// as unauthenticated rather than leaking the distinction.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(parts) else {
            return Err(Error::Unauthenticated { message: None });
        };

        match state.supabase.get_user(token).await {
            Ok(user) => {
                debug!(user_id = %abbrev_uuid(&user.id), "Authenticated request");
                Ok(Self { id: user.id })
            }
            Err(err) => {
                debug!("Token validation failed: {err}");
                Err(Error::Unauthenticated {
                    message: Some("Token inválido ou expirado".to_string()),
                })
            }
        }
    }
}
