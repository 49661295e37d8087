//! API request/response models for authentication.

use crate::db::models::users::UserRow;
use crate::supabase::Session;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credentials for the password sign-in endpoint.
///
/// Both fields are optional on the wire so a missing field and an empty one
/// produce the same validation message instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile block returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

/// Token block handed back on a successful sign-in. The frontend stores it
/// verbatim and replays `access_token` as the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub session: SessionInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: UserProfile,
}

/// Plain acknowledgement body used by logout and the delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: row.role,
        }
    }
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        Self {
            expires_at: session.expires_at(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}
