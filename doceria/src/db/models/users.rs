//! Database model for user profiles.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Profile row from the `users` table.
///
/// The row shares its id with the GoTrue account; GoTrue authenticates, this
/// table carries the display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
}
