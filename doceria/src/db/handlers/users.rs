//! Repository for user profiles.

use tracing::instrument;

use crate::db::models::users::UserRow;
use crate::supabase::{StoreError, Supabase};
use crate::types::{UserId, abbrev_uuid};

pub struct Users<'a> {
    sb: &'a Supabase,
}

impl<'a> Users<'a> {
    pub fn new(sb: &'a Supabase) -> Self {
        Self { sb }
    }

    /// Fetch the profile row for an authenticated user.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<UserRow>, StoreError> {
        self.sb
            .table("users")
            .select("id, email, full_name, role")
            .eq("id", id)
            .fetch_one()
            .await
    }
}
