//! Repository for orders and their line items.
//!
//! Orders are private to the user that created them. The scoping lives in
//! [`Orders::owned_by`] and every user-facing read goes through it; the only
//! unscoped operations are the ones that run after ownership is already
//! settled (the post-insert read-back and the delete that follows an
//! ownership probe).

use tracing::instrument;

use crate::db::models::orders::{OrderInsert, OrderItemInsert, OrderRef, OrderRow, OrderWithItems};
use crate::supabase::postgrest::Query;
use crate::supabase::{StoreError, Supabase};
use crate::types::{OrderId, UserId, abbrev_uuid};

const WITH_ITEMS: &str = "*, order_items(*)";

pub struct Orders<'a> {
    sb: &'a Supabase,
}

impl<'a> Orders<'a> {
    pub fn new(sb: &'a Supabase) -> Self {
        Self { sb }
    }

    /// Restrict a query to rows owned by `user_id`.
    fn owned_by<'q>(query: Query<'q>, user_id: UserId) -> Query<'q> {
        query.eq("created_by", user_id)
    }

    /// Orders owned by `user_id`, newest first, items embedded.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderWithItems>, StoreError> {
        Self::owned_by(self.sb.table("orders").select(WITH_ITEMS), user_id)
            .order("created_at", false)
            .fetch()
            .await
    }

    /// One order owned by `user_id`, `None` when it does not exist or belongs
    /// to someone else. The two cases are indistinguishable on purpose.
    #[instrument(skip(self), fields(order_id = %abbrev_uuid(&id)), err)]
    pub async fn get_for_user(&self, id: OrderId, user_id: UserId) -> Result<Option<OrderWithItems>, StoreError> {
        Self::owned_by(self.sb.table("orders").select(WITH_ITEMS), user_id)
            .eq("id", id)
            .fetch_one()
            .await
    }

    /// Ownership probe ahead of a destructive operation. Reads only the id
    /// and owner columns.
    #[instrument(skip(self), fields(order_id = %abbrev_uuid(&id)), err)]
    pub async fn reference_for_user(&self, id: OrderId, user_id: UserId) -> Result<Option<OrderRef>, StoreError> {
        Self::owned_by(self.sb.table("orders").select("id, created_by"), user_id)
            .eq("id", id)
            .fetch_one()
            .await
    }

    /// Unscoped read by id, items embedded. Used to hand a freshly created
    /// order back to its creator.
    #[instrument(skip(self), fields(order_id = %abbrev_uuid(&id)), err)]
    pub async fn get_with_items(&self, id: OrderId) -> Result<Option<OrderWithItems>, StoreError> {
        self.sb
            .table("orders")
            .select(WITH_ITEMS)
            .eq("id", id)
            .fetch_one()
            .await
    }

    #[instrument(skip(self, order), fields(customer = %order.customer_name), err)]
    pub async fn insert(&self, order: &OrderInsert) -> Result<OrderRow, StoreError> {
        self.sb.table("orders").insert_one(order).await
    }

    #[instrument(skip(self, items), fields(count = items.len()), err)]
    pub async fn insert_items(&self, items: &[OrderItemInsert]) -> Result<(), StoreError> {
        self.sb.table("order_items").insert_many(items).await
    }

    /// Delete by id alone. Callers establish ownership first via
    /// [`Orders::reference_for_user`].
    #[instrument(skip(self), fields(order_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        self.sb.table("orders").eq("id", id).delete().await
    }
}
