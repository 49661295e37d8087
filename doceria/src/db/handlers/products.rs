//! Repository for the product catalog.
//!
//! The catalog is shared across all users, so unlike orders there is no
//! ownership scoping here.

use tracing::instrument;

use crate::db::models::products::{ProductInsert, ProductPatch, ProductRow};
use crate::supabase::{StoreError, Supabase};
use crate::types::{ProductId, abbrev_uuid};

pub struct Products<'a> {
    sb: &'a Supabase,
}

impl<'a> Products<'a> {
    pub fn new(sb: &'a Supabase) -> Self {
        Self { sb }
    }

    /// Every product, alphabetical by name.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> Result<Vec<ProductRow>, StoreError> {
        self.sb
            .table("products")
            .select("*")
            .order("name", true)
            .fetch()
            .await
    }

    #[instrument(skip(self, product), fields(name = %product.name), err)]
    pub async fn create(&self, product: &ProductInsert) -> Result<ProductRow, StoreError> {
        self.sb.table("products").insert_one(product).await
    }

    /// Rewrite a product, `None` when the id does not exist.
    #[instrument(skip(self, patch), fields(product_id = %abbrev_uuid(&id)), err)]
    pub async fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Option<ProductRow>, StoreError> {
        self.sb.table("products").eq("id", id).update_one(patch).await
    }

    /// Remove a product, `None` when the id does not exist.
    #[instrument(skip(self), fields(product_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&self, id: ProductId) -> Result<Option<ProductRow>, StoreError> {
        self.sb.table("products").eq("id", id).delete_one().await
    }
}
