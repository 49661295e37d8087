//! Database models for the product catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Row from the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub abbreviated_name: Option<String>,
    pub price: Decimal,
    pub description: Option<String>,
    pub category: Option<String>,
    pub snack_type: Option<String>,
}

/// Insert payload for a new product.
///
/// Every column travels explicitly: the handler has already filled the
/// defaults (empty description, `Diversos` category, derived abbreviation),
/// and `snack_type` is written as `null` rather than omitted.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInsert {
    pub name: String,
    pub abbreviated_name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub snack_type: Option<String>,
}

/// Update payload for an existing product.
///
/// Updates are full rewrites of the editable columns, not partial patches.
/// The one exception is `abbreviated_name`, which is only written when the
/// caller supplied one; otherwise the stored value stays untouched.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPatch {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub snack_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviated_name: Option<String>,
}
