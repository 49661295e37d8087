//! Database models for orders and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{OrderId, ProductId, UserId};

/// Row from the `orders` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    pub order_number: i64,
    pub customer_name: String,
    pub scheduled_date: Option<String>,
    pub total_value: Option<Decimal>,
    pub deposit_value: Option<Decimal>,
    pub special_notes: Option<String>,
    pub status: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// An order with its line items embedded, as PostgREST returns it for
/// `select=*, order_items(*)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: OrderRow,
    #[serde(default)]
    pub order_items: Vec<OrderItemRow>,
}

/// Row from the `order_items` table.
///
/// Nearly everything is nullable. Custom items carry no product reference,
/// and historic rows predate some of the columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub custom_description: Option<String>,
    pub cake_flavor: Option<String>,
}

/// Narrow projection used to establish ownership before a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRef {
    pub id: OrderId,
    pub created_by: UserId,
}

/// Insert payload for the order head row.
///
/// Optional fields are dropped from the payload instead of written as null;
/// the deposit always travels because absent deposits are stored as zero.
#[derive(Debug, Clone, Serialize)]
pub struct OrderInsert {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
    pub deposit_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
    pub created_by: UserId,
}

/// Insert payload for one line item.
///
/// `product_id` is always written, as `null` for custom items. It stays a
/// string on the way in; an unparseable id is the store's to reject, which
/// surfaces through the item-insert failure path.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemInsert {
    pub order_id: OrderId,
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cake_flavor: Option<String>,
}
