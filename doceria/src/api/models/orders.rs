//! API request/response models for orders.
//!
//! Besides the field renames, the response carries a derived `descricao`: a
//! human-readable receipt block with one `"{qty}x {name} - R$ {unit} = R$
//! {total}"` line per item, which the frontend prints as-is.

use crate::db::models::orders::{OrderInsert, OrderItemInsert, OrderItemRow, OrderWithItems};
use crate::types::{OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order as the frontend sees it, items embedded and receipt text derived.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: OrderId,
    pub numero: i64,
    pub cliente: String,
    pub horario: Option<String>,
    pub valor: Option<f64>,
    pub deposito: f64,
    pub produtos: Vec<OrderItemResponse>,
    pub descricao: String,
    pub observacoes: Option<String>,
    pub status: Option<String>,
}

/// One line item inside an [`OrderResponse`]. `id` is the product reference,
/// null for custom items.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    #[schema(value_type = Option<String>, format = "uuid")]
    pub id: Option<ProductId>,
    pub nome: Option<String>,
    pub quantidade: Option<f64>,
    pub preco: Option<f64>,
    pub total: Option<f64>,
    pub descricao_bolo: Option<String>,
    pub nome_personalizado: Option<String>,
}

/// Body for order creation.
///
/// Everything is optional on the wire; the handler rejects payloads without a
/// customer name and at least one item before any write happens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderCreate {
    pub cliente: Option<String>,
    pub horario: Option<String>,
    pub valor: Option<f64>,
    pub deposito: Option<f64>,
    pub produtos: Option<Vec<OrderItemCreate>>,
    pub observacoes: Option<String>,
}

/// One requested item inside an [`OrderCreate`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemCreate {
    /// Product reference. Custom items send this empty or not at all.
    pub id: Option<String>,
    pub nome: Option<String>,
    pub quantidade: Option<f64>,
    pub preco: Option<f64>,
    pub total: Option<f64>,
    pub descricao_bolo: Option<String>,
    pub nome_personalizado: Option<String>,
}

impl OrderCreate {
    /// A creation body is writable when `cliente` is present and non-empty
    /// and `produtos` has at least one item.
    pub fn has_valid_required_fields(&self) -> bool {
        let cliente_ok = self
            .cliente
            .as_deref()
            .is_some_and(|cliente| !cliente.is_empty());
        let produtos_ok = self
            .produtos
            .as_ref()
            .is_some_and(|produtos| !produtos.is_empty());
        cliente_ok && produtos_ok
    }

    /// Insert row for the order head. An absent deposit is stored as zero.
    pub fn order_insert(&self, created_by: UserId) -> OrderInsert {
        OrderInsert {
            customer_name: self.cliente.clone().unwrap_or_default(),
            scheduled_date: self.horario.clone(),
            total_value: self.valor,
            deposit_value: self.deposito.unwrap_or(0.0),
            special_notes: self.observacoes.clone(),
            created_by,
        }
    }

    /// Insert rows for the line items, each tagged with the new order's id.
    pub fn item_inserts(&self, order_id: OrderId) -> Vec<OrderItemInsert> {
        self.produtos
            .iter()
            .flatten()
            .cloned()
            .map(|item| item.into_insert(order_id))
            .collect()
    }
}

impl OrderItemCreate {
    fn into_insert(self, order_id: OrderId) -> OrderItemInsert {
        OrderItemInsert {
            order_id,
            // An empty reference means a custom item; it is written as null.
            product_id: self.id.filter(|id| !id.is_empty()),
            product_name: self.nome,
            quantity: self.quantidade,
            unit_price: self.preco,
            total_price: self.total,
            custom_description: self.nome_personalizado,
            cake_flavor: self.descricao_bolo,
        }
    }
}

impl From<OrderWithItems> for OrderResponse {
    fn from(row: OrderWithItems) -> Self {
        let OrderWithItems { order, order_items } = row;
        let descricao = order_items
            .iter()
            .map(receipt_line)
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            id: order.id,
            numero: order.order_number,
            cliente: order.customer_name,
            horario: order.scheduled_date,
            valor: order.total_value.and_then(|valor| valor.to_f64()),
            deposito: order
                .deposit_value
                .and_then(|deposito| deposito.to_f64())
                .unwrap_or(0.0),
            produtos: order_items.into_iter().map(OrderItemResponse::from).collect(),
            descricao,
            observacoes: order.special_notes,
            status: order.status,
        }
    }
}

impl From<OrderItemRow> for OrderItemResponse {
    fn from(item: OrderItemRow) -> Self {
        Self {
            id: item.product_id,
            nome: item.product_name,
            quantidade: item.quantity.and_then(|quantidade| quantidade.to_f64()),
            preco: item.unit_price.and_then(|preco| preco.to_f64()),
            total: item.total_price.and_then(|total| total.to_f64()),
            descricao_bolo: item.cake_flavor,
            nome_personalizado: item.custom_description,
        }
    }
}

/// Formats one receipt line. Missing numbers render as zero and a missing
/// name as blank, so partial rows still produce a printable block.
fn receipt_line(item: &OrderItemRow) -> String {
    let quantidade = display_or_zero(item.quantity);
    let nome = item.product_name.as_deref().unwrap_or_default();
    let preco = display_or_zero(item.unit_price);
    let total = display_or_zero(item.total_price);

    format!("{quantidade}x {nome} - R$ {preco} = R$ {total}")
}

fn display_or_zero(value: Option<Decimal>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "0".to_string())
}
