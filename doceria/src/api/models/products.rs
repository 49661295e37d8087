//! API request/response models for the product catalog.

use crate::db::models::products::{ProductInsert, ProductPatch, ProductRow};
use crate::types::ProductId;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest product name served as-is on receipt-width displays.
const ABBREVIATION_LIMIT: usize = 15;

/// Product as the frontend sees it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ProductId,
    pub nome: String,
    pub nome_abreviado: Option<String>,
    pub preco: f64,
    pub descricao: Option<String>,
    pub categoria: Option<String>,
    pub tipo_salgado: Option<String>,
}

/// Body shared by product create and update.
///
/// Everything is optional on the wire; the handlers reject payloads without a
/// name and a non-negative price, and the conversions below fill the defaults
/// for the rest.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub nome: Option<String>,
    pub nome_abreviado: Option<String>,
    pub preco: Option<f64>,
    pub descricao: Option<String>,
    pub categoria: Option<String>,
    pub tipo_salgado: Option<String>,
}

impl ProductPayload {
    /// A payload is writable when `nome` is present and non-empty and `preco`
    /// is present and non-negative.
    pub fn has_valid_required_fields(&self) -> bool {
        let nome_ok = self.nome.as_deref().is_some_and(|nome| !nome.is_empty());
        let preco_ok = self.preco.is_some_and(|preco| preco >= 0.0);
        nome_ok && preco_ok
    }

    /// Insert row for a create. Missing description becomes empty, missing
    /// category falls back to `Diversos`, a blank abbreviation is derived from
    /// the name, and a blank snack type is stored as null.
    pub fn into_insert(self) -> ProductInsert {
        let name = self.nome.unwrap_or_default();
        let abbreviated_name = match self.nome_abreviado {
            Some(provided) if !provided.trim().is_empty() => provided,
            _ => abbreviate_name(&name),
        };

        ProductInsert {
            abbreviated_name,
            price: self.preco.unwrap_or_default(),
            description: self.descricao.unwrap_or_default(),
            category: category_or_default(self.categoria),
            snack_type: self.tipo_salgado.filter(|tipo| !tipo.is_empty()),
            name,
        }
    }

    /// Update row for an existing product. Unlike create, a blank abbreviation
    /// leaves the stored one untouched instead of deriving a new one.
    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            name: self.nome.unwrap_or_default(),
            price: self.preco.unwrap_or_default(),
            description: self.descricao.unwrap_or_default(),
            category: category_or_default(self.categoria),
            snack_type: self.tipo_salgado.filter(|tipo| !tipo.is_empty()),
            abbreviated_name: self
                .nome_abreviado
                .filter(|nome| !nome.trim().is_empty()),
        }
    }
}

/// Shortens a product name for receipt-width displays: names longer than the
/// limit are cut at the limit and marked with an ellipsis.
fn abbreviate_name(name: &str) -> String {
    if name.chars().count() > ABBREVIATION_LIMIT {
        let prefix: String = name.chars().take(ABBREVIATION_LIMIT).collect();
        format!("{prefix}...")
    } else {
        name.to_string()
    }
}

fn category_or_default(category: Option<String>) -> String {
    category
        .filter(|categoria| !categoria.is_empty())
        .unwrap_or_else(|| "Diversos".to_string())
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            nome: row.name,
            nome_abreviado: row.abbreviated_name,
            preco: row.price.to_f64().unwrap_or_default(),
            descricao: row.description,
            categoria: row.category,
            tipo_salgado: row.snack_type,
        }
    }
}
