//! HTTP handlers for the order endpoints.
//!
//! Orders are private: every read is scoped to the caller and a delete only
//! proceeds after an ownership probe. Creation writes the head row and the
//! line items as two store calls; when the second fails the head is removed
//! again so no itemless order survives.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    AppState,
    api::models::auth::MessageResponse,
    api::models::orders::{OrderCreate, OrderResponse},
    api::{AppJson, AppPath},
    auth::CurrentUser,
    db::handlers::Orders,
    errors::{Error, Result},
    types::abbrev_uuid,
};

/// List the caller's orders, newest first
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<OrderResponse>>> {
    let rows = Orders::new(&state.supabase)
        .list_for_user(user.id)
        .await
        .map_err(Error::store("Erro ao buscar pedidos"))?;

    Ok(Json(rows.into_iter().map(OrderResponse::from).collect()))
}

/// Fetch one of the caller's orders
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, format = "uuid", description = "Order id")),
    responses(
        (status = 200, description = "The order with its items", body = OrderResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such order among the caller's"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_order(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<OrderResponse>> {
    let row = Orders::new(&state.supabase)
        .get_for_user(id, user.id)
        .await
        .map_err(Error::store("Erro ao buscar pedido"))?
        .ok_or_else(order_not_found)?;

    Ok(Json(OrderResponse::from(row)))
}

/// Create an order with its line items
#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = OrderCreate,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Missing customer or items"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(body): AppJson<OrderCreate>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    if !body.has_valid_required_fields() {
        return Err(Error::BadRequest {
            message: "Cliente e produtos são obrigatórios".to_string(),
        });
    }

    let orders = Orders::new(&state.supabase);
    let order = orders
        .insert(&body.order_insert(user.id))
        .await
        .map_err(Error::store("Erro ao criar pedido"))?;

    let items = body.item_inserts(order.id);
    if let Err(source) = orders.insert_items(&items).await {
        // A head without items must not survive. The removal is best-effort;
        // when it fails too, the item failure is still what the client hears.
        if let Err(err) = orders.delete(order.id).await {
            tracing::warn!(
                order_id = %abbrev_uuid(&order.id),
                error = %err,
                "could not remove order after its items failed to insert"
            );
        }
        return Err(Error::Store {
            message: "Erro ao criar itens do pedido".to_string(),
            source,
        });
    }

    let created = orders
        .get_with_items(order.id)
        .await
        .map_err(Error::store("Erro ao buscar pedido criado"))?
        .ok_or_else(|| Error::Internal {
            message: "Erro ao buscar pedido criado".to_string(),
        })?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(created))))
}

/// Delete one of the caller's orders
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, format = "uuid", description = "Order id")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such order among the caller's"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>> {
    let orders = Orders::new(&state.supabase);
    orders
        .reference_for_user(id, user.id)
        .await
        .map_err(Error::store("Erro ao verificar pedido"))?
        .ok_or_else(order_not_found)?;

    orders
        .delete(id)
        .await
        .map_err(Error::store("Erro ao excluir pedido"))?;

    Ok(Json(MessageResponse::new("Pedido excluído com sucesso")))
}

fn order_not_found() -> Error {
    Error::NotFound {
        message: "Pedido não encontrado".to_string(),
    }
}
