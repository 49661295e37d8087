//! HTTP handlers for the product catalog endpoints.
//!
//! The catalog is shared: any authenticated user may read and write it, so
//! unlike orders there is no ownership scoping here.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    AppState,
    api::models::auth::MessageResponse,
    api::models::products::{ProductPayload, ProductResponse},
    api::{AppJson, AppPath},
    auth::CurrentUser,
    db::handlers::Products,
    errors::{Error, Result},
};

/// List the catalog, ordered by name
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<ProductResponse>>> {
    let rows = Products::new(&state.supabase)
        .list()
        .await
        .map_err(Error::store("Erro ao buscar produtos"))?;

    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

/// Add a product to the catalog
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Missing name or invalid price"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    AppJson(body): AppJson<ProductPayload>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    if !body.has_valid_required_fields() {
        return Err(invalid_product());
    }

    let row = Products::new(&state.supabase)
        .create(&body.into_insert())
        .await
        .map_err(Error::store("Erro ao criar produto"))?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(row))))
}

/// Overwrite a product's editable fields
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, format = "uuid", description = "Product id")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Missing name or invalid price"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No product with this id"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<ProductPayload>,
) -> Result<Json<ProductResponse>> {
    if !body.has_valid_required_fields() {
        return Err(invalid_product());
    }

    let row = Products::new(&state.supabase)
        .update(id, &body.into_patch())
        .await
        .map_err(Error::store("Erro ao atualizar produto"))?
        .ok_or_else(product_not_found)?;

    Ok(Json(ProductResponse::from(row)))
}

/// Remove a product from the catalog
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, format = "uuid", description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No product with this id"),
        (status = 500, description = "Store failure"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>> {
    Products::new(&state.supabase)
        .delete(id)
        .await
        .map_err(Error::store("Erro ao excluir produto"))?
        .ok_or_else(product_not_found)?;

    Ok(Json(MessageResponse::new("Produto excluído com sucesso")))
}

fn invalid_product() -> Error {
    Error::BadRequest {
        message: "Nome e preço válido são obrigatórios".to_string(),
    }
}

fn product_not_found() -> Error {
    Error::NotFound {
        message: "Produto não encontrado".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ACCESS_TOKEN, USER_ID, mount_user_resolution, test_state};
    use axum::{
        Router,
        routing::{get, put},
    };
    use axum_test::TestServer;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRODUCT_ID: &str = "5f8b1c40-9d0a-4f7e-8f25-9f4a3b2c1d0e";

    async fn product_app(server: &MockServer) -> TestServer {
        mount_user_resolution(server, USER_ID).await;
        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/{id}",
                put(update_product).delete(delete_product),
            )
            .with_state(test_state(&server.uri()));
        TestServer::new(app).unwrap()
    }

    fn stored_row() -> serde_json::Value {
        json!({
            "id": PRODUCT_ID,
            "name": "Bolo de Chocolate",
            "abbreviated_name": "Bolo de Chocola...",
            "price": 45.9,
            "description": "",
            "category": "Diversos",
            "snack_type": null
        })
    }

    // Test: listing requires a token and maps rows to the frontend shape.
    #[test_log::test(tokio::test)]
    async fn list_maps_rows_to_frontend_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("order", "name.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored_row()])))
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        let response = app
            .get("/products")
            .authorization_bearer(ACCESS_TOKEN)
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body[0]["nome"], json!("Bolo de Chocolate"));
        assert_eq!(body[0]["nomeAbreviado"], json!("Bolo de Chocola..."));
        assert_eq!(body[0]["preco"], json!(45.9));
    }

    // Test: without a token the store is never consulted.
    #[test_log::test(tokio::test)]
    async fn list_requires_a_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        let response = app.get("/products").await;

        response.assert_status_unauthorized();
    }

    // Test: create derives the abbreviation and defaults before writing, and
    // answers 201 with the stored row.
    #[test_log::test(tokio::test)]
    async fn create_writes_derived_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/products"))
            .and(body_json(json!({
                "name": "Bolo de Chocolate",
                "abbreviated_name": "Bolo de Chocola...",
                "price": 45.9,
                "description": "",
                "category": "Diversos",
                "snack_type": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(stored_row()))
            .expect(1)
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        let response = app
            .post("/products")
            .authorization_bearer(ACCESS_TOKEN)
            .json(&json!({ "nome": "Bolo de Chocolate", "preco": 45.9 }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let body: ProductResponse = response.json();
        assert_eq!(body.nome, "Bolo de Chocolate");
        assert_eq!(body.preco, 45.9);
    }

    // Test: invalid payloads fail before any store call.
    #[test_log::test(tokio::test)]
    async fn create_validates_name_and_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        for body in [
            json!({ "preco": 8.5 }),
            json!({ "nome": "", "preco": 8.5 }),
            json!({ "nome": "Coxinha" }),
            json!({ "nome": "Coxinha", "preco": -1.0 }),
        ] {
            let response = app
                .post("/products")
                .authorization_bearer(ACCESS_TOKEN)
                .json(&body)
                .await;
            response.assert_status_bad_request();
            let error: serde_json::Value = response.json();
            assert_eq!(
                error,
                json!({ "error": "Nome e preço válido são obrigatórios" })
            );
        }
    }

    // Test: update patches by id and leaves the abbreviation untouched when
    // none came in.
    #[test_log::test(tokio::test)]
    async fn update_omits_unsupplied_abbreviation() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/products"))
            .and(query_param("id", format!("eq.{PRODUCT_ID}")))
            .and(body_json(json!({
                "name": "Bolo de Chocolate",
                "price": 49.9,
                "description": "",
                "category": "Diversos",
                "snack_type": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_row()))
            .expect(1)
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        let response = app
            .put(&format!("/products/{PRODUCT_ID}"))
            .authorization_bearer(ACCESS_TOKEN)
            .json(&json!({ "nome": "Bolo de Chocolate", "preco": 49.9 }))
            .await;

        response.assert_status_ok();
    }

    // Test: updating an id the store has no row for is a 404.
    #[test_log::test(tokio::test)]
    async fn update_unknown_id_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(406).set_body_json(json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned"
            })))
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        let response = app
            .put(&format!("/products/{PRODUCT_ID}"))
            .authorization_bearer(ACCESS_TOKEN)
            .json(&json!({ "nome": "Coxinha", "preco": 8.5 }))
            .await;

        response.assert_status_not_found();
        let error: serde_json::Value = response.json();
        assert_eq!(error, json!({ "error": "Produto não encontrado" }));
    }

    // Test: a non-UUID id in the path is a validation error, not a 404.
    #[test_log::test(tokio::test)]
    async fn update_rejects_malformed_ids() {
        let server = MockServer::start().await;
        let app = product_app(&server).await;

        let response = app
            .put("/products/not-a-uuid")
            .authorization_bearer(ACCESS_TOKEN)
            .json(&json!({ "nome": "Coxinha", "preco": 8.5 }))
            .await;

        response.assert_status_bad_request();
        let error: serde_json::Value = response.json();
        assert_eq!(error, json!({ "error": "ID inválido" }));
    }

    // Test: delete acknowledges with the catalogued message when a row went
    // away, and 404s when none did.
    #[test_log::test(tokio::test)]
    async fn delete_acknowledges_or_reports_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/products"))
            .and(query_param("id", format!("eq.{PRODUCT_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(stored_row()))
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        let response = app
            .delete(&format!("/products/{PRODUCT_ID}"))
            .authorization_bearer(ACCESS_TOKEN)
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body, json!({ "message": "Produto excluído com sucesso" }));

        server.reset().await;
        mount_user_resolution(&server, USER_ID).await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(406).set_body_json(json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned"
            })))
            .mount(&server)
            .await;

        let response = app
            .delete(&format!("/products/{PRODUCT_ID}"))
            .authorization_bearer(ACCESS_TOKEN)
            .await;

        response.assert_status_not_found();
    }

    // Test: a store failure surfaces as the operation's generic message.
    #[test_log::test(tokio::test)]
    async fn list_store_failure_is_a_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "code": "XX000",
                "message": "internal error"
            })))
            .mount(&server)
            .await;

        let app = product_app(&server).await;
        let response = app
            .get("/products")
            .authorization_bearer(ACCESS_TOKEN)
            .await;

        response.assert_status_internal_server_error();
        let error: serde_json::Value = response.json();
        assert_eq!(error, json!({ "error": "Erro ao buscar produtos" }));
    }
}
