//! OpenAPI documentation for the HTTP API.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Bearer token security scheme, fed by the access token from `/auth/login`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer_auth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Supabase access token, obtained from `POST /auth/login`:\n\n\
                            ```\nAuthorization: Bearer ACCESS_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::session,
        api::handlers::orders::list_orders,
        api::handlers::orders::create_order,
        api::handlers::orders::get_order,
        api::handlers::orders::delete_order,
        api::handlers::products::list_products,
        api::handlers::products::create_product,
        api::handlers::products::update_product,
        api::handlers::products::delete_product,
    ),
    components(
        schemas(
            api::models::auth::LoginRequest,
            api::models::auth::LoginResponse,
            api::models::auth::SessionResponse,
            api::models::auth::SessionInfo,
            api::models::auth::UserProfile,
            api::models::auth::MessageResponse,
            api::models::orders::OrderCreate,
            api::models::orders::OrderItemCreate,
            api::models::orders::OrderResponse,
            api::models::orders::OrderItemResponse,
            api::models::products::ProductPayload,
            api::models::products::ProductResponse,
        )
    ),
    tags(
        (name = "auth", description = "Login, logout, and session inspection against the Supabase identity provider."),
        (name = "orders", description = "Customer orders with embedded line items. Every order is private to the user that created it."),
        (name = "products", description = "The shared product catalog: cakes, sweets, and savory snacks."),
    ),
    info(
        title = "Doceria API",
        description = "Order and product management backend for a confectionery, backed by Supabase.

## Authentication

Every endpoint except `POST /auth/login` expects the access token issued at login:

```
Authorization: Bearer ACCESS_TOKEN
```

## Errors

Errors are returned as `{\"error\": \"<message>\"}`. Messages are in Portuguese and the
frontend shows them verbatim.",
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    // Test: every route the router serves is in the document.
    #[test]
    fn document_covers_every_route() {
        let doc = ApiDoc::openapi();
        let documented: Vec<&String> = doc.paths.paths.keys().collect();
        for route in [
            "/auth/login",
            "/auth/logout",
            "/auth/session",
            "/orders",
            "/orders/{id}",
            "/products",
            "/products/{id}",
        ] {
            assert!(
                documented.iter().any(|path| *path == route),
                "route {route} is not documented"
            );
        }
    }

    // Test: the bearer scheme the operations reference actually exists.
    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
