//! # doceria: Order Management Backend for a Confectionery
//!
//! `doceria` is the HTTP backend behind a confectionery's order management
//! frontend. It exposes a small JSON API for authentication, customer orders,
//! and the product catalog, with a Supabase project supplying both the
//! identity provider (GoTrue) and the relational store (PostgREST).
//!
//! ## Overview
//!
//! The frontend is a thin client: it renders exactly what this API returns,
//! including error messages, which is why every user-facing message here is
//! in Portuguese. The API keeps the frontend's field names on the wire
//! (`nome`, `preco`, `cliente`) while the store uses snake_case English
//! columns; the [`api::models`] layer translates between the two.
//!
//! Orders are private to the user that created them. The product catalog is
//! shared between all authenticated users.
//!
//! ### Request Flow
//!
//! A request carries the Supabase access token issued at login. The
//! [`auth::CurrentUser`] extractor resolves it to a user id by asking GoTrue,
//! the handler validates the body and calls a repository in [`db`], and the
//! repository talks to PostgREST through the [`supabase`] client using the
//! service role key. Row scoping (such as "users only see their own orders")
//! lives in the repositories, not in the store.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use doceria::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = doceria::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize telemetry (structured logging)
//!     doceria::telemetry::init_telemetry()?;
//!
//!     // Create and start the application
//!     let app = Application::new(config)?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod supabase;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::{Router, http};
use bon::Builder;
pub use config::Config;
use tokio::net::TcpListener;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::CorsOrigin;
use crate::errors::Error;
use crate::openapi::ApiDoc;
use crate::supabase::Supabase;

pub use types::{OrderId, ProductId, UserId};

/// Application state shared across all request handlers.
///
/// Everything in here is cheap to clone: the Supabase handle shares one
/// connection pool underneath.
#[derive(Clone, Builder)]
pub struct AppState {
    pub supabase: Supabase,
    pub config: Config,
}

/// Create CORS layer from configuration.
///
/// A wildcard origin turns into a mirror-any policy without credentials;
/// explicit origins are compared against the `Origin` header as sent by
/// browsers, so the trailing slash `Url` carries is dropped.
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let settings = &config.cors;
    let wildcard = settings
        .allowed_origins
        .iter()
        .any(|origin| matches!(origin, CorsOrigin::Wildcard));

    let mut layer = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
        ])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE]);

    if wildcard {
        layer = layer.allow_origin(cors::Any);
    } else {
        let mut origins = Vec::new();
        for origin in &settings.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        layer = layer
            .allow_origin(origins)
            .allow_credentials(settings.allow_credentials);
    }

    if let Some(max_age) = settings.max_age {
        layer = layer.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(layer)
}

/// A known path hit with the wrong method.
async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

/// A path the router does not know.
async fn unknown_route() -> Error {
    Error::NotFound {
        message: "Recurso não encontrado".to_string(),
    }
}

/// Build the application router with all endpoints and middleware.
///
/// Each known path carries a method fallback so that, say, a `GET` against
/// `/auth/login` answers a JSON 405 instead of an empty response; unknown
/// paths answer a JSON 404. The API reference is served at `/docs`.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let api_routes = Router::new()
        .route(
            "/auth/login",
            post(api::handlers::auth::login).fallback(method_not_allowed),
        )
        .route(
            "/auth/logout",
            post(api::handlers::auth::logout).fallback(method_not_allowed),
        )
        .route(
            "/auth/session",
            get(api::handlers::auth::session).fallback(method_not_allowed),
        )
        .route(
            "/orders",
            get(api::handlers::orders::list_orders)
                .post(api::handlers::orders::create_order)
                .fallback(method_not_allowed),
        )
        .route(
            "/orders/{id}",
            get(api::handlers::orders::get_order)
                .delete(api::handlers::orders::delete_order)
                .fallback(method_not_allowed),
        )
        .route(
            "/products",
            get(api::handlers::products::list_products)
                .post(api::handlers::products::create_product)
                .fallback(method_not_allowed),
        )
        .route(
            "/products/{id}",
            put(api::handlers::products::update_product)
                .delete(api::handlers::products::delete_product)
                .fallback(method_not_allowed),
        )
        .with_state(state);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback(unknown_route)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns the router and serving lifecycle.
///
/// 1. **Create**: [`Application::new`] builds the Supabase client and router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles requests
///    until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting doceria with configuration: {:#?}", config);

        let supabase = Supabase::new(&config.supabase)?;
        let state = AppState::builder()
            .supabase(supabase)
            .config(config.clone())
            .build();
        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Doceria backend listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
