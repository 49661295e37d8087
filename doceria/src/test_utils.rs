//! Shared helpers for tests that point the service at a wiremock Supabase.

use crate::config::Config;
use crate::supabase::Supabase;
use crate::AppState;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bearer token the handler tests present; resolves via
/// [`mount_user_resolution`].
pub const ACCESS_TOKEN: &str = "valid-access-token";

/// User id [`ACCESS_TOKEN`] resolves to.
pub const USER_ID: &str = "c56a4180-65aa-42ec-a945-5fd21dec0538";

/// Installs the process-wide rustls crypto provider the HTTP client needs.
///
/// `main.rs` does this at startup; tests build clients without going through
/// `main`, so every test constructor calls this first. Idempotent: repeat
/// installs are ignored.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

pub fn test_config(supabase_url: &str) -> Config {
    install_crypto_provider();
    let mut config = Config::default();
    config.supabase.url = supabase_url.parse().expect("mock server URI");
    config.supabase.service_role_key = "service-key".to_string();
    config.supabase.timeout_secs = 5;
    config
}

pub fn test_state(supabase_url: &str) -> AppState {
    let config = test_config(supabase_url);
    let supabase = Supabase::new(&config.supabase).expect("Supabase client");
    AppState::builder().supabase(supabase).config(config).build()
}

/// Mounts the token-validation call every protected endpoint makes, resolving
/// [`ACCESS_TOKEN`] to the given user id.
pub async fn mount_user_resolution(server: &MockServer, user_id: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": user_id })))
        .mount(server)
        .await;
}
