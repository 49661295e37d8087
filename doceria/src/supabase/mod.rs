//! HTTP client for a Supabase project.
//!
//! Supabase exposes two services this application talks to: GoTrue for
//! authentication (under `/auth/v1`) and PostgREST for table access (under
//! `/rest/v1`). Both are plain HTTP APIs keyed by the project's service role
//! key, so a single [`Supabase`] handle carries the base URL, the key, and a
//! shared connection pool for both.
//!
//! The service role key bypasses row level security. Access policies (such as
//! "users only see their own orders") are enforced by the repositories in
//! [`crate::db`], not by the store.

use std::time::Duration;

use anyhow::Context;
use url::Url;

use crate::config::SupabaseConfig;

pub mod auth;
pub mod postgrest;

pub use auth::{AuthError, AuthUser, Session};
pub use postgrest::{Query, StoreError};

/// Handle to a Supabase project.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Supabase {
    http: reqwest::Client,
    base_url: Url,
    service_role_key: String,
}

impl Supabase {
    /// Build a client from configuration.
    pub fn new(config: &SupabaseConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create Supabase HTTP client")?;

        Ok(Self {
            http,
            base_url: config.url.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    /// Resolve a path relative to the project base URL.
    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}
