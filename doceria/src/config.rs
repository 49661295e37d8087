//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `DOCERIA_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `DOCERIA_` override YAML values
//! 3. **SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY** - Special case: override `supabase.url` and
//!    `supabase.service_role_key` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `DOCERIA_SUPABASE__URL=https://myproject.supabase.co` sets the `supabase.url` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use doceria::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DOCERIA_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Shortcut: override `supabase.url` via the SUPABASE_URL environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<Url>,
    /// Shortcut: override `supabase.service_role_key` via SUPABASE_SERVICE_ROLE_KEY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase_service_role_key: Option<String>,
    /// Supabase project connection settings
    pub supabase: SupabaseConfig,
    /// CORS configuration for browser clients
    pub cors: CorsConfig,
}

/// Supabase project connection settings.
///
/// One project provides both collaborators: the identity provider (GoTrue, under
/// `/auth/v1`) and the relational store (PostgREST, under `/rest/v1`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Project base URL (e.g., "https://myproject.supabase.co")
    pub url: Url,
    /// Service role key, used as the `apikey` on every request.
    /// Keep this out of config files in production; set SUPABASE_SERVICE_ROLE_KEY instead.
    pub service_role_key: String,
    /// Per-request timeout for calls to the project (seconds)
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            // Supabase CLI local stack default
            url: Url::parse("http://127.0.0.1:54321").unwrap(),
            service_role_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentials (cookies) in CORS requests
    pub allow_credentials: bool,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: Some(3600), // Cache preflight for 1 hour
        }
    }
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            supabase_url: None,
            supabase_service_role_key: None,
            supabase: SupabaseConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY take precedence over the nested section
        if let Some(url) = config.supabase_url.take() {
            config.supabase.url = url;
        }
        if let Some(key) = config.supabase_service_role_key.take() {
            config.supabase.service_role_key = key;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("DOCERIA_").split("__"))
            // Common SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY patterns
            .merge(Env::raw().only(&["SUPABASE_URL", "SUPABASE_SERVICE_ROLE_KEY"]))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.supabase.service_role_key.is_empty() {
            return Err(Error::Internal {
                message: "Config validation: supabase.service_role_key is not configured. \
                     Please set the SUPABASE_SERVICE_ROLE_KEY environment variable or add it to the config file."
                    .to_string(),
            });
        }

        if self.supabase.timeout_secs == 0 {
            return Err(Error::Internal {
                message: "Config validation: supabase.timeout_secs cannot be 0. Set a positive number of seconds.".to_string(),
            });
        }

        // Validate CORS configuration
        if self.cors.allowed_origins.is_empty() {
            return Err(Error::Internal {
                message: "Config validation: CORS allowed_origins cannot be empty. Add at least one allowed origin.".to_string(),
            });
        }

        // Validate that wildcard is not used with credentials
        let has_wildcard = self
            .cors
            .allowed_origins
            .iter()
            .any(|origin| matches!(origin, CorsOrigin::Wildcard));
        if has_wildcard && self.cors.allow_credentials {
            return Err(Error::Internal {
                message: "Config validation: CORS cannot use wildcard origin '*' with allow_credentials=true. Specify explicit origins."
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
