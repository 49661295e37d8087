use crate::supabase::postgrest::StoreError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided, or the token was rejected
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found (or not owned by the caller)
    #[error("{message}")]
    NotFound { message: String },

    /// HTTP method not supported on this path
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Internal failure with a caller-facing operation message
    #[error("{message}")]
    Internal { message: String },

    /// Relational store failure, carrying the typed source for logs
    #[error("{message}")]
    Store {
        message: String,
        #[source]
        source: StoreError,
    },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Adapter for `map_err`: wraps a store failure with the operation's
    /// caller-facing message, keeping the typed source for the logs.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Error::Store {
            message: message.to_string(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message
                .clone()
                .unwrap_or_else(|| "Token de acesso não fornecido".to_string()),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { message } => message.clone(),
            Error::MethodNotAllowed => "Método não permitido".to_string(),
            Error::Internal { message } => message.clone(),
            Error::Store { message, .. } => message.clone(),
            Error::Other(_) => "Erro interno do servidor".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Store { source, .. } => {
                tracing::error!("Internal service error: {self}: {source}");
            }
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Unauthenticated { .. } => {
                tracing::info!("Authentication error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::MethodNotAllowed => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({ "error": self.user_message() });

        (status, axum::response::Json(body)).into_response()
    }
}

/// Malformed or non-JSON request bodies surface as a validation error
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Request body rejected: {rejection}");
        Error::BadRequest {
            message: "Corpo da requisição inválido".to_string(),
        }
    }
}

/// Path parameters that fail to parse (non-UUID ids) surface as a validation error
impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Path parameter rejected: {rejection}");
        Error::BadRequest {
            message: "ID inválido".to_string(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
