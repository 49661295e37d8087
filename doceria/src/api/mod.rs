//! HTTP surface: request/response models and endpoint handlers.
//!
//! Extraction failures are funneled through [`crate::errors::Error`] so that
//! malformed JSON bodies and non-UUID path ids render the same `{"error": ...}`
//! shape the handlers produce, instead of axum's plain-text rejections.

use crate::errors::Error;
use axum::extract::{FromRequest, FromRequestParts};

pub mod handlers;
pub mod models;

/// JSON body extractor with the service's rejection shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// Path extractor with the service's rejection shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct AppPath<T>(pub T);
