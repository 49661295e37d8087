//! HTTP handlers for the doceria API.
//!
//! Handlers validate the payload, call the repositories, and map outcomes to
//! the catalogued Portuguese messages the frontend displays verbatim. Store
//! and provider failures never pass through; they are logged and replaced
//! with the operation's generic message.

pub mod auth;
pub mod orders;
pub mod products;
