//! Row structures and write payloads for the Supabase tables.
//!
//! Each row struct mirrors one table as PostgREST serves it. Write payloads
//! are separate structs because the wire shape matters: a key that is absent,
//! a key that is `null`, and a key with a value are three different things to
//! PostgREST, and the payload structs pin down which fields are allowed to be
//! dropped (`skip_serializing_if`) and which must always travel.
//!
//! # Model Categories
//!
//! - [`users`]: profile rows joined onto GoTrue accounts
//! - [`products`]: catalog rows plus insert/update payloads
//! - [`orders`]: order and line item rows, the embedded read shape, and the
//!   two-step insert payloads
//!
//! These are storage models. The Portuguese-keyed API contract lives in
//! [`crate::api::models`] and converts from these.

pub mod orders;
pub mod products;
pub mod users;
