//! Wire-format request and response models.
//!
//! The JSON field names here are the Portuguese ones the frontend speaks
//! (`cliente`, `preco`, `nomeAbreviado`); the store rows they are built from
//! keep snake_case English column names. All conversions between the two
//! shapes live next to the models, so handlers only move data.

pub mod auth;
pub mod orders;
pub mod products;
