//! Repository implementations for table access.
//!
//! Each repository wraps a borrowed [`crate::supabase::Supabase`] handle and
//! owns the queries for one table, including whatever access policy that
//! table carries. They return the row models from [`crate::db::models`] and
//! surface store failures as [`crate::supabase::StoreError`], leaving the
//! HTTP status mapping to the API layer.
//!
//! # Available Repositories
//!
//! - [`Users`]: profile lookups for authenticated users
//! - [`Products`]: the shared product catalog
//! - [`Orders`]: orders and line items, scoped to their owner
//!
//! # Common Pattern
//!
//! ```ignore
//! use doceria::db::handlers::Products;
//!
//! async fn example(sb: &doceria::supabase::Supabase) {
//!     let products = Products::new(sb);
//!     let all = products.list().await.unwrap();
//! }
//! ```

pub mod orders;
pub mod products;
pub mod users;

pub use orders::Orders;
pub use products::Products;
pub use users::Users;
