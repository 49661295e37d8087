//! Data access layer over the Supabase tables.
//!
//! Persistence lives in a hosted Supabase project and is reached over HTTP
//! through [`crate::supabase`]. This module keeps the same two-level split a
//! SQL-backed service would have:
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - access policy & queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - table rows & write payloads)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgREST  │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations per table
//! - [`models`]: Row structures and insert/update payloads
//!
//! Because every request runs with the service role key, row level security is
//! bypassed and access policy is the repositories' responsibility. The order
//! repository in particular scopes every user-facing read to the owning user.
//!
//! ## Example Usage
//!
//! ```ignore
//! use doceria::db::handlers::Orders;
//!
//! async fn example(sb: &doceria::supabase::Supabase, user_id: uuid::Uuid) {
//!     let orders = Orders::new(sb);
//!     let mine = orders.list_for_user(user_id).await.unwrap();
//!     println!("{} orders", mine.len());
//! }
//! ```

pub mod handlers;
pub mod models;
