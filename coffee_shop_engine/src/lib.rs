//! Coffee Shop Engine
//!
//! This library holds the storage logic for the coffee shop drinks menu. It is independent of the HTTP layer.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to access
//!    the database directly; use the public API instead. The data types stored in the database are defined in
//!    [`db_types`] and are public.
//! 2. The public API ([`DrinksApi`]). Backends need to implement the traits in [`traits`] in order to serve the menu.
mod db;

pub mod db_types;
mod drinks_api;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{prepare_database, SqliteDatabase};
pub use db::traits;
pub use drinks_api::DrinksApi;
pub use traits::{DrinkApiError, DrinkManagement};
