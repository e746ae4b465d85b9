//! # Database backend contracts
//!
//! Backends that want to serve the drinks menu implement the traits in this module. The only backend shipped with
//! the engine is SQLite ([`crate::SqliteDatabase`]), but the server is written against the traits, which also makes
//! it easy to swap in mocks for testing.
//!
//! * [`DrinkManagement`] provides the CRUD operations over the `drinks` table.
mod drink_management;

pub use drink_management::{DrinkApiError, DrinkManagement};
