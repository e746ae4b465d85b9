use thiserror::Error;

use crate::db_types::{Drink, DrinkUpdate, NewDrink};

#[derive(Debug, Clone, Error)]
pub enum DrinkApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A drink with this title already exists. {0}")]
    DuplicateTitle(String),
    #[error("The drink is not valid. {0}")]
    InvalidDrink(String),
    #[error("The update request does not modify any fields")]
    EmptyUpdate,
}

impl From<sqlx::Error> for DrinkApiError {
    fn from(e: sqlx::Error) -> Self {
        match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => Self::DuplicateTitle(db_err.message().to_string()),
            _ => Self::DatabaseError(e.to_string()),
        }
    }
}

/// The `DrinkManagement` trait defines the storage operations for the drinks menu.
///
/// Implementations do not validate their input beyond what the storage layer enforces (e.g. unique titles). Use
/// [`crate::DrinksApi`] rather than calling a backend directly.
#[allow(async_fn_in_trait)]
pub trait DrinkManagement {
    /// Fetches every drink on the menu, ordered by id.
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, DrinkApiError>;

    /// Fetches the drink with the given id. If no such drink exists, `None` is returned.
    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkApiError>;

    /// Stores a new drink and returns it along with its newly assigned id.
    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError>;

    /// Applies a partial update to the drink with the given id and returns the updated record.
    /// Returns `None` if the drink does not exist.
    async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Option<Drink>, DrinkApiError>;

    /// Removes the drink with the given id. Returns `false` if there was nothing to delete.
    async fn delete_drink(&self, id: i64) -> Result<bool, DrinkApiError>;
}
