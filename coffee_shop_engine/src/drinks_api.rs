//! # Drinks public API
//!
//! [`DrinksApi`] is the programmatic interface to the drinks menu. It is created by supplying a database backend
//! that implements [`DrinkManagement`](crate::traits::DrinkManagement):
//!
//! ```rust,ignore
//! use coffee_shop_engine::{DrinksApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://drinks.db", 5).await?;
//! let api = DrinksApi::new(db);
//! let menu = api.drinks().await?;
//! ```

use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Drink, DrinkUpdate, NewDrink, Recipe},
    traits::{DrinkApiError, DrinkManagement},
};

/// The `DrinksApi` validates requests against the menu before passing them on to the database backend.
pub struct DrinksApi<B> {
    db: B,
}

impl<B: Debug> Debug for DrinksApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DrinksApi ({:?})", self.db)
    }
}

impl<B> DrinksApi<B>
where B: DrinkManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Fetches the whole menu, ordered by id.
    pub async fn drinks(&self) -> Result<Vec<Drink>, DrinkApiError> {
        self.db.fetch_drinks().await
    }

    pub async fn drink_by_id(&self, id: i64) -> Result<Option<Drink>, DrinkApiError> {
        self.db.fetch_drink(id).await
    }

    /// Adds a new drink to the menu. The title must not be blank and the recipe must contain at least one
    /// ingredient.
    pub async fn create_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError> {
        validate_title(&drink.title)?;
        validate_recipe(&drink.recipe)?;
        let drink = self.db.insert_drink(drink).await?;
        info!("☕️ {drink} was added to the menu");
        Ok(drink)
    }

    /// Applies a partial update to a drink. Returns `None` if the drink does not exist.
    ///
    /// An update that does not set any field is rejected with [`DrinkApiError::EmptyUpdate`].
    pub async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Option<Drink>, DrinkApiError> {
        if update.is_empty() {
            return Err(DrinkApiError::EmptyUpdate);
        }
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(recipe) = &update.recipe {
            validate_recipe(recipe)?;
        }
        self.db.update_drink(id, update).await
    }

    /// Removes a drink from the menu. Returns `false` if the drink does not exist.
    pub async fn delete_drink(&self, id: i64) -> Result<bool, DrinkApiError> {
        let deleted = self.db.delete_drink(id).await?;
        if deleted {
            info!("☕️ Drink #{id} was removed from the menu");
        }
        Ok(deleted)
    }
}

fn validate_title(title: &str) -> Result<(), DrinkApiError> {
    if title.trim().is_empty() {
        return Err(DrinkApiError::InvalidDrink("The title cannot be blank".into()));
    }
    Ok(())
}

fn validate_recipe(recipe: &Recipe) -> Result<(), DrinkApiError> {
    if recipe.is_empty() {
        return Err(DrinkApiError::InvalidDrink("The recipe must have at least one ingredient".into()));
    }
    Ok(())
}
