//! `SqliteDatabase` is the concrete drinks backend. It implements [`DrinkManagement`] on top of a `SqlitePool`.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::{drinks, new_pool};
use crate::{
    db_types::{Drink, DrinkUpdate, NewDrink},
    traits::{DrinkApiError, DrinkManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl DrinkManagement for SqliteDatabase {
    async fn fetch_drinks(&self) -> Result<Vec<Drink>, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let drinks = drinks::fetch_drinks(&mut conn).await?;
        trace!("🗃️ Fetched {} drinks", drinks.len());
        Ok(drinks)
    }

    async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let drink = drinks::fetch_drink(id, &mut conn).await?;
        Ok(drink)
    }

    async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let drink = drinks::insert_drink(drink, &mut conn).await?;
        Ok(drink)
    }

    async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Option<Drink>, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let drink = drinks::update_drink(id, update, &mut conn).await?;
        match &drink {
            Some(d) => debug!("🗃️ {d} updated"),
            None => debug!("🗃️ Drink #{id} does not exist. Nothing was updated."),
        }
        Ok(drink)
    }

    async fn delete_drink(&self, id: i64) -> Result<bool, DrinkApiError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = drinks::delete_drink(id, &mut conn).await?;
        debug!("🗃️ Delete drink #{id}: {}", if deleted { "done" } else { "no such drink" });
        Ok(deleted)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Brings the schema up to date.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    /// Closes the connection pool. Any further calls on this database (or its clones) will fail.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("🗃️ Database connection pool closed");
    }
}
