//! # SQLite backend
//!
//! [`SqliteDatabase`] is the concrete backend for the drinks menu. The low-level queries live in [`drinks`] as plain
//! functions that accept a `&mut SqliteConnection`, so callers can run them on a pooled connection or inside a
//! transaction without any other changes.
use log::{info, warn};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Error as SqlxError, Sqlite, SqlitePool};

pub mod drinks;
mod sqlite_impl;

pub use sqlite_impl::SqliteDatabase;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Makes sure the database at `url` exists, creating it if necessary.
///
/// When `reset` is true, an existing database is dropped first and **all data is lost**.
pub async fn prepare_database(url: &str, reset: bool) -> Result<(), SqlxError> {
    if reset && Sqlite::database_exists(url).await? {
        warn!("🗃️ Dropping database {url}. All drinks will be deleted.");
        Sqlite::drop_database(url).await?;
    }
    if !Sqlite::database_exists(url).await? {
        Sqlite::create_database(url).await?;
        info!("🗃️ Created Sqlite database {url}");
    }
    Ok(())
}
