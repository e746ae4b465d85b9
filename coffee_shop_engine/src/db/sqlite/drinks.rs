use log::{debug, trace};
use sqlx::{types::Json, QueryBuilder, Sqlite, SqliteConnection};

use crate::db_types::{Drink, DrinkUpdate, NewDrink};

/// Returns all the drinks in the database, ordered by id.
pub async fn fetch_drinks(conn: &mut SqliteConnection) -> Result<Vec<Drink>, sqlx::Error> {
    let drinks = sqlx::query_as("SELECT id, title, recipe FROM drinks ORDER BY id ASC").fetch_all(conn).await?;
    Ok(drinks)
}

pub async fn fetch_drink(id: i64, conn: &mut SqliteConnection) -> Result<Option<Drink>, sqlx::Error> {
    let drink =
        sqlx::query_as("SELECT id, title, recipe FROM drinks WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(drink)
}

/// Inserts a new drink into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to, and pass `&mut *tx` as the connection argument.
pub async fn insert_drink(drink: NewDrink, conn: &mut SqliteConnection) -> Result<Drink, sqlx::Error> {
    let drink: Drink = sqlx::query_as(
        r#"
            INSERT INTO drinks (title, recipe) VALUES ($1, $2)
            RETURNING id, title, recipe;
        "#,
    )
    .bind(drink.title)
    .bind(Json(drink.recipe))
    .fetch_one(conn)
    .await?;
    debug!("🗃️ {drink} inserted");
    Ok(drink)
}

/// Updates the fields that are set in `update`. If `update` is empty, the drink is returned unchanged.
pub async fn update_drink(
    id: i64,
    update: DrinkUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Drink>, sqlx::Error> {
    if update.is_empty() {
        return fetch_drink(id, conn).await;
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE drinks SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(title) = update.title {
        set_clause.push("title = ");
        set_clause.push_bind_unseparated(title);
    }
    if let Some(recipe) = update.recipe {
        set_clause.push("recipe = ");
        set_clause.push_bind_unseparated(Json(recipe));
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING id, title, recipe");
    trace!("🗃️ Executing query: {}", builder.sql());
    let drink = builder.build_query_as::<Drink>().fetch_optional(conn).await?;
    Ok(drink)
}

/// Deletes the drink with the given id. Returns `true` if a row was removed.
pub async fn delete_drink(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM drinks WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}
