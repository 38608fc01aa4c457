use super::models::{Event, Property};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{
    query, query_as,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    QueryBuilder, Sqlite, SqlitePool,
};
use std::str::FromStr;

/// Generic CRUD for a row type. `get` resolves to `Ok(None)` when the row
/// does not exist, so callers can tell "not found" apart from a broken
/// database.
#[async_trait]
pub trait DbModel<GetQuery, ListQuery>: Sized
where
    GetQuery: Sync,
    ListQuery: Sync,
{
    async fn get(db: &SqlitePool, query: &GetQuery) -> Result<Option<Self>>;
    async fn list(db: &SqlitePool, query: &ListQuery) -> Result<Vec<Self>>;
    /// Persist changes to an existing row.
    async fn save(&self, db: &SqlitePool) -> Result<()>;
    async fn delete(self, db: &SqlitePool) -> Result<()>;
}

/// Open (creating if necessary) the database and bring its schema up to date.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("could not connect to database")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("could not apply migrations")?;

    Ok(pool)
}

pub struct GetPropertyQuery {
    pub id: i64,
}

pub struct ListPropertyQuery;

#[async_trait]
impl DbModel<GetPropertyQuery, ListPropertyQuery> for Property {
    async fn get(
        db: &SqlitePool,
        query: &GetPropertyQuery,
    ) -> Result<Option<Self>> {
        Ok(query_as::<_, Property>(
            "select id, number, notes from property where id = ?",
        )
        .bind(query.id)
        .fetch_optional(db)
        .await?)
    }
    async fn list(
        db: &SqlitePool,
        _query: &ListPropertyQuery,
    ) -> Result<Vec<Self>> {
        Ok(query_as::<_, Property>(
            "select id, number, notes from property order by id",
        )
        .fetch_all(db)
        .await?)
    }
    async fn save(&self, db: &SqlitePool) -> Result<()> {
        query("update property set number = ?, notes = ? where id = ?")
            .bind(&self.number)
            .bind(&self.notes)
            .bind(self.id)
            .execute(db)
            .await?;

        Ok(())
    }
    /// Events go with their property.
    async fn delete(self, db: &SqlitePool) -> Result<()> {
        let mut tx = db.begin().await?;
        query("delete from event where property_id = ?")
            .bind(self.id)
            .execute(&mut tx)
            .await?;
        query("delete from property where id = ?")
            .bind(self.id)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}

pub async fn create_property(
    db: &SqlitePool,
    number: &str,
    notes: Option<&str>,
) -> Result<Property> {
    let res = query("insert into property (number, notes) values (?, ?)")
        .bind(number)
        .bind(notes)
        .execute(db)
        .await?;

    Ok(Property {
        id: res.last_insert_rowid(),
        number: number.to_string(),
        notes: notes.map(str::to_string),
    })
}

/// Events are always addressed through their property; an event id paired
/// with the wrong property id is not found.
pub struct GetEventQuery {
    pub property_id: i64,
    pub id: i64,
}

/// Both bounds are inclusive.
pub struct ListEventQuery {
    pub property_id: i64,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[async_trait]
impl DbModel<GetEventQuery, ListEventQuery> for Event {
    async fn get(db: &SqlitePool, query: &GetEventQuery) -> Result<Option<Self>> {
        Ok(query_as::<_, Event>(
            "select id, property_id, timestamp, description
            from event
            where id = ? and property_id = ?",
        )
        .bind(query.id)
        .bind(query.property_id)
        .fetch_optional(db)
        .await?)
    }
    async fn list(db: &SqlitePool, query: &ListEventQuery) -> Result<Vec<Self>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "select id, property_id, timestamp, description
            from event
            where property_id = ",
        );
        builder.push_bind(query.property_id);
        if let Some(start) = query.start {
            builder.push(" and timestamp >= ").push_bind(start);
        }
        if let Some(end) = query.end {
            builder.push(" and timestamp <= ").push_bind(end);
        }
        builder.push(" order by timestamp, id");

        Ok(builder.build_query_as::<Event>().fetch_all(db).await?)
    }
    async fn save(&self, db: &SqlitePool) -> Result<()> {
        query(
            "update event set timestamp = ?, description = ?
            where id = ? and property_id = ?",
        )
        .bind(self.timestamp)
        .bind(&self.description)
        .bind(self.id)
        .bind(self.property_id)
        .execute(db)
        .await?;

        Ok(())
    }
    async fn delete(self, db: &SqlitePool) -> Result<()> {
        query("delete from event where id = ? and property_id = ?")
            .bind(self.id)
            .bind(self.property_id)
            .execute(db)
            .await?;

        Ok(())
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.message().contains("FOREIGN KEY constraint failed")
        }
        _ => false,
    }
}

/// Resolves to `Ok(None)` if the property does not exist (or is deleted out
/// from under us before the insert lands).
pub async fn create_event(
    db: &SqlitePool,
    property_id: i64,
    timestamp: NaiveDateTime,
    description: &str,
) -> Result<Option<Event>> {
    let res = query(
        "insert into event (property_id, timestamp, description)
        values (?, ?, ?)",
    )
    .bind(property_id)
    .bind(timestamp)
    .bind(description)
    .execute(db)
    .await;
    let res = match res {
        Ok(res) => res,
        Err(err) if is_foreign_key_violation(&err) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    Ok(Some(Event {
        id: res.last_insert_rowid(),
        property_id,
        timestamp,
        description: description.to_string(),
    }))
}

/// A fresh, migrated in-memory database. One connection only: every
/// connection to `sqlite::memory:` gets its own empty database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    create_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory database")
}
