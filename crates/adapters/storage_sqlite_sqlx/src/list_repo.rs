//! `SQLite` implementation of [`ListRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use shoplist_app::ports::ListRepository;
use shoplist_domain::error::ShoppingListError;
use shoplist_domain::id::ListId;
use shoplist_domain::list::{List, ListStatus};
use shoplist_domain::time::Timestamp;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`List`].
struct Wrapper(List);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<List> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let status: String = row.try_get("status")?;
        let date: String = row.try_get("date")?;

        let id = ListId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let status =
            ListStatus::from_str(&status).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&date)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(List {
            id,
            status,
            created_at,
        }))
    }
}

/// Fixed-width RFC 3339 so that `ORDER BY date` sorts chronologically.
fn encode_date(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

const INSERT: &str = "INSERT INTO lists (id, status, date) VALUES (?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM lists WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM lists ORDER BY date DESC, id DESC";
const UPDATE_STATUS: &str = "UPDATE lists SET status = ? WHERE id = ?";

/// `SQLite`-backed list repository.
pub struct SqliteListRepository {
    pool: SqlitePool,
}

impl SqliteListRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ListRepository for SqliteListRepository {
    fn create(&self, list: List) -> impl Future<Output = Result<List, ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(list.id.to_string())
                .bind(list.status.as_str())
                .bind(encode_date(list.created_at))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(list)
        }
    }

    fn get_by_id(
        &self,
        id: ListId,
    ) -> impl Future<Output = Result<Option<List>, ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<List>, ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update_status(
        &self,
        id: ListId,
        status: ListStatus,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE_STATUS)
                .bind(status.as_str())
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
