//! `SQLite` implementation of [`ItemRepository`].
//!
//! Order keys are stored twice: as the exact `sort_numerator` /
//! `sort_denominator` pair and as the float `sort` used for coarse ordering.
//! Rows where the pair is missing fall back to the float.

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use shoplist_app::ports::ItemRepository;
use shoplist_domain::error::ShoppingListError;
use shoplist_domain::id::{ItemId, ListId};
use shoplist_domain::item::Item;
use shoplist_domain::order_key::OrderKey;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Item`].
struct Wrapper(Item);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Item> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let list_id: String = row.try_get("list_id")?;
        let parent_id: Option<String> = row.try_get("parent_id")?;
        let text: String = row.try_get("text")?;
        let checked: bool = row.try_get("checked")?;
        let sort: f64 = row.try_get("sort")?;
        let numerator: Option<i64> = row.try_get("sort_numerator")?;
        let denominator: Option<i64> = row.try_get("sort_denominator")?;

        let id = ItemId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let list_id =
            ListId::from_str(&list_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let parent_id = parent_id
            .map(|s| ItemId::from_str(&s))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let order_key = decode_key(numerator, denominator, sort)?;

        Ok(Self(Item {
            id,
            list_id,
            text,
            checked,
            parent_id,
            order_key,
        }))
    }
}

fn decode_key(
    numerator: Option<i64>,
    denominator: Option<i64>,
    sort: f64,
) -> Result<OrderKey, sqlx::Error> {
    if let (Some(numerator), Some(denominator)) = (numerator, denominator) {
        let numerator =
            u64::try_from(numerator).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let denominator =
            u64::try_from(denominator).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        return OrderKey::new(numerator, denominator)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)));
    }
    OrderKey::approximate(sort)
        .ok_or_else(|| sqlx::Error::Decode(format!("unusable sort value {sort}").into()))
}

fn encode_component(value: u64) -> Result<i64, StorageError> {
    i64::try_from(value).map_err(|_| StorageError::KeyOutOfRange(value))
}

const INSERT: &str = r"
    INSERT INTO items (id, list_id, parent_id, text, checked, sort, sort_numerator, sort_denominator)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM items WHERE id = ?";
const SELECT_BY_LIST: &str = "SELECT * FROM items WHERE list_id = ? ORDER BY sort ASC, id ASC";
const UPDATE_TEXT: &str = "UPDATE items SET text = ? WHERE id = ?";
const UPDATE_CHECKED: &str = "UPDATE items SET checked = ? WHERE id = ?";
const UPDATE_PARENT_AND_ORDER: &str = r"
    UPDATE items
    SET parent_id = ?, sort = ?, sort_numerator = ?, sort_denominator = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM items WHERE id = ?";

/// `SQLite`-backed item repository.
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ItemRepository for SqliteItemRepository {
    fn find_all_by_list(
        &self,
        list_id: ListId,
    ) -> impl Future<Output = Result<Vec<Item>, ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_LIST)
                .bind(list_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            // the float column can misorder keys closer than its precision
            let mut items: Vec<Item> = rows.into_iter().map(|w| w.0).collect();
            items.sort_by(|a, b| a.order_key.cmp(&b.order_key).then(a.id.cmp(&b.id)));
            Ok(items)
        }
    }

    fn find_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, ShoppingListError>> + Send {
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

    fn create(&self, item: Item) -> impl Future<Output = Result<Item, ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            let numerator = encode_component(item.order_key.numerator())?;
            let denominator = encode_component(item.order_key.denominator())?;
            sqlx::query(INSERT)
                .bind(item.id.to_string())
                .bind(item.list_id.to_string())
                .bind(item.parent_id.map(|id| id.to_string()))
                .bind(&item.text)
                .bind(item.checked)
                .bind(item.order_key.as_f64())
                .bind(numerator)
                .bind(denominator)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(item)
        }
    }

    fn update_text(
        &self,
        id: ItemId,
        text: String,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE_TEXT)
                .bind(text)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn update_checked(
        &self,
        id: ItemId,
        checked: bool,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE_CHECKED)
                .bind(checked)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn set_parent_and_order(
        &self,
        id: ItemId,
        parent_id: Option<ItemId>,
        order_key: OrderKey,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            let numerator = encode_component(order_key.numerator())?;
            let denominator = encode_component(order_key.denominator())?;
            sqlx::query(UPDATE_PARENT_AND_ORDER)
                .bind(parent_id.map(|id| id.to_string()))
                .bind(order_key.as_f64())
                .bind(numerator)
                .bind(denominator)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn delete(&self, id: ItemId) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
