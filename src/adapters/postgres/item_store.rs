use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::domain::entities::Item;
use crate::domain::value_objects::{ItemId, PageParams, RequestId, UserId};
use crate::ports::item_store::{ItemStore as ItemStoreTrait, Result};

fn map_row_to_item(row: &PgRow) -> Item {
    let request_id: Option<Uuid> = row.get("request_id");

    Item {
        item_id: ItemId::from_uuid(row.get("item_id")),
        name: row.get("name"),
        description: row.get("description"),
        available: row.get("available"),
        owner_id: UserId::from_uuid(row.get("owner_id")),
        request_id: request_id.map(RequestId::from_uuid),
    }
}

/// ItemStore の PostgreSQL 実装
pub struct ItemStore {
    pool: PgPool,
}

impl ItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStoreTrait for ItemStore {
    async fn insert(&self, item: Item) -> Result<Item> {
        sqlx::query(
            r#"
            INSERT INTO items (item_id, name, description, available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.item_id.value())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(item.owner_id.value())
        .bind(item.request_id.map(|id| id.value()))
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update(&self, item: Item) -> Result<Item> {
        sqlx::query(
            r#"
            UPDATE items
            SET name = $2, description = $3, available = $4, request_id = $5
            WHERE item_id = $1
            "#,
        )
        .bind(item.item_id.value())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(item.request_id.map(|id| id.value()))
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE item_id = $1
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_item))
    }

    async fn exists(&self, item_id: ItemId) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM items WHERE item_id = $1) AS found")
            .bind(item_id.value())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("found"))
    }

    async fn find_by_owner(&self, owner_id: UserId, page: PageParams) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE owner_id = $1
            ORDER BY item_id ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(owner_id.value())
        .bind(page.offset() as i64)
        .bind(page.limit().map(|l| l as i64))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item).collect())
    }

    async fn search(&self, text: &str, page: PageParams) -> Result<Vec<Item>> {
        // ILIKE の部分一致。貸出可能なアイテムのみ対象。
        let pattern = format!("%{}%", text);
        let rows = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE available AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY item_id ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(&pattern)
        .bind(page.offset() as i64)
        .bind(page.limit().map(|l| l as i64))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item).collect())
    }

    async fn find_by_request(&self, request_id: RequestId) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, name, description, available, owner_id, request_id
            FROM items
            WHERE request_id = $1
            ORDER BY item_id ASC
            "#,
        )
        .bind(request_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item).collect())
    }

    async fn delete(&self, item_id: ItemId) -> Result<()> {
        sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(item_id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
