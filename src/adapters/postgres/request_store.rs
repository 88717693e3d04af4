use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::domain::entities::ItemRequest;
use crate::domain::value_objects::{PageParams, RequestId, UserId};
use crate::ports::request_store::{RequestStore as RequestStoreTrait, Result};

fn map_row_to_request(row: &PgRow) -> ItemRequest {
    ItemRequest {
        request_id: RequestId::from_uuid(row.get("request_id")),
        description: row.get("description"),
        requestor_id: UserId::from_uuid(row.get("requestor_id")),
        created_at: row.get("created_at"),
    }
}

/// RequestStore の PostgreSQL 実装
pub struct RequestStore {
    pool: PgPool,
}

impl RequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestStoreTrait for RequestStore {
    async fn insert(&self, request: ItemRequest) -> Result<ItemRequest> {
        sqlx::query(
            r#"
            INSERT INTO item_requests (request_id, description, requestor_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(request.request_id.value())
        .bind(&request.description)
        .bind(request.requestor_id.value())
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_by_id(&self, request_id: RequestId) -> Result<Option<ItemRequest>> {
        let row = sqlx::query(
            r#"
            SELECT request_id, description, requestor_id, created_at
            FROM item_requests
            WHERE request_id = $1
            "#,
        )
        .bind(request_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_request))
    }

    async fn find_by_requestor(&self, requestor_id: UserId) -> Result<Vec<ItemRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT request_id, description, requestor_id, created_at
            FROM item_requests
            WHERE requestor_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(requestor_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_request).collect())
    }

    async fn find_all_except(
        &self,
        requestor_id: UserId,
        page: PageParams,
    ) -> Result<Vec<ItemRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT request_id, description, requestor_id, created_at
            FROM item_requests
            WHERE requestor_id <> $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(requestor_id.value())
        .bind(page.offset() as i64)
        .bind(page.limit().map(|l| l as i64))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_request).collect())
    }
}
