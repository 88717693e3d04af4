use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::domain::entities::Comment;
use crate::domain::value_objects::{CommentId, ItemId, UserId};
use crate::ports::comment_store::{CommentStore as CommentStoreTrait, Result};

fn map_row_to_comment(row: &PgRow) -> Comment {
    Comment {
        comment_id: CommentId::from_uuid(row.get("comment_id")),
        text: row.get("text"),
        item_id: ItemId::from_uuid(row.get("item_id")),
        author_id: UserId::from_uuid(row.get("author_id")),
        created_at: row.get("created_at"),
    }
}

/// CommentStore の PostgreSQL 実装
pub struct CommentStore {
    pool: PgPool,
}

impl CommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStoreTrait for CommentStore {
    async fn insert(&self, comment: Comment) -> Result<Comment> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, text, item_id, author_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.value())
        .bind(&comment.text)
        .bind(comment.item_id.value())
        .bind(comment.author_id.value())
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT comment_id, text, item_id, author_id, created_at
            FROM comments
            WHERE item_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(item_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_comment).collect())
    }
}
