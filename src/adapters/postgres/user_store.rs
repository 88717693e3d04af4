use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::domain::entities::User;
use crate::domain::value_objects::UserId;
use crate::ports::user_store::{Result, UserStore as UserStoreTrait};

fn map_row_to_user(row: &PgRow) -> User {
    User {
        user_id: UserId::from_uuid(row.get("user_id")),
        name: row.get("name"),
        email: row.get("email"),
    }
}

/// UserStore の PostgreSQL 実装
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStoreTrait for UserStore {
    async fn insert(&self, user: User) -> Result<User> {
        sqlx::query("INSERT INTO users (user_id, name, email) VALUES ($1, $2, $3)")
            .bind(user.user_id.value())
            .bind(&user.name)
            .bind(&user.email)
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User> {
        sqlx::query("UPDATE users SET name = $2, email = $3 WHERE user_id = $1")
            .bind(user.user_id.value())
            .bind(&user.name)
            .bind(&user.email)
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT user_id, name, email FROM users WHERE user_id = $1")
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_row_to_user))
    }

    async fn exists(&self, user_id: UserId) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1) AS found")
            .bind(user_id.value())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("found"))
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT user_id, name, email FROM users ORDER BY user_id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_row_to_user).collect())
    }

    async fn email_taken(&self, email: &str, exclude: Option<UserId>) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR user_id <> $2)
            ) AS found
            "#,
        )
        .bind(email)
        .bind(exclude.map(|id| id.value()))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("found"))
    }

    async fn delete(&self, user_id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
