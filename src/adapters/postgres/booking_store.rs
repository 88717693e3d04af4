use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

use crate::domain::booking::{Booking, BookingPredicate, BookingStatus, BookingSubject};
use crate::domain::value_objects::{BookingId, ItemId, PageParams, UserId};
use crate::ports::booking_store::{BookingStore as BookingStoreTrait, BookingView, Result};

fn parse_status(status: &str) -> Result<BookingStatus> {
    BookingStatus::from_str(status).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })
}

fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status: &str = row.get("status");

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        start: row.get("start_at"),
        end: row.get("end_at"),
        status: parse_status(status)?,
        created_at: row.get("created_at"),
    })
}

fn map_row_to_view(row: &PgRow) -> Result<BookingView> {
    let status: &str = row.get("status");

    Ok(BookingView {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        start: row.get("start_at"),
        end: row.get("end_at"),
        status: parse_status(status)?,
        item_id: ItemId::from_uuid(row.get("item_id")),
        item_name: row.get("item_name"),
        owner_id: UserId::from_uuid(row.get("owner_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
    })
}

/// BookingStore の PostgreSQL 実装
///
/// ビュー取得はアイテムとの JOIN で item_name と owner_id を合成する。
pub struct BookingStore {
    pool: PgPool,
}

impl BookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 主体×述語クエリの SELECT 句（WHERE の続きと結び付けて使う）
const VIEW_SELECT: &str = r#"
    SELECT b.booking_id, b.start_at, b.end_at, b.status, b.booker_id,
           i.item_id, i.name AS item_name, i.owner_id
    FROM bookings b
    JOIN items i ON i.item_id = b.item_id
"#;

#[async_trait]
impl BookingStoreTrait for BookingStore {
    async fn insert(&self, booking: Booking) -> Result<Booking> {
        sqlx::query(
            r#"
            INSERT INTO bookings (booking_id, item_id, booker_id, start_at, end_at, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(booking.booking_id.value())
        .bind(booking.item_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .execute(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn find_view(&self, booking_id: BookingId) -> Result<Option<BookingView>> {
        let sql = format!("{VIEW_SELECT} WHERE b.booking_id = $1");
        let row = sqlx::query(&sql)
            .bind(booking_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_view).transpose()
    }

    async fn exists(&self, booking_id: BookingId) -> Result<bool> {
        let row =
            sqlx::query("SELECT EXISTS (SELECT 1 FROM bookings WHERE booking_id = $1) AS found")
                .bind(booking_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(row.get("found"))
    }

    async fn finalize(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<BookingView>> {
        // 単一の条件付き UPDATE。WAITING でなければ行は更新されない。
        let row = sqlx::query(
            r#"
            UPDATE bookings b
            SET status = $2
            FROM items i
            WHERE b.booking_id = $1
              AND b.status = 'waiting'
              AND i.item_id = b.item_id
            RETURNING b.booking_id, b.start_at, b.end_at, b.status, b.booker_id,
                      i.item_id, i.name AS item_name, i.owner_id
            "#,
        )
        .bind(booking_id.value())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_view).transpose()
    }

    async fn find_for_subject(
        &self,
        subject: BookingSubject,
        predicate: BookingPredicate,
        page: PageParams,
    ) -> Result<Vec<BookingView>> {
        let (subject_column, user_id) = match subject {
            BookingSubject::Booker(user_id) => ("b.booker_id", user_id),
            BookingSubject::Owner(user_id) => ("i.owner_id", user_id),
        };

        let condition = match predicate {
            BookingPredicate::All => "",
            BookingPredicate::Current(_) => "AND b.start_at < $4 AND b.end_at > $4",
            BookingPredicate::Past(_) => "AND b.end_at < $4",
            BookingPredicate::Future(_) => "AND b.start_at > $4",
            BookingPredicate::Status(_) => "AND b.status = $4",
        };

        let sql = format!(
            r#"
            {VIEW_SELECT}
            WHERE {subject_column} = $1 {condition}
            ORDER BY b.start_at DESC
            OFFSET $2 LIMIT $3
            "#
        );

        let query = sqlx::query(&sql)
            .bind(user_id.value())
            .bind(page.offset() as i64)
            .bind(page.limit().map(|l| l as i64));
        let query = bind_predicate(query, predicate);

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_view).collect()
    }

    async fn find_by_item_and_booker(
        &self,
        item_id: ItemId,
        booker_id: UserId,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT booking_id, item_id, booker_id, start_at, end_at, status, created_at
            FROM bookings
            WHERE item_id = $1 AND booker_id = $2
            ORDER BY start_at DESC
            "#,
        )
        .bind(item_id.value())
        .bind(booker_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_booking).collect()
    }

    async fn last_approved_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT booking_id, item_id, booker_id, start_at, end_at, status, created_at
            FROM bookings
            WHERE item_id = $1 AND status = 'approved' AND end_at < $2
            ORDER BY end_at DESC
            LIMIT 1
            "#,
        )
        .bind(item_id.value())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn next_approved_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT booking_id, item_id, booker_id, start_at, end_at, status, created_at
            FROM bookings
            WHERE item_id = $1 AND status = 'approved' AND end_at > $2
            ORDER BY end_at ASC
            LIMIT 1
            "#,
        )
        .bind(item_id.value())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn delete(&self, booking_id: BookingId) -> Result<()> {
        sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(booking_id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// 述語の追加バインド（$4）を付与する
fn bind_predicate(
    query: Query<'_, Postgres, PgArguments>,
    predicate: BookingPredicate,
) -> Query<'_, Postgres, PgArguments> {
    match predicate {
        BookingPredicate::All => query,
        BookingPredicate::Current(now)
        | BookingPredicate::Past(now)
        | BookingPredicate::Future(now) => query.bind(now),
        BookingPredicate::Status(status) => query.bind(status.as_str()),
    }
}
