use crate::domain::booking::{Booking, BookingPredicate, BookingStatus, BookingSubject};
use crate::domain::value_objects::{BookingId, ItemId, PageParams, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約ビュー
///
/// 予約にアイテム名とオーナーを合成した読み取り用ビュー。
/// 参加者チェック（オーナー or 予約者）とレスポンス生成の両方に使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub booking_id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub item_id: ItemId,
    pub item_name: String,
    pub owner_id: UserId,
    pub booker_id: UserId,
}

/// 予約ストアポート
///
/// 一覧取得は「主体 × 述語 × ページング」の単一契約に統一する。
/// 結果は常に start 降順。
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 予約を保存する（新規作成）
    async fn insert(&self, booking: Booking) -> Result<Booking>;

    /// IDで予約ビューを取得する（アイテムとオーナーを合成済み）
    async fn find_view(&self, booking_id: BookingId) -> Result<Option<BookingView>>;

    /// 予約が存在するか確認する
    async fn exists(&self, booking_id: BookingId) -> Result<bool>;

    /// WAITING の予約を終端ステータスへ遷移させる
    ///
    /// read-modify-write を単一の条件付き更新として実行する。
    /// 予約が既に WAITING でない場合（並行する決定に敗れた場合を含む）
    /// は何も変更せず `None` を返す。
    async fn finalize(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<BookingView>>;

    /// 主体と述語で予約を検索する（start 降順、ページング付き）
    async fn find_for_subject(
        &self,
        subject: BookingSubject,
        predicate: BookingPredicate,
        page: PageParams,
    ) -> Result<Vec<BookingView>>;

    /// アイテムと予約者の組の全予約を取得する（start 降順）
    ///
    /// コメント投稿資格の確認に使用される。
    async fn find_by_item_and_booker(
        &self,
        item_id: ItemId,
        booker_id: UserId,
    ) -> Result<Vec<Booking>>;

    /// アイテムの直近の承認済み予約を取得する（end が now 以前で最大）
    async fn last_approved_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// アイテムの次の承認済み予約を取得する（end が now より後で最小）
    async fn next_approved_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// IDで予約を削除する
    async fn delete(&self, booking_id: BookingId) -> Result<()>;
}
