use chrono::{DateTime, Utc};

use crate::domain::booking::{self, BookingSubject, StateFilter};
use crate::domain::value_objects::{BookingId, ItemId, PageParams, UserId};
use crate::ports::BookingView;

use super::Stores;
use super::errors::{AppError, Result};

/// 予約作成コマンド
///
/// start/end は未指定の可能性があるため Option のまま受け取り、
/// ドメインのウィンドウ検証で確定させる。
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub item_id: ItemId,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// 予約を作成する
///
/// ビジネスルール：
/// - アイテムとユーザーが存在すること
/// - アイテムが貸出可能であること
/// - オーナーは自分のアイテムを予約できないこと
/// - ウィンドウが正当であること（start < end、両端必須）
///
/// 作成された予約は必ず WAITING で永続化される。availability フラグは
/// 作成時には変更しない。
pub async fn create_booking(
    stores: &Stores,
    booker_id: UserId,
    cmd: CreateBooking,
) -> Result<BookingView> {
    let item = stores
        .items
        .find_by_id(cmd.item_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::ItemNotFound)?;

    let booker_exists = stores
        .users
        .exists(booker_id)
        .await
        .map_err(AppError::StoreError)?;
    if !booker_exists {
        return Err(AppError::UserNotFound);
    }

    if !item.available {
        return Err(AppError::InvalidParameter(
            "Item is not available for booking".to_string(),
        ));
    }

    if item.owner_id == booker_id {
        return Err(AppError::UnauthorizedActor(
            "Owner cannot book their own item".to_string(),
        ));
    }

    let (start, end) = booking::validate_window(cmd.start, cmd.end)?;

    let booking = booking::create_booking(item.item_id, booker_id, start, end, Utc::now());
    let booking = stores
        .bookings
        .insert(booking)
        .await
        .map_err(AppError::StoreError)?;

    Ok(BookingView {
        booking_id: booking.booking_id,
        start: booking.start,
        end: booking.end,
        status: booking.status,
        item_id: item.item_id,
        item_name: item.name,
        owner_id: item.owner_id,
        booker_id,
    })
}

/// 予約を承認または却下する
///
/// ビジネスルール：
/// - 予約が WAITING であること（確定済みは再決定不可）
/// - 予約者本人は自分の予約を決定できないこと
/// - アイテムのオーナーのみが決定できること
///
/// 遷移は条件付き更新として適用されるため、並行する二重承認は
/// 片方が必ず失敗する。
pub async fn decide_booking(
    stores: &Stores,
    booking_id: BookingId,
    acting_user: UserId,
    approve: bool,
) -> Result<BookingView> {
    let user_exists = stores
        .users
        .exists(acting_user)
        .await
        .map_err(AppError::StoreError)?;
    if !user_exists {
        return Err(AppError::UserNotFound);
    }

    let view = stores
        .bookings
        .find_view(booking_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::BookingNotFound)?;

    // ステータス検証が最初。確定済みの予約は誰が触ってもパラメータエラー。
    let new_status = booking::decide(view.status, approve)?;

    if view.booker_id == acting_user {
        return Err(AppError::UnauthorizedActor(
            "Booker cannot decide their own booking".to_string(),
        ));
    }

    if view.owner_id != acting_user {
        return Err(AppError::UnauthorizedActor(
            "Only the item owner can decide a booking".to_string(),
        ));
    }

    // 条件付き更新。WAITING でなくなっていたら並行する決定に敗れている。
    stores
        .bookings
        .finalize(booking_id, new_status)
        .await
        .map_err(AppError::StoreError)?
        .ok_or_else(|| {
            AppError::InvalidParameter("Booking is not waiting for a decision".to_string())
        })
}

/// 参加者として予約を取得する
///
/// アイテムのオーナーか予約者本人のみが閲覧できる。
pub async fn get_booking_for_participant(
    stores: &Stores,
    requester_id: UserId,
    booking_id: BookingId,
) -> Result<BookingView> {
    let user_exists = stores
        .users
        .exists(requester_id)
        .await
        .map_err(AppError::StoreError)?;
    if !user_exists {
        return Err(AppError::UserNotFound);
    }

    let view = stores
        .bookings
        .find_view(booking_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::BookingNotFound)?;

    // アイテムは独立に再取得する。予約後に消えていたら not-found。
    let item = stores
        .items
        .find_by_id(view.item_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::ItemNotFound)?;

    if requester_id != item.owner_id && requester_id != view.booker_id {
        return Err(AppError::UnauthorizedActor(
            "Only the item owner or the booker can view this booking".to_string(),
        ));
    }

    Ok(view)
}

/// 予約を削除する
///
/// 存在確認を先に行い、存在しなければ not-found で失敗する。
pub async fn delete_booking(stores: &Stores, booking_id: BookingId) -> Result<()> {
    let exists = stores
        .bookings
        .exists(booking_id)
        .await
        .map_err(AppError::StoreError)?;
    if !exists {
        return Err(AppError::BookingNotFound);
    }

    stores
        .bookings
        .delete(booking_id)
        .await
        .map_err(AppError::StoreError)
}

/// 予約者としての予約一覧を取得する
pub async fn list_for_booker(
    stores: &Stores,
    booker_id: UserId,
    state: &str,
    from: Option<i64>,
    size: Option<i64>,
) -> Result<Vec<BookingView>> {
    list_for_subject(stores, BookingSubject::Booker(booker_id), booker_id, state, from, size).await
}

/// オーナーとしての予約一覧を取得する
pub async fn list_for_owner(
    stores: &Stores,
    owner_id: UserId,
    state: &str,
    from: Option<i64>,
    size: Option<i64>,
) -> Result<Vec<BookingView>> {
    list_for_subject(stores, BookingSubject::Owner(owner_id), owner_id, state, from, size).await
}

/// 主体つき一覧取得の共通処理
///
/// 状態トークンを述語に分類し、単一のページング付きクエリ契約へ委譲する。
/// `now` は呼び出しごとに1回だけサンプリングする。
async fn list_for_subject(
    stores: &Stores,
    subject: BookingSubject,
    user_id: UserId,
    state: &str,
    from: Option<i64>,
    size: Option<i64>,
) -> Result<Vec<BookingView>> {
    let user_exists = stores
        .users
        .exists(user_id)
        .await
        .map_err(AppError::StoreError)?;
    if !user_exists {
        return Err(AppError::UserNotFound);
    }

    let filter: StateFilter = state.parse()?;
    let page = PageParams::from_query(from, size)?;
    let predicate = filter.classify(Utc::now());

    stores
        .bookings
        .find_for_subject(subject, predicate, page)
        .await
        .map_err(AppError::StoreError)
}
