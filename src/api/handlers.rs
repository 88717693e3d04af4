use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    self, CreateBooking, CreateItem, PatchItem, PatchUser, Stores,
};
use crate::domain::value_objects::{BookingId, ItemId, RequestId, UserId};

use super::{
    error::ApiError,
    types::{
        BookingListQuery, BookingResponse, CommentResponse, CreateBookingRequest,
        CreateCommentRequest, CreateItemRequest, CreateItemRequestRequest, CreateUserRequest,
        DecideQuery, ItemDetailsResponse, ItemResponse, PageQuery, RequestResponse, SearchQuery,
        UpdateItemRequest, UpdateUserRequest, UserResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
}

/// 操作主体を識別するヘッダー
pub const SHARER_USER_HEADER: &str = "X-Sharer-User-Id";

/// X-Sharer-User-Id ヘッダーから操作主体のIDを取り出す
fn sharer_user_id(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get(SHARER_USER_HEADER)
        .ok_or(ApiError::MissingUserHeader)?;
    let raw = raw.to_str().map_err(|_| ApiError::InvalidUserHeader)?;
    let uuid = Uuid::parse_str(raw).map_err(|_| ApiError::InvalidUserHeader)?;
    Ok(UserId::from_uuid(uuid))
}

// ============================================================================
// User handlers
// ============================================================================

/// POST /users - ユーザーを登録
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = application::create_user(&state.stores, req.name, req.email).await?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /users - 全ユーザーを取得
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = application::list_users(&state.stores).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/:id - ユーザーをIDで取得
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = application::get_user(&state.stores, UserId::from_uuid(user_id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/:id - ユーザーを部分更新
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let patch = PatchUser {
        name: req.name,
        email: req.email,
    };
    let user = application::update_user(&state.stores, UserId::from_uuid(user_id), patch).await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:id - ユーザーを削除
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    application::delete_user(&state.stores, UserId::from_uuid(user_id)).await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Item handlers
// ============================================================================

/// POST /items - アイテムを出品
///
/// 操作主体（オーナー）は X-Sharer-User-Id ヘッダーで識別する。
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let owner_id = sharer_user_id(&headers)?;
    let cmd = CreateItem {
        name: req.name,
        description: req.description,
        available: req.available,
        request_id: req.request_id.map(RequestId::from_uuid),
    };
    let item = application::create_item(&state.stores, owner_id, cmd).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// PATCH /items/:id - アイテムを部分更新
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let acting_user = sharer_user_id(&headers)?;
    let patch = PatchItem {
        name: req.name,
        description: req.description,
        available: req.available,
        request_id: req.request_id.map(RequestId::from_uuid),
    };
    let item =
        application::patch_item(&state.stores, ItemId::from_uuid(item_id), acting_user, patch)
            .await?;
    Ok(Json(ItemResponse::from(item)))
}

/// GET /items/:id - アイテム詳細を取得
///
/// 直近・次回の承認済み予約はオーナーが閲覧したときのみ付く。
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemDetailsResponse>, ApiError> {
    let requester_id = sharer_user_id(&headers)?;
    let details =
        application::get_item(&state.stores, ItemId::from_uuid(item_id), requester_id).await?;
    Ok(Json(ItemDetailsResponse::from(details)))
}

/// GET /items - オーナーの全アイテムを詳細付きで取得
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<ItemDetailsResponse>>, ApiError> {
    let owner_id = sharer_user_id(&headers)?;
    let details =
        application::list_items_for_owner(&state.stores, owner_id, query.from, query.size).await?;
    Ok(Json(
        details.into_iter().map(ItemDetailsResponse::from).collect(),
    ))
}

/// GET /items/search - アイテムをテキスト検索
pub async fn search_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items =
        application::search_items(&state.stores, &query.text, query.from, query.size).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// DELETE /items/:id - アイテムを削除
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    application::delete_item(&state.stores, ItemId::from_uuid(item_id)).await?;
    Ok(StatusCode::OK)
}

/// POST /items/:id/comment - コメントを投稿
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let author_id = sharer_user_id(&headers)?;
    let comment =
        application::add_comment(&state.stores, author_id, ItemId::from_uuid(item_id), req.text)
            .await?;
    Ok(Json(CommentResponse::from(comment)))
}

// ============================================================================
// Booking handlers
// ============================================================================

/// POST /bookings - 予約を作成
///
/// 強制されるビジネスルール:
/// - アイテムが存在し、貸出可能であること
/// - オーナーは自分のアイテムを予約できないこと
/// - ウィンドウが正当であること（start < end、両端必須）
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booker_id = sharer_user_id(&headers)?;
    let cmd = CreateBooking {
        item_id: ItemId::from_uuid(req.item_id),
        start: req.start,
        end: req.end,
    };
    let view = application::create_booking(&state.stores, booker_id, cmd).await?;
    Ok(Json(BookingResponse::from(view)))
}

/// PATCH /bookings/:id?approved= - 予約を承認または却下
///
/// 強制されるビジネスルール:
/// - 予約が WAITING であること
/// - アイテムのオーナーのみが決定できること
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<DecideQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let acting_user = sharer_user_id(&headers)?;
    let view = application::decide_booking(
        &state.stores,
        BookingId::from_uuid(booking_id),
        acting_user,
        query.approved,
    )
    .await?;
    Ok(Json(BookingResponse::from(view)))
}

/// GET /bookings/:id - 予約を取得
///
/// アイテムのオーナーか予約者本人のみが閲覧できる。
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let requester_id = sharer_user_id(&headers)?;
    let view = application::get_booking_for_participant(
        &state.stores,
        requester_id,
        BookingId::from_uuid(booking_id),
    )
    .await?;
    Ok(Json(BookingResponse::from(view)))
}

/// GET /bookings?state= - 予約者としての予約一覧を取得
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let booker_id = sharer_user_id(&headers)?;
    let state_token = query.state.as_deref().unwrap_or("ALL");
    let views = application::list_for_booker(
        &state.stores,
        booker_id,
        state_token,
        query.from,
        query.size,
    )
    .await?;
    Ok(Json(views.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner?state= - オーナーとしての予約一覧を取得
pub async fn list_bookings_for_owner(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let owner_id = sharer_user_id(&headers)?;
    let state_token = query.state.as_deref().unwrap_or("ALL");
    let views = application::list_for_owner(
        &state.stores,
        owner_id,
        state_token,
        query.from,
        query.size,
    )
    .await?;
    Ok(Json(views.into_iter().map(BookingResponse::from).collect()))
}

/// DELETE /bookings/:id - 予約を削除
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    application::delete_booking(&state.stores, BookingId::from_uuid(booking_id)).await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Item request handlers
// ============================================================================

/// POST /requests - アイテムリクエストを投稿
pub async fn add_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateItemRequestRequest>,
) -> Result<Json<RequestResponse>, ApiError> {
    let requestor_id = sharer_user_id(&headers)?;
    let details = application::add_request(&state.stores, requestor_id, req.description).await?;
    Ok(Json(RequestResponse::from(details)))
}

/// GET /requests - 自分のリクエスト一覧を取得（新しい順）
pub async fn list_own_requests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RequestResponse>>, ApiError> {
    let requestor_id = sharer_user_id(&headers)?;
    let details = application::list_own_requests(&state.stores, requestor_id).await?;
    Ok(Json(details.into_iter().map(RequestResponse::from).collect()))
}

/// GET /requests/all - 他ユーザーの全リクエストを取得（ページング付き）
pub async fn list_all_requests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<RequestResponse>>, ApiError> {
    let requester_id = sharer_user_id(&headers)?;
    let details =
        application::list_all_requests(&state.stores, requester_id, query.from, query.size).await?;
    Ok(Json(details.into_iter().map(RequestResponse::from).collect()))
}

/// GET /requests/:id - リクエストをIDで取得
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RequestResponse>, ApiError> {
    let requester_id = sharer_user_id(&headers)?;
    let details = application::get_request(
        &state.stores,
        requester_id,
        RequestId::from_uuid(request_id),
    )
    .await?;
    Ok(Json(RequestResponse::from(details)))
}
