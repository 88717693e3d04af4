use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{BookingBrief, CommentDetails, ItemDetails, RequestDetails};
use crate::domain::entities::{Item, User};
use crate::ports::BookingView;

// ============================================================================
// Request bodies
// ============================================================================

/// ユーザー登録リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// ユーザー部分更新リクエスト（省略されたフィールドは変更しない）
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// アイテム出品リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<Uuid>,
}

/// アイテム部分更新リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<Uuid>,
}

/// 予約作成リクエスト
///
/// start/end はドメイン側で必須検証するため Option で受ける。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// コメント投稿リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// アイテムリクエスト投稿リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateItemRequestRequest {
    pub description: String,
}

// ============================================================================
// Query parameters
// ============================================================================

/// ページングクエリパラメータ（どちらか欠けていれば全件）
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// 予約一覧のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    /// 状態トークン（省略時は ALL）
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// 予約決定のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct DecideQuery {
    pub approved: bool,
}

/// アイテム検索のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

// ============================================================================
// Responses
// ============================================================================

/// ユーザーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.value(),
            name: user.name,
            email: user.email,
        }
    }
}

/// アイテムレスポンス（予約情報なし）
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<Uuid>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.item_id.value(),
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id.map(|id| id.value()),
        }
    }
}

/// 予約の要約（アイテム詳細に埋め込む）
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingBriefResponse {
    pub id: Uuid,
    pub booker_id: Uuid,
}

impl From<BookingBrief> for BookingBriefResponse {
    fn from(brief: BookingBrief) -> Self {
        Self {
            id: brief.booking_id.value(),
            booker_id: brief.booker_id.value(),
        }
    }
}

/// コメントレスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl From<CommentDetails> for CommentResponse {
    fn from(details: CommentDetails) -> Self {
        Self {
            id: details.comment_id.value(),
            text: details.text,
            author_name: details.author_name,
            created: details.created_at,
        }
    }
}

/// アイテム詳細レスポンス
///
/// lastBooking/nextBooking はオーナーが閲覧したときのみ埋まる。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<Uuid>,
    pub last_booking: Option<BookingBriefResponse>,
    pub next_booking: Option<BookingBriefResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<ItemDetails> for ItemDetailsResponse {
    fn from(details: ItemDetails) -> Self {
        Self {
            id: details.item.item_id.value(),
            name: details.item.name,
            description: details.item.description,
            available: details.item.available,
            request_id: details.item.request_id.map(|id| id.value()),
            last_booking: details.last_booking.map(BookingBriefResponse::from),
            next_booking: details.next_booking.map(BookingBriefResponse::from),
            comments: details.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

/// 予約レスポンスに埋め込むアイテム参照
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingItemRef {
    pub id: Uuid,
    pub name: String,
}

/// 予約レスポンスに埋め込む予約者参照
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingBookerRef {
    pub id: Uuid,
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub item: BookingItemRef,
    pub booker: BookingBookerRef,
}

impl From<BookingView> for BookingResponse {
    fn from(view: BookingView) -> Self {
        Self {
            id: view.booking_id.value(),
            start: view.start,
            end: view.end,
            status: view.status.as_str().to_ascii_uppercase(),
            item: BookingItemRef {
                id: view.item_id.value(),
                name: view.item_name,
            },
            booker: BookingBookerRef {
                id: view.booker_id.value(),
            },
        }
    }
}

/// アイテムリクエストレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestResponse {
    pub id: Uuid,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

impl From<RequestDetails> for RequestResponse {
    fn from(details: RequestDetails) -> Self {
        Self {
            id: details.request.request_id.value(),
            description: details.request.description,
            created: details.request.created_at,
            items: details.items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
