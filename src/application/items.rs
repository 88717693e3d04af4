use chrono::{DateTime, Utc};

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::entities::{Comment, Item};
use crate::domain::value_objects::{BookingId, CommentId, ItemId, PageParams, RequestId, UserId};

use super::Stores;
use super::errors::{AppError, Result};

/// アイテム作成コマンド
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<RequestId>,
}

/// アイテム部分更新コマンド（None のフィールドは変更しない）
#[derive(Debug, Clone, Default)]
pub struct PatchItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<RequestId>,
}

/// 予約の要約（アイテム詳細に埋め込む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingBrief {
    pub booking_id: BookingId,
    pub booker_id: UserId,
}

impl From<Booking> for BookingBrief {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.booking_id,
            booker_id: booking.booker_id,
        }
    }
}

/// コメント詳細（投稿者名を合成済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDetails {
    pub comment_id: CommentId,
    pub text: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// アイテム詳細
///
/// コメントは常に付く。直近・次回の承認済み予約はオーナーが
/// 閲覧したときのみ付く。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: Item,
    pub last_booking: Option<BookingBrief>,
    pub next_booking: Option<BookingBrief>,
    pub comments: Vec<CommentDetails>,
}

/// アイテムを出品する
pub async fn create_item(stores: &Stores, owner_id: UserId, cmd: CreateItem) -> Result<Item> {
    let owner_exists = stores
        .users
        .exists(owner_id)
        .await
        .map_err(AppError::StoreError)?;
    if !owner_exists {
        return Err(AppError::UserNotFound);
    }

    let item = Item {
        item_id: ItemId::new(),
        name: cmd.name,
        description: cmd.description,
        available: cmd.available,
        owner_id,
        request_id: cmd.request_id,
    };

    stores.items.insert(item).await.map_err(AppError::StoreError)
}

/// アイテムを部分更新する
///
/// オーナー以外からの更新は、アイテムの存在自体を明かさず
/// not-found として扱う。
pub async fn patch_item(
    stores: &Stores,
    item_id: ItemId,
    acting_user: UserId,
    patch: PatchItem,
) -> Result<Item> {
    let existing = stores
        .items
        .find_by_id(item_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::ItemNotFound)?;

    if existing.owner_id != acting_user {
        return Err(AppError::ItemNotFound);
    }

    let merged = existing.merge_patch(patch.name, patch.description, patch.available, patch.request_id);

    stores
        .items
        .update(merged)
        .await
        .map_err(AppError::StoreError)
}

/// アイテム詳細を取得する
///
/// 誰でも閲覧できるが、直近・次回の承認済み予約はオーナーにのみ見せる。
pub async fn get_item(stores: &Stores, item_id: ItemId, requester_id: UserId) -> Result<ItemDetails> {
    let item = stores
        .items
        .find_by_id(item_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::ItemNotFound)?;

    let comments = load_comments(stores, item_id).await?;

    if item.owner_id != requester_id {
        return Ok(ItemDetails {
            item,
            last_booking: None,
            next_booking: None,
            comments,
        });
    }

    let now = Utc::now();
    let (last, next) = futures::future::try_join(
        stores.bookings.last_approved_for_item(item_id, now),
        stores.bookings.next_approved_for_item(item_id, now),
    )
    .await
    .map_err(AppError::StoreError)?;

    Ok(ItemDetails {
        item,
        last_booking: last.map(BookingBrief::from),
        next_booking: next.map(BookingBrief::from),
        comments,
    })
}

/// オーナーの全アイテムを詳細付きで取得する
pub async fn list_items_for_owner(
    stores: &Stores,
    owner_id: UserId,
    from: Option<i64>,
    size: Option<i64>,
) -> Result<Vec<ItemDetails>> {
    let owner_exists = stores
        .users
        .exists(owner_id)
        .await
        .map_err(AppError::StoreError)?;
    if !owner_exists {
        return Err(AppError::UserNotFound);
    }

    let page = PageParams::from_query(from, size)?;
    let items = stores
        .items
        .find_by_owner(owner_id, page)
        .await
        .map_err(AppError::StoreError)?;

    let now = Utc::now();
    let mut details = Vec::with_capacity(items.len());
    for item in items {
        let comments = load_comments(stores, item.item_id).await?;
        let (last, next) = futures::future::try_join(
            stores.bookings.last_approved_for_item(item.item_id, now),
            stores.bookings.next_approved_for_item(item.item_id, now),
        )
        .await
        .map_err(AppError::StoreError)?;

        details.push(ItemDetails {
            item,
            last_booking: last.map(BookingBrief::from),
            next_booking: next.map(BookingBrief::from),
            comments,
        });
    }

    Ok(details)
}

/// アイテムをテキスト検索する
///
/// 空白のみの検索文字列は空の結果を返す（エラーにはしない）。
pub async fn search_items(
    stores: &Stores,
    text: &str,
    from: Option<i64>,
    size: Option<i64>,
) -> Result<Vec<Item>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let page = PageParams::from_query(from, size)?;

    stores
        .items
        .search(text, page)
        .await
        .map_err(AppError::StoreError)
}

/// アイテムを削除する
pub async fn delete_item(stores: &Stores, item_id: ItemId) -> Result<()> {
    let exists = stores
        .items
        .exists(item_id)
        .await
        .map_err(AppError::StoreError)?;
    if !exists {
        return Err(AppError::ItemNotFound);
    }

    stores
        .items
        .delete(item_id)
        .await
        .map_err(AppError::StoreError)
}

/// コメントを投稿する
///
/// ビジネスルール：投稿者がそのアイテムに WAITING でも REJECTED でもない
/// 予約を持ち、かつその開始時刻が未来でないこと。
pub async fn add_comment(
    stores: &Stores,
    author_id: UserId,
    item_id: ItemId,
    text: String,
) -> Result<CommentDetails> {
    let author = stores
        .users
        .find_by_id(author_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::UserNotFound)?;

    let item_exists = stores
        .items
        .exists(item_id)
        .await
        .map_err(AppError::StoreError)?;
    if !item_exists {
        return Err(AppError::ItemNotFound);
    }

    if text.trim().is_empty() {
        return Err(AppError::InvalidParameter(
            "Comment text must not be blank".to_string(),
        ));
    }

    let now = Utc::now();
    let bookings = stores
        .bookings
        .find_by_item_and_booker(item_id, author_id)
        .await
        .map_err(AppError::StoreError)?;

    let eligible = bookings.iter().any(|b| {
        b.status != BookingStatus::Waiting
            && b.status != BookingStatus::Rejected
            && b.start <= now
    });
    if !eligible {
        return Err(AppError::InvalidParameter(
            "User has no started booking for this item".to_string(),
        ));
    }

    let comment = Comment {
        comment_id: CommentId::new(),
        text,
        item_id,
        author_id,
        created_at: now,
    };
    let comment = stores
        .comments
        .insert(comment)
        .await
        .map_err(AppError::StoreError)?;

    Ok(CommentDetails {
        comment_id: comment.comment_id,
        text: comment.text,
        author_name: author.name,
        created_at: comment.created_at,
    })
}

/// アイテムのコメント一覧を投稿者名付きで取得する
async fn load_comments(stores: &Stores, item_id: ItemId) -> Result<Vec<CommentDetails>> {
    let comments = stores
        .comments
        .find_by_item(item_id)
        .await
        .map_err(AppError::StoreError)?;

    let mut details = Vec::with_capacity(comments.len());
    for comment in comments {
        let author_name = stores
            .users
            .find_by_id(comment.author_id)
            .await
            .map_err(AppError::StoreError)?
            .map(|u| u.name)
            .unwrap_or_default();

        details.push(CommentDetails {
            comment_id: comment.comment_id,
            text: comment.text,
            author_name,
            created_at: comment.created_at,
        });
    }

    Ok(details)
}
