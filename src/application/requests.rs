use chrono::Utc;

use crate::domain::entities::{Item, ItemRequest};
use crate::domain::value_objects::{PageParams, RequestId, UserId};

use super::Stores;
use super::errors::{AppError, Result};

/// アイテムリクエスト詳細
///
/// `items` はこのリクエストを参照して出品されたアイテムの導出リスト。
/// 読み取り時に毎回計算される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDetails {
    pub request: ItemRequest,
    pub items: Vec<Item>,
}

/// アイテムリクエストを投稿する
pub async fn add_request(
    stores: &Stores,
    requestor_id: UserId,
    description: String,
) -> Result<RequestDetails> {
    check_user_exists(stores, requestor_id).await?;

    if description.trim().is_empty() {
        return Err(AppError::InvalidParameter(
            "Request description must not be blank".to_string(),
        ));
    }

    let request = ItemRequest {
        request_id: RequestId::new(),
        description,
        requestor_id,
        created_at: Utc::now(),
    };
    let request = stores
        .requests
        .insert(request)
        .await
        .map_err(AppError::StoreError)?;

    // 作成直後は参照アイテムなし
    Ok(RequestDetails {
        request,
        items: Vec::new(),
    })
}

/// 自分のリクエスト一覧を取得する（新しい順）
pub async fn list_own_requests(stores: &Stores, requestor_id: UserId) -> Result<Vec<RequestDetails>> {
    check_user_exists(stores, requestor_id).await?;

    let requests = stores
        .requests
        .find_by_requestor(requestor_id)
        .await
        .map_err(AppError::StoreError)?;

    attach_items(stores, requests).await
}

/// IDでリクエストを取得する（存在するユーザーなら誰でも閲覧可能）
pub async fn get_request(
    stores: &Stores,
    requester_id: UserId,
    request_id: RequestId,
) -> Result<RequestDetails> {
    check_user_exists(stores, requester_id).await?;

    let request = stores
        .requests
        .find_by_id(request_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::RequestNotFound)?;

    let items = stores
        .items
        .find_by_request(request.request_id)
        .await
        .map_err(AppError::StoreError)?;

    Ok(RequestDetails { request, items })
}

/// 他ユーザーの全リクエストを取得する（新しい順、ページング付き）
pub async fn list_all_requests(
    stores: &Stores,
    requester_id: UserId,
    from: Option<i64>,
    size: Option<i64>,
) -> Result<Vec<RequestDetails>> {
    check_user_exists(stores, requester_id).await?;

    let page = PageParams::from_query(from, size)?;
    let requests = stores
        .requests
        .find_all_except(requester_id, page)
        .await
        .map_err(AppError::StoreError)?;

    attach_items(stores, requests).await
}

async fn check_user_exists(stores: &Stores, user_id: UserId) -> Result<()> {
    let exists = stores
        .users
        .exists(user_id)
        .await
        .map_err(AppError::StoreError)?;
    if !exists {
        return Err(AppError::UserNotFound);
    }
    Ok(())
}

/// 各リクエストに導出アイテムリストを付与する
async fn attach_items(stores: &Stores, requests: Vec<ItemRequest>) -> Result<Vec<RequestDetails>> {
    let mut details = Vec::with_capacity(requests.len());
    for request in requests {
        let items = stores
            .items
            .find_by_request(request.request_id)
            .await
            .map_err(AppError::StoreError)?;
        details.push(RequestDetails { request, items });
    }
    Ok(details)
}
