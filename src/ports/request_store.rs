use crate::domain::entities::ItemRequest;
use crate::domain::value_objects::{PageParams, RequestId, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテムリクエストストアポート
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// リクエストを保存する（新規作成）
    async fn insert(&self, request: ItemRequest) -> Result<ItemRequest>;

    /// IDでリクエストを取得する
    async fn find_by_id(&self, request_id: RequestId) -> Result<Option<ItemRequest>>;

    /// 依頼者の全リクエストを取得する（作成日時降順）
    async fn find_by_requestor(&self, requestor_id: UserId) -> Result<Vec<ItemRequest>>;

    /// 依頼者以外の全リクエストを取得する（作成日時降順、ページング付き）
    async fn find_all_except(
        &self,
        requestor_id: UserId,
        page: PageParams,
    ) -> Result<Vec<ItemRequest>>;
}
