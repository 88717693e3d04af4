use crate::domain::entities::Item;
use crate::domain::value_objects::{ItemId, PageParams, RequestId, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテムストアポート
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// アイテムを保存する（新規作成）
    async fn insert(&self, item: Item) -> Result<Item>;

    /// アイテムを更新する（全フィールド上書き）
    async fn update(&self, item: Item) -> Result<Item>;

    /// IDでアイテムを取得する
    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// アイテムが存在するか確認する
    async fn exists(&self, item_id: ItemId) -> Result<bool>;

    /// オーナーの全アイテムを取得する（ID昇順、ページング付き）
    async fn find_by_owner(&self, owner_id: UserId, page: PageParams) -> Result<Vec<Item>>;

    /// 名前・説明の部分一致でアイテムを検索する
    ///
    /// 大文字小文字を区別せず、貸出可能なアイテムのみ返す。
    async fn search(&self, text: &str, page: PageParams) -> Result<Vec<Item>>;

    /// アイテムリクエストを参照しているアイテムを取得する
    async fn find_by_request(&self, request_id: RequestId) -> Result<Vec<Item>>;

    /// IDでアイテムを削除する
    async fn delete(&self, item_id: ItemId) -> Result<()>;
}
