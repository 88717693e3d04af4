use crate::domain::entities::Comment;
use crate::domain::value_objects::ItemId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// コメントストアポート
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// コメントを保存する（作成後は不変）
    async fn insert(&self, comment: Comment) -> Result<Comment>;

    /// アイテムの全コメントを取得する（作成日時降順）
    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>>;
}
