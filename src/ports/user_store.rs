use crate::domain::entities::User;
use crate::domain::value_objects::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーストアポート
///
/// ライフサイクルマネージャーは永続化がインメモリかDBかを知らない。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// ユーザーを保存する（新規作成）
    async fn insert(&self, user: User) -> Result<User>;

    /// ユーザーを更新する（全フィールド上書き）
    async fn update(&self, user: User) -> Result<User>;

    /// IDでユーザーを取得する
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>>;

    /// ユーザーが存在するか確認する
    async fn exists(&self, user_id: UserId) -> Result<bool>;

    /// 全ユーザーを取得する
    async fn find_all(&self) -> Result<Vec<User>>;

    /// メールアドレスが既に使われているか確認する
    ///
    /// プロフィール更新時は自分自身を除外する。
    async fn email_taken(&self, email: &str, exclude: Option<UserId>) -> Result<bool>;

    /// IDでユーザーを削除する
    async fn delete(&self, user_id: UserId) -> Result<()>;
}
