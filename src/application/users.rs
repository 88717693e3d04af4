use crate::domain::entities::User;
use crate::domain::value_objects::UserId;

use super::Stores;
use super::errors::{AppError, Result};

/// ユーザー部分更新コマンド（None のフィールドは変更しない）
#[derive(Debug, Clone, Default)]
pub struct PatchUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// ユーザーを登録する
///
/// メールアドレスの一意性をストアに問い合わせてから保存する。
pub async fn create_user(stores: &Stores, name: String, email: String) -> Result<User> {
    let taken = stores
        .users
        .email_taken(&email, None)
        .await
        .map_err(AppError::StoreError)?;
    if taken {
        return Err(AppError::EmailTaken);
    }

    let user = User {
        user_id: UserId::new(),
        name,
        email,
    };

    stores.users.insert(user).await.map_err(AppError::StoreError)
}

/// IDでユーザーを取得する
pub async fn get_user(stores: &Stores, user_id: UserId) -> Result<User> {
    stores
        .users
        .find_by_id(user_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::UserNotFound)
}

/// 全ユーザーを取得する
pub async fn list_users(stores: &Stores) -> Result<Vec<User>> {
    stores.users.find_all().await.map_err(AppError::StoreError)
}

/// ユーザーを部分更新する
///
/// メールアドレスを変える場合は一意性を再確認する（自分自身は除外）。
pub async fn update_user(stores: &Stores, user_id: UserId, patch: PatchUser) -> Result<User> {
    let existing = stores
        .users
        .find_by_id(user_id)
        .await
        .map_err(AppError::StoreError)?
        .ok_or(AppError::UserNotFound)?;

    if let Some(email) = &patch.email {
        let taken = stores
            .users
            .email_taken(email, Some(user_id))
            .await
            .map_err(AppError::StoreError)?;
        if taken {
            return Err(AppError::EmailTaken);
        }
    }

    let updated = User {
        user_id,
        name: patch.name.unwrap_or(existing.name),
        email: patch.email.unwrap_or(existing.email),
    };

    stores
        .users
        .update(updated)
        .await
        .map_err(AppError::StoreError)
}

/// ユーザーを削除する
///
/// 無条件削除（カスケードの業務チェックは行わない）。存在確認のみ先行する。
pub async fn delete_user(stores: &Stores, user_id: UserId) -> Result<()> {
    let exists = stores
        .users
        .exists(user_id)
        .await
        .map_err(AppError::StoreError)?;
    if !exists {
        return Err(AppError::UserNotFound);
    }

    stores
        .users
        .delete(user_id)
        .await
        .map_err(AppError::StoreError)
}
