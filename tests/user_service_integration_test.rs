use shareit::adapters::memory::MemoryStore;
use shareit::application::{
    AppError, PatchUser, Stores, create_user, delete_user, get_user, list_users, update_user,
};
use shareit::domain::value_objects::UserId;
use std::sync::Arc;

fn setup_stores() -> Stores {
    Arc::new(MemoryStore::new()).into_stores()
}

// ============================================================================
// 登録とメールアドレスの一意性
// ============================================================================

#[tokio::test]
async fn test_create_user_rejects_duplicate_email() {
    // Arrange
    let stores = setup_stores();
    create_user(&stores, "Alice".to_string(), "alice@example.com".to_string())
        .await
        .unwrap();

    // Act
    let result = create_user(&stores, "Impostor".to_string(), "alice@example.com".to_string()).await;

    // Assert
    assert!(matches!(result, Err(AppError::EmailTaken)));
}

#[tokio::test]
async fn test_update_user_rejects_email_of_another_user() {
    // Arrange
    let stores = setup_stores();
    create_user(&stores, "Alice".to_string(), "alice@example.com".to_string())
        .await
        .unwrap();
    let bob = create_user(&stores, "Bob".to_string(), "bob@example.com".to_string())
        .await
        .unwrap();

    // Act: BobがAliceのメールアドレスに変更しようとする
    let result = update_user(
        &stores,
        bob.user_id,
        PatchUser {
            name: None,
            email: Some("alice@example.com".to_string()),
        },
    )
    .await;

    // Assert: 更新経路でも一意性違反になる
    assert!(matches!(result, Err(AppError::EmailTaken)));

    // Bobのメールアドレスは変わっていない
    let current = get_user(&stores, bob.user_id).await.unwrap();
    assert_eq!(current.email, "bob@example.com");
}

#[tokio::test]
async fn test_update_user_own_email_is_not_a_conflict() {
    // Arrange
    let stores = setup_stores();
    let alice = create_user(&stores, "Alice".to_string(), "alice@example.com".to_string())
        .await
        .unwrap();

    // Act: 自分の現在のメールアドレスをそのまま指定して名前だけ変える
    let updated = update_user(
        &stores,
        alice.user_id,
        PatchUser {
            name: Some("Alice B.".to_string()),
            email: Some("alice@example.com".to_string()),
        },
    )
    .await
    .unwrap();

    // Assert: 一意性チェックは自分自身を除外する
    assert_eq!(updated.name, "Alice B.");
    assert_eq!(updated.email, "alice@example.com");
}

#[tokio::test]
async fn test_update_user_partial_patch() {
    // Arrange
    let stores = setup_stores();
    let alice = create_user(&stores, "Alice".to_string(), "alice@example.com".to_string())
        .await
        .unwrap();

    // Act: メールアドレスのみ変更
    let updated = update_user(
        &stores,
        alice.user_id,
        PatchUser {
            name: None,
            email: Some("alice@new.example.com".to_string()),
        },
    )
    .await
    .unwrap();

    // Assert: 指定しなかったフィールドは保持される
    assert_eq!(updated.name, "Alice");
    assert_eq!(updated.email, "alice@new.example.com");
}

// ============================================================================
// 取得と削除
// ============================================================================

#[tokio::test]
async fn test_get_unknown_user() {
    let stores = setup_stores();

    let result = get_user(&stores, UserId::new()).await;
    assert!(matches!(result, Err(AppError::UserNotFound)));
}

#[tokio::test]
async fn test_delete_user_requires_existence() {
    // Arrange
    let stores = setup_stores();
    let alice = create_user(&stores, "Alice".to_string(), "alice@example.com".to_string())
        .await
        .unwrap();

    // Act: 削除は一度だけ成功する
    delete_user(&stores, alice.user_id).await.unwrap();
    let result = delete_user(&stores, alice.user_id).await;

    // Assert
    assert!(matches!(result, Err(AppError::UserNotFound)));
    assert!(list_users(&stores).await.unwrap().is_empty());
}
