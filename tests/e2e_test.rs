use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use shareit::adapters::memory::MemoryStore;
use shareit::api::handlers::AppState;
use shareit::api::router::create_router;
use shareit::api::types::*;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーションセットアップ
///
/// インメモリストアと実際のAPIルーターを使用します。
fn setup_app() -> axum::Router {
    let stores = Arc::new(MemoryStore::new()).into_stores();
    let app_state = Arc::new(AppState { stores });
    create_router(app_state)
}

/// JSONボディ付きのリクエストを送る
async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    sharer: Option<Uuid>,
    body: serde_json::Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user_id) = sharer {
        builder = builder.header("X-Sharer-User-Id", user_id.to_string());
    }
    app.clone()
        .oneshot(
            builder
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// ボディなしのリクエストを送る
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    sharer: Option<Uuid>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = sharer {
        builder = builder.header("X-Sharer-User-Id", user_id.to_string());
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn create_user(app: &axum::Router, name: &str, email: &str) -> UserResponse {
    let response = send_json(
        app,
        "POST",
        "/users",
        None,
        json!({ "name": name, "email": email }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

async fn create_item(app: &axum::Router, owner: Uuid, name: &str) -> ItemResponse {
    let response = send_json(
        app,
        "POST",
        "/items",
        Some(owner),
        json!({
            "name": name,
            "description": format!("{} description", name),
            "available": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

// ============================================================================
// E2Eテスト: 予約のフルフロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_booking_flow() {
    // Arrange: オーナーA、予約者B、アイテムI
    let app = setup_app();
    let user_a = create_user(&app, "Alice", "alice@example.com").await;
    let user_b = create_user(&app, "Bob", "bob@example.com").await;
    let item = create_item(&app, user_a.id, "drill").await;

    let start = Utc::now() + Duration::hours(1);
    let end = start + Duration::hours(1);

    // Step 1: Bが予約を作成（POST /bookings）→ WAITING
    let response = send_json(
        &app,
        "POST",
        "/bookings",
        Some(user_b.id),
        json!({ "itemId": item.id, "start": start, "end": end }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let booking: BookingResponse = read_json(response).await;
    assert_eq!(booking.status, "WAITING");
    assert_eq!(booking.item.id, item.id);
    assert_eq!(booking.booker.id, user_b.id);

    // Step 2: Aが承認（PATCH /bookings/:id?approved=true）→ APPROVED
    let response = send(
        &app,
        "PATCH",
        &format!("/bookings/{}?approved=true", booking.id),
        Some(user_a.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let approved: BookingResponse = read_json(response).await;
    assert_eq!(approved.status, "APPROVED");

    // Step 3: Bが再承認を試みる → 確定済みなのでパラメータエラー（400）
    let response = send(
        &app,
        "PATCH",
        &format!("/bookings/{}?approved=true", booking.id),
        Some(user_b.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Aによる再決定も確定済みなので失敗する
    let response = send(
        &app,
        "PATCH",
        &format!("/bookings/{}?approved=false", booking.id),
        Some(user_a.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Step 4: Aのオーナー一覧（GET /bookings/owner?state=ALL）にこの予約だけが載る
    let response = send(
        &app,
        "GET",
        "/bookings/owner?state=ALL",
        Some(user_a.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let bookings: Vec<BookingResponse> = read_json(response).await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, booking.id);
    assert_eq!(bookings[0].status, "APPROVED");
}

// ============================================================================
// E2Eテスト: エラーケース
// ============================================================================

#[tokio::test]
async fn test_e2e_booking_window_rejected() {
    // Arrange
    let app = setup_app();
    let user_a = create_user(&app, "Alice", "alice@example.com").await;
    let user_b = create_user(&app, "Bob", "bob@example.com").await;
    let item = create_item(&app, user_a.id, "drill").await;

    let t = Utc::now() + Duration::hours(1);

    // Act: start == end
    let response = send_json(
        &app,
        "POST",
        "/bookings",
        Some(user_b.id),
        json!({ "itemId": item.id, "start": t, "end": t }),
    )
    .await;

    // Assert: 予約は作られない
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/bookings?state=ALL", Some(user_b.id)).await;
    let bookings: Vec<BookingResponse> = read_json(response).await;
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn test_e2e_owner_cannot_book_own_item() {
    // Arrange
    let app = setup_app();
    let user_a = create_user(&app, "Alice", "alice@example.com").await;
    let item = create_item(&app, user_a.id, "drill").await;

    let start = Utc::now() + Duration::hours(1);

    // Act
    let response = send_json(
        &app,
        "POST",
        "/bookings",
        Some(user_a.id),
        json!({ "itemId": item.id, "start": start, "end": start + Duration::hours(1) }),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_e2e_missing_sharer_header() {
    // Arrange
    let app = setup_app();

    // Act: 識別ヘッダーなしで予約一覧を要求する
    let response = send(&app, "GET", "/bookings?state=ALL", None).await;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = read_json(response).await;
    assert!(error.error.contains("X-Sharer-User-Id"));
}

#[tokio::test]
async fn test_e2e_unknown_state_token() {
    // Arrange
    let app = setup_app();
    let user = create_user(&app, "Alice", "alice@example.com").await;

    // Act
    let response = send(&app, "GET", "/bookings?state=SOMEDAY", Some(user.id)).await;

    // Assert: トークンがメッセージにそのまま含まれる
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "Unknown state: SOMEDAY");
}

#[tokio::test]
async fn test_e2e_duplicate_email_conflict() {
    // Arrange
    let app = setup_app();
    create_user(&app, "Alice", "alice@example.com").await;

    // Act: 同じメールアドレスで再登録
    let response = send_json(
        &app,
        "POST",
        "/users",
        None,
        json!({ "name": "Another", "email": "alice@example.com" }),
    )
    .await;

    // Assert
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_e2e_get_nonexistent_user() {
    // Arrange
    let app = setup_app();

    // Act
    let response = send(&app, "GET", &format!("/users/{}", Uuid::new_v4()), None).await;

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// E2Eテスト: アイテムとコメント
// ============================================================================

#[tokio::test]
async fn test_e2e_item_details_bookings_only_for_owner() {
    // Arrange: 開始済みの承認予約を作る
    let app = setup_app();
    let user_a = create_user(&app, "Alice", "alice@example.com").await;
    let user_b = create_user(&app, "Bob", "bob@example.com").await;
    let item = create_item(&app, user_a.id, "drill").await;

    let now = Utc::now();
    let response = send_json(
        &app,
        "POST",
        "/bookings",
        Some(user_b.id),
        json!({
            "itemId": item.id,
            "start": now - Duration::hours(2),
            "end": now - Duration::hours(1),
        }),
    )
    .await;
    let booking: BookingResponse = read_json(response).await;

    let response = send(
        &app,
        "PATCH",
        &format!("/bookings/{}?approved=true", booking.id),
        Some(user_a.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // オーナーには lastBooking が見える
    let response = send(&app, "GET", &format!("/items/{}", item.id), Some(user_a.id)).await;
    let details: ItemDetailsResponse = read_json(response).await;
    assert!(details.last_booking.is_some());
    assert_eq!(details.last_booking.unwrap().id, booking.id);

    // 予約者には見えない
    let response = send(&app, "GET", &format!("/items/{}", item.id), Some(user_b.id)).await;
    let details: ItemDetailsResponse = read_json(response).await;
    assert!(details.last_booking.is_none());
    assert!(details.next_booking.is_none());
}

#[tokio::test]
async fn test_e2e_comment_flow() {
    // Arrange: 開始済みの承認予約を持つ予約者
    let app = setup_app();
    let user_a = create_user(&app, "Alice", "alice@example.com").await;
    let user_b = create_user(&app, "Bob", "bob@example.com").await;
    let item = create_item(&app, user_a.id, "drill").await;

    let now = Utc::now();
    let response = send_json(
        &app,
        "POST",
        "/bookings",
        Some(user_b.id),
        json!({
            "itemId": item.id,
            "start": now - Duration::hours(2),
            "end": now - Duration::hours(1),
        }),
    )
    .await;
    let booking: BookingResponse = read_json(response).await;
    send(
        &app,
        "PATCH",
        &format!("/bookings/{}?approved=true", booking.id),
        Some(user_a.id),
    )
    .await;

    // Act: コメント投稿
    let response = send_json(
        &app,
        "POST",
        &format!("/items/{}/comment", item.id),
        Some(user_b.id),
        json!({ "text": "works great" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let comment: CommentResponse = read_json(response).await;
    assert_eq!(comment.text, "works great");
    assert_eq!(comment.author_name, "Bob");

    // アイテム詳細にコメントが載る
    let response = send(&app, "GET", &format!("/items/{}", item.id), Some(user_b.id)).await;
    let details: ItemDetailsResponse = read_json(response).await;
    assert_eq!(details.comments.len(), 1);
    assert_eq!(details.comments[0].text, "works great");

    // 予約のないオーナーはコメントできない
    let response = send_json(
        &app,
        "POST",
        &format!("/items/{}/comment", item.id),
        Some(user_a.id),
        json!({ "text": "my own item" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_search_items() {
    // Arrange
    let app = setup_app();
    let user_a = create_user(&app, "Alice", "alice@example.com").await;
    create_item(&app, user_a.id, "power drill").await;
    create_item(&app, user_a.id, "ladder").await;

    // Act: 検索は名前と説明に対して大文字小文字を無視する
    let response = send(&app, "GET", "/items/search?text=DRILL", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let items: Vec<ItemResponse> = read_json(response).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "power drill");

    // 空白のみの検索は空の結果
    let response = send(&app, "GET", "/items/search?text=%20", None).await;
    let items: Vec<ItemResponse> = read_json(response).await;
    assert!(items.is_empty());
}

// ============================================================================
// E2Eテスト: アイテムリクエスト
// ============================================================================

#[tokio::test]
async fn test_e2e_request_flow() {
    // Arrange
    let app = setup_app();
    let requester = create_user(&app, "Alice", "alice@example.com").await;
    let responder = create_user(&app, "Bob", "bob@example.com").await;

    // Step 1: リクエスト投稿
    let response = send_json(
        &app,
        "POST",
        "/requests",
        Some(requester.id),
        json!({ "description": "need a drill" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let request: RequestResponse = read_json(response).await;
    assert!(request.items.is_empty());

    // Step 2: 別ユーザーがリクエストに応えてアイテムを出品
    let response = send_json(
        &app,
        "POST",
        "/items",
        Some(responder.id),
        json!({
            "name": "drill",
            "description": "a drill",
            "available": true,
            "requestId": request.id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let item: ItemResponse = read_json(response).await;

    // Step 3: リクエスト詳細に出品アイテムが載る
    let response = send(
        &app,
        "GET",
        &format!("/requests/{}", request.id),
        Some(requester.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let details: RequestResponse = read_json(response).await;
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.items[0].id, item.id);

    // Step 4: 自分のリクエスト一覧には載り、他人の全件一覧からは除外される
    let response = send(&app, "GET", "/requests", Some(requester.id)).await;
    let own: Vec<RequestResponse> = read_json(response).await;
    assert_eq!(own.len(), 1);

    let response = send(&app, "GET", "/requests/all", Some(requester.id)).await;
    let others: Vec<RequestResponse> = read_json(response).await;
    assert!(others.is_empty());

    let response = send(&app, "GET", "/requests/all", Some(responder.id)).await;
    let others: Vec<RequestResponse> = read_json(response).await;
    assert_eq!(others.len(), 1);
}
