use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::AppError;

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// 識別ヘッダーの欠落・不正はこの層で生まれるため独立した変種を持つ。
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    /// X-Sharer-User-Id ヘッダーがない
    MissingUserHeader,
    /// X-Sharer-User-Id ヘッダーがUUIDとして解釈できない
    InvalidUserHeader,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // 400 Bad Request - 識別ヘッダーの問題
            ApiError::MissingUserHeader => (
                StatusCode::BAD_REQUEST,
                "X-Sharer-User-Id header is required".to_string(),
            ),
            ApiError::InvalidUserHeader => (
                StatusCode::BAD_REQUEST,
                "X-Sharer-User-Id header must be a valid UUID".to_string(),
            ),

            ApiError::App(err) => match err {
                // 404 Not Found - リクエストされたリソースが存在しない
                AppError::UserNotFound
                | AppError::ItemNotFound
                | AppError::BookingNotFound
                | AppError::RequestNotFound => (StatusCode::NOT_FOUND, err.to_string()),

                // 409 Conflict - 一意性違反
                AppError::EmailTaken => (StatusCode::CONFLICT, err.to_string()),

                // 403 Forbidden - 所有・役割違反
                AppError::UnauthorizedActor(_) => (StatusCode::FORBIDDEN, err.to_string()),

                // 400 Bad Request - パラメータ・状態ルール違反
                AppError::InvalidParameter(_)
                | AppError::InvalidWindow(_)
                | AppError::UnsupportedState(_)
                | AppError::InvalidPagination => (StatusCode::BAD_REQUEST, err.to_string()),

                // 500 Internal Server Error - システム障害
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                AppError::StoreError(ref e) => {
                    tracing::error!("Store error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred".to_string(),
                    )
                }
            },
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
