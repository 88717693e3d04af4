use thiserror::Error;

use crate::domain::{DecisionError, PaginationError, StateTokenError, WindowError};

/// アプリケーション層のエラー
///
/// 真の不在（NotFound）と権限違反（UnauthorizedActor）は別のエラー種別
/// として区別する。両者を not-found に畳み込むことはしない。
#[derive(Debug, Error)]
pub enum AppError {
    /// ユーザーが存在しない
    #[error("User not found")]
    UserNotFound,

    /// アイテムが存在しない
    #[error("Item not found")]
    ItemNotFound,

    /// 予約が存在しない
    #[error("Booking not found")]
    BookingNotFound,

    /// アイテムリクエストが存在しない
    #[error("Item request not found")]
    RequestNotFound,

    /// メールアドレスが既に使われている
    #[error("A user with this email already exists")]
    EmailTaken,

    /// 状態ルール違反（アイテム貸出不可、予約が WAITING でない等）
    #[error("{0}")]
    InvalidParameter(String),

    /// 所有・役割違反
    #[error("{0}")]
    UnauthorizedActor(String),

    /// 予約ウィンドウが不正
    #[error(transparent)]
    InvalidWindow(#[from] WindowError),

    /// 未知の状態トークン
    #[error(transparent)]
    UnsupportedState(#[from] StateTokenError),

    /// ページングパラメータが不正
    #[error("Invalid pagination parameters")]
    InvalidPagination,

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<PaginationError> for AppError {
    fn from(_: PaginationError) -> Self {
        AppError::InvalidPagination
    }
}

impl From<DecisionError> for AppError {
    fn from(err: DecisionError) -> Self {
        AppError::InvalidParameter(err.to_string())
    }
}

/// アプリケーション層の Result 型
pub type Result<T> = std::result::Result<T, AppError>;
