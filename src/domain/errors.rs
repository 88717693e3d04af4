use thiserror::Error;

use super::booking::BookingStatus;

/// 予約ウィンドウのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// start または end が未指定
    #[error("Booking window requires both start and end")]
    Missing,
    /// start が end より厳密に前でない（一致も含む）
    #[error("Booking start must be strictly before end")]
    StartNotBeforeEnd,
}

/// 承認・却下のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// WAITING 以外の予約は再決定できない
    #[error("Booking is not waiting for a decision (status: {0:?})")]
    NotWaiting(BookingStatus),
}

/// 状態トークンのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateTokenError {
    /// 未知のトークン。メッセージには入力をそのまま含める。
    #[error("Unknown state: {0}")]
    Unknown(String),
}
