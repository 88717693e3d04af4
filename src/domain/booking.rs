use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{BookingId, ItemId, UserId};
use super::{DecisionError, StateTokenError, WindowError};

/// 予約ステータス
///
/// 到達可能な状態は3つのみ。CANCELED は存在しない。
/// 遷移は WAITING → APPROVED / WAITING → REJECTED のみで、
/// APPROVED と REJECTED は終端状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// オーナーの決定待ち
    Waiting,
    /// オーナーが承認した
    Approved,
    /// オーナーが却下した
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "waiting",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(BookingStatus::Waiting),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 予約 - あるアイテムに対するあるユーザーの時間枠つき予約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// 純粋関数：予約ウィンドウを検証する
///
/// 不変条件：
/// - start と end はともに必須
/// - start は end より厳密に前（start == end も不正）
///
/// 検証に通った場合は確定した (start, end) を返す。
pub fn validate_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), WindowError> {
    let start = start.ok_or(WindowError::Missing)?;
    let end = end.ok_or(WindowError::Missing)?;

    if start >= end {
        return Err(WindowError::StartNotBeforeEnd);
    }

    Ok((start, end))
}

/// 純粋関数：予約を新規作成する
///
/// ステータスは必ず WAITING で始まる。
/// ウィンドウ検証は済んでいる前提（`validate_window`を先に通すこと）。
pub fn create_booking(
    item_id: ItemId,
    booker_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> Booking {
    Booking {
        booking_id: BookingId::new(),
        item_id,
        booker_id,
        start,
        end,
        status: BookingStatus::Waiting,
        created_at,
    }
}

/// 純粋関数：予約の承認・却下を決定する
///
/// WAITING からのみ遷移可能。確定済みの予約は再決定できない。
pub fn decide(status: BookingStatus, approve: bool) -> Result<BookingStatus, DecisionError> {
    match status {
        BookingStatus::Waiting if approve => Ok(BookingStatus::Approved),
        BookingStatus::Waiting => Ok(BookingStatus::Rejected),
        other => Err(DecisionError::NotWaiting(other)),
    }
}

// ============================================================================
// 状態トークンと述語クエリの分類
// ============================================================================

/// 一覧取得の状態トークン
///
/// 大文字小文字を区別しない。未知のトークンは入力をそのまま含む
/// エラーメッセージで拒否する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl std::str::FromStr for StateFilter {
    type Err = StateTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(StateFilter::All),
            "CURRENT" => Ok(StateFilter::Current),
            "PAST" => Ok(StateFilter::Past),
            "FUTURE" => Ok(StateFilter::Future),
            "WAITING" => Ok(StateFilter::Waiting),
            "REJECTED" => Ok(StateFilter::Rejected),
            _ => Err(StateTokenError::Unknown(s.to_string())),
        }
    }
}

/// 予約ストアに対する述語クエリ
///
/// CURRENT の両端には同一の `now` を使う。呼び出しごとに1回だけ
/// サンプリングした時刻を渡すことで、境界をまたぐ不整合を防ぐ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPredicate {
    /// 全予約
    All,
    /// start < now かつ end > now
    Current(DateTime<Utc>),
    /// end < now
    Past(DateTime<Utc>),
    /// start > now
    Future(DateTime<Utc>),
    /// ステータス一致
    Status(BookingStatus),
}

impl StateFilter {
    /// 状態トークンを述語クエリへ分類する
    pub fn classify(self, now: DateTime<Utc>) -> BookingPredicate {
        match self {
            StateFilter::All => BookingPredicate::All,
            StateFilter::Current => BookingPredicate::Current(now),
            StateFilter::Past => BookingPredicate::Past(now),
            StateFilter::Future => BookingPredicate::Future(now),
            StateFilter::Waiting => BookingPredicate::Status(BookingStatus::Waiting),
            StateFilter::Rejected => BookingPredicate::Status(BookingStatus::Rejected),
        }
    }
}

impl BookingPredicate {
    /// 述語を1件の予約に適用する
    ///
    /// インメモリ実装のフィルタリングに使用される。SQL実装は同じ条件を
    /// WHERE 句として表現する。
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            BookingPredicate::All => true,
            BookingPredicate::Current(now) => booking.start < *now && booking.end > *now,
            BookingPredicate::Past(now) => booking.end < *now,
            BookingPredicate::Future(now) => booking.start > *now,
            BookingPredicate::Status(status) => booking.status == *status,
        }
    }
}

/// 一覧取得の主体（予約者として、またはオーナーとして）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingSubject {
    /// 自分が予約者である予約
    Booker(UserId),
    /// 自分のアイテムに対する予約
    Owner(UserId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn window(offset_hours: i64, len_hours: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now() + Duration::hours(offset_hours);
        (start, start + Duration::hours(len_hours))
    }

    // validate_window のテスト
    #[test]
    fn test_validate_window_accepts_ordered_timestamps() {
        let (start, end) = window(1, 2);
        let result = validate_window(Some(start), Some(end));
        assert_eq!(result, Ok((start, end)));
    }

    #[test]
    fn test_validate_window_rejects_missing_timestamps() {
        let (start, end) = window(1, 2);
        assert_eq!(validate_window(None, Some(end)), Err(WindowError::Missing));
        assert_eq!(
            validate_window(Some(start), None),
            Err(WindowError::Missing)
        );
        assert_eq!(validate_window(None, None), Err(WindowError::Missing));
    }

    #[test]
    fn test_validate_window_rejects_start_after_end() {
        let (start, end) = window(1, 2);
        assert_eq!(
            validate_window(Some(end), Some(start)),
            Err(WindowError::StartNotBeforeEnd)
        );
    }

    #[test]
    fn test_validate_window_rejects_equal_timestamps() {
        let (start, _) = window(1, 2);
        assert_eq!(
            validate_window(Some(start), Some(start)),
            Err(WindowError::StartNotBeforeEnd)
        );
    }

    // create_booking のテスト
    #[test]
    fn test_create_booking_starts_waiting() {
        let (start, end) = window(1, 2);
        let booking = create_booking(ItemId::new(), UserId::new(), start, end, Utc::now());
        assert_eq!(booking.status, BookingStatus::Waiting);
        assert_eq!(booking.start, start);
        assert_eq!(booking.end, end);
    }

    // decide のテスト
    #[test]
    fn test_decide_waiting_to_approved() {
        assert_eq!(
            decide(BookingStatus::Waiting, true),
            Ok(BookingStatus::Approved)
        );
    }

    #[test]
    fn test_decide_waiting_to_rejected() {
        assert_eq!(
            decide(BookingStatus::Waiting, false),
            Ok(BookingStatus::Rejected)
        );
    }

    #[test]
    fn test_decide_fails_on_terminal_states() {
        assert_eq!(
            decide(BookingStatus::Approved, true),
            Err(DecisionError::NotWaiting(BookingStatus::Approved))
        );
        assert_eq!(
            decide(BookingStatus::Approved, false),
            Err(DecisionError::NotWaiting(BookingStatus::Approved))
        );
        assert_eq!(
            decide(BookingStatus::Rejected, true),
            Err(DecisionError::NotWaiting(BookingStatus::Rejected))
        );
    }

    // StateFilter のテスト
    #[test]
    fn test_state_filter_parses_case_insensitively() {
        assert_eq!("ALL".parse::<StateFilter>().unwrap(), StateFilter::All);
        assert_eq!(
            "current".parse::<StateFilter>().unwrap(),
            StateFilter::Current
        );
        assert_eq!("Past".parse::<StateFilter>().unwrap(), StateFilter::Past);
        assert_eq!(
            "fUtUrE".parse::<StateFilter>().unwrap(),
            StateFilter::Future
        );
        assert_eq!(
            "waiting".parse::<StateFilter>().unwrap(),
            StateFilter::Waiting
        );
        assert_eq!(
            "REJECTED".parse::<StateFilter>().unwrap(),
            StateFilter::Rejected
        );
    }

    #[test]
    fn test_state_filter_unknown_token_echoes_input() {
        let err = "BOGUS".parse::<StateFilter>().unwrap_err();
        assert_eq!(err, StateTokenError::Unknown("BOGUS".to_string()));
        assert!(err.to_string().contains("BOGUS"));
    }

    // classify / matches のテスト
    #[test]
    fn test_classify_current_uses_single_now() {
        let now = Utc::now();
        match StateFilter::Current.classify(now) {
            BookingPredicate::Current(sampled) => assert_eq!(sampled, now),
            other => panic!("Expected Current predicate, got {:?}", other),
        }
    }

    #[test]
    fn test_predicates_partition_disjointly_by_time() {
        let now = Utc::now();
        let (start, end) = window(-2, 1); // 過去に開始、過去に終了
        let past = create_booking(ItemId::new(), UserId::new(), start, end, now);

        assert!(BookingPredicate::Past(now).matches(&past));
        assert!(!BookingPredicate::Future(now).matches(&past));
        assert!(!BookingPredicate::Current(now).matches(&past));

        let (start, end) = window(-1, 3); // 現在またぎ
        let current = create_booking(ItemId::new(), UserId::new(), start, end, now);

        assert!(BookingPredicate::Current(now).matches(&current));
        assert!(!BookingPredicate::Past(now).matches(&current));
        assert!(!BookingPredicate::Future(now).matches(&current));

        let (start, end) = window(1, 2); // 未来に開始
        let future = create_booking(ItemId::new(), UserId::new(), start, end, now);

        assert!(BookingPredicate::Future(now).matches(&future));
        assert!(!BookingPredicate::Past(now).matches(&future));
        assert!(!BookingPredicate::Current(now).matches(&future));
    }

    #[test]
    fn test_status_predicate_matches_only_same_status() {
        let (start, end) = window(1, 2);
        let mut booking = create_booking(ItemId::new(), UserId::new(), start, end, Utc::now());

        assert!(BookingPredicate::Status(BookingStatus::Waiting).matches(&booking));
        assert!(!BookingPredicate::Status(BookingStatus::Rejected).matches(&booking));

        booking.status = BookingStatus::Rejected;
        assert!(BookingPredicate::Status(BookingStatus::Rejected).matches(&booking));
        assert!(!BookingPredicate::Status(BookingStatus::Waiting).matches(&booking));
    }
}
