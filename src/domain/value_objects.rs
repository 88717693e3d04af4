use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ユーザーID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// アイテムID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// 予約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

/// アイテムリクエストID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// コメントID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

/// ページングエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// from または size が負
    Negative,
    /// size が 0
    ZeroSize,
}

/// ページング指定
///
/// 不変条件：
/// - from と size がともに指定されたときのみ有効。どちらか欠けると無制限。
/// - 負の値は拒否。size = 0 も拒否（ページ番号が計算できない）。
/// - ページ番号は floor(from / size)、オフセットはページ番号 × size。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    offset: u64,
    limit: Option<u64>,
}

impl PageParams {
    /// 無制限（全件取得）
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// クエリパラメータからページングを構築する
    ///
    /// # エラー
    /// from または size が負のとき `PaginationError::Negative`、
    /// size が 0 のとき `PaginationError::ZeroSize` を返す。
    pub fn from_query(from: Option<i64>, size: Option<i64>) -> Result<Self, PaginationError> {
        let (from, size) = match (from, size) {
            (Some(from), Some(size)) => (from, size),
            _ => return Ok(Self::unbounded()),
        };

        if from < 0 || size < 0 {
            return Err(PaginationError::Negative);
        }
        if size == 0 {
            return Err(PaginationError::ZeroSize);
        }

        let page = (from / size) as u64;
        let size = size as u64;

        Ok(Self {
            offset: page * size,
            limit: Some(size),
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// インメモリ実装のためのスライスヘルパー
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset as usize);
        match self.limit {
            Some(limit) => iter.take(limit as usize).collect(),
            None => iter.collect(),
        }
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_creation() {
        let id1 = UserId::new();
        let id2 = UserId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_booking_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = BookingId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_page_params_unbounded_when_either_missing() {
        assert_eq!(
            PageParams::from_query(None, None).unwrap(),
            PageParams::unbounded()
        );
        assert_eq!(
            PageParams::from_query(Some(3), None).unwrap(),
            PageParams::unbounded()
        );
        assert_eq!(
            PageParams::from_query(None, Some(10)).unwrap(),
            PageParams::unbounded()
        );
    }

    #[test]
    fn test_page_params_rejects_negative() {
        assert_eq!(
            PageParams::from_query(Some(-1), Some(10)),
            Err(PaginationError::Negative)
        );
        assert_eq!(
            PageParams::from_query(Some(0), Some(-5)),
            Err(PaginationError::Negative)
        );
    }

    #[test]
    fn test_page_params_rejects_zero_size() {
        assert_eq!(
            PageParams::from_query(Some(0), Some(0)),
            Err(PaginationError::ZeroSize)
        );
    }

    #[test]
    fn test_page_params_floors_page_index() {
        // from=7, size=3 → ページ2 → オフセット6
        let page = PageParams::from_query(Some(7), Some(3)).unwrap();
        assert_eq!(page.offset(), 6);
        assert_eq!(page.limit(), Some(3));
    }

    #[test]
    fn test_page_params_slice() {
        let page = PageParams::from_query(Some(2), Some(2)).unwrap();
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(page.slice(items), vec![3, 4]);

        let all = PageParams::unbounded().slice(vec![1, 2, 3]);
        assert_eq!(all, vec![1, 2, 3]);
    }
}
