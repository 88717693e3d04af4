use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{CommentId, ItemId, RequestId, UserId};

/// ユーザー - メールアドレスで一意に識別される登録者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// アイテム - 貸し出し可能な物品
///
/// `request_id` はこのアイテムの出品のきっかけになった
/// アイテムリクエストへの弱い参照（所有関係ではない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
    pub request_id: Option<RequestId>,
}

impl Item {
    /// 部分更新：None でないフィールドのみ上書きする
    pub fn merge_patch(
        &self,
        name: Option<String>,
        description: Option<String>,
        available: Option<bool>,
        request_id: Option<RequestId>,
    ) -> Item {
        Item {
            item_id: self.item_id,
            name: name.unwrap_or_else(|| self.name.clone()),
            description: description.unwrap_or_else(|| self.description.clone()),
            available: available.unwrap_or(self.available),
            request_id: request_id.or(self.request_id),
            owner_id: self.owner_id,
        }
    }
}

/// コメント - 完了した予約の後に残せるフィードバック。作成後は不変。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    pub text: String,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// アイテムリクエスト - 出品されていないアイテムへの要望
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub request_id: RequestId,
    pub description: String,
    pub requestor_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item {
            item_id: ItemId::new(),
            name: "drill".to_string(),
            description: "cordless drill".to_string(),
            available: true,
            owner_id: UserId::new(),
            request_id: None,
        }
    }

    #[test]
    fn test_merge_patch_overwrites_only_present_fields() {
        let original = item();
        let patched = original.merge_patch(Some("hammer".to_string()), None, Some(false), None);

        assert_eq!(patched.name, "hammer");
        assert_eq!(patched.description, original.description);
        assert!(!patched.available);
        assert_eq!(patched.item_id, original.item_id);
        assert_eq!(patched.owner_id, original.owner_id);
    }

    #[test]
    fn test_merge_patch_keeps_existing_request_id() {
        let request_id = RequestId::new();
        let mut original = item();
        original.request_id = Some(request_id);

        let patched = original.merge_patch(None, None, None, None);
        assert_eq!(patched.request_id, Some(request_id));
    }
}
