mod bookings;
mod errors;
mod items;
mod requests;
mod users;

use std::sync::Arc;

use crate::ports::{BookingStore, CommentStore, ItemStore, RequestStore, UserStore};

pub use bookings::{
    CreateBooking, create_booking, decide_booking, delete_booking, get_booking_for_participant,
    list_for_booker, list_for_owner,
};
pub use errors::{AppError, Result};
pub use items::{
    BookingBrief, CommentDetails, CreateItem, ItemDetails, PatchItem, add_comment, create_item,
    delete_item, get_item, list_items_for_owner, patch_item, search_items,
};
pub use requests::{RequestDetails, add_request, get_request, list_all_requests, list_own_requests};
pub use users::{PatchUser, create_user, delete_user, get_user, list_users, update_user};

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは各操作の自由関数に持たせる。
/// すべての依存が引数として明示的に渡されるため、テストでは
/// インメモリ実装を差し込むだけでよい。
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub comments: Arc<dyn CommentStore>,
    pub requests: Arc<dyn RequestStore>,
}
