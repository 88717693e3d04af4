pub mod booking_store;
pub mod comment_store;
pub mod item_store;
pub mod request_store;
pub mod user_store;

pub use booking_store::{BookingStore, BookingView};
pub use comment_store::CommentStore;
pub use item_store::ItemStore;
pub use request_store::RequestStore;
pub use user_store::UserStore;
