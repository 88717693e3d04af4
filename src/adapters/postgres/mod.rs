pub mod booking_store;
pub mod comment_store;
pub mod item_store;
pub mod request_store;
pub mod user_store;

pub use booking_store::BookingStore as PostgresBookingStore;
pub use comment_store::CommentStore as PostgresCommentStore;
pub use item_store::ItemStore as PostgresItemStore;
pub use request_store::RequestStore as PostgresRequestStore;
pub use user_store::UserStore as PostgresUserStore;
