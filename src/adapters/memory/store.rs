use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::Stores;
use crate::domain::booking::{Booking, BookingPredicate, BookingStatus, BookingSubject};
use crate::domain::entities::{Comment, Item, ItemRequest, User};
use crate::domain::value_objects::{BookingId, CommentId, ItemId, PageParams, RequestId, UserId};
use crate::ports::booking_store::{BookingStore, BookingView, Result as BookingResult};
use crate::ports::comment_store::{CommentStore, Result as CommentResult};
use crate::ports::item_store::{ItemStore, Result as ItemResult};
use crate::ports::request_store::{RequestStore, Result as RequestResult};
use crate::ports::user_store::{Result as UserResult, UserStore};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    items: HashMap<ItemId, Item>,
    bookings: HashMap<BookingId, Booking>,
    comments: HashMap<CommentId, Comment>,
    requests: HashMap<RequestId, ItemRequest>,
}

/// In-memory implementation of every store port
///
/// Backs the test suites and makes the application runnable without a
/// database. All tables live behind a single mutex, so the conditional
/// status transition in `finalize` is atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a `Stores` bundle where every port is served by this instance
    pub fn into_stores(self: Arc<Self>) -> Stores {
        Stores {
            users: self.clone(),
            items: self.clone(),
            bookings: self.clone(),
            comments: self.clone(),
            requests: self,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }

    fn view_of(state: &State, booking: &Booking) -> BookingResult<BookingView> {
        let item = state
            .items
            .get(&booking.item_id)
            .ok_or_else(|| format!("item row missing for booking {:?}", booking.booking_id))?;

        Ok(BookingView {
            booking_id: booking.booking_id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
            item_id: item.item_id,
            item_name: item.name.clone(),
            owner_id: item.owner_id,
            booker_id: booking.booker_id,
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: User) -> UserResult<User> {
        self.lock().users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        self.lock().users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: UserId) -> UserResult<Option<User>> {
        Ok(self.lock().users.get(&user_id).cloned())
    }

    async fn exists(&self, user_id: UserId) -> UserResult<bool> {
        Ok(self.lock().users.contains_key(&user_id))
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let mut users: Vec<User> = self.lock().users.values().cloned().collect();
        users.sort_by(|a, b| a.user_id.value().cmp(&b.user_id.value()));
        Ok(users)
    }

    async fn email_taken(&self, email: &str, exclude: Option<UserId>) -> UserResult<bool> {
        Ok(self
            .lock()
            .users
            .values()
            .any(|u| u.email == email && Some(u.user_id) != exclude))
    }

    async fn delete(&self, user_id: UserId) -> UserResult<()> {
        // Mirrors the schema cascade: the user's items (with their bookings
        // and comments), own bookings and comments, and requests all go;
        // items answering a removed request keep existing with the
        // reference cleared.
        let mut state = self.lock();
        state.users.remove(&user_id);

        let owned: Vec<ItemId> = state
            .items
            .values()
            .filter(|i| i.owner_id == user_id)
            .map(|i| i.item_id)
            .collect();
        state.items.retain(|_, i| i.owner_id != user_id);
        state
            .bookings
            .retain(|_, b| b.booker_id != user_id && !owned.contains(&b.item_id));
        state
            .comments
            .retain(|_, c| c.author_id != user_id && !owned.contains(&c.item_id));

        let removed_requests: Vec<RequestId> = state
            .requests
            .values()
            .filter(|r| r.requestor_id == user_id)
            .map(|r| r.request_id)
            .collect();
        state.requests.retain(|_, r| r.requestor_id != user_id);
        for item in state.items.values_mut() {
            if let Some(request_id) = item.request_id {
                if removed_requests.contains(&request_id) {
                    item.request_id = None;
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn insert(&self, item: Item) -> ItemResult<Item> {
        self.lock().items.insert(item.item_id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: Item) -> ItemResult<Item> {
        self.lock().items.insert(item.item_id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, item_id: ItemId) -> ItemResult<Option<Item>> {
        Ok(self.lock().items.get(&item_id).cloned())
    }

    async fn exists(&self, item_id: ItemId) -> ItemResult<bool> {
        Ok(self.lock().items.contains_key(&item_id))
    }

    async fn find_by_owner(&self, owner_id: UserId, page: PageParams) -> ItemResult<Vec<Item>> {
        let mut items: Vec<Item> = self
            .lock()
            .items
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.item_id.value().cmp(&b.item_id.value()));
        Ok(page.slice(items))
    }

    async fn search(&self, text: &str, page: PageParams) -> ItemResult<Vec<Item>> {
        let needle = text.to_lowercase();
        let mut items: Vec<Item> = self
            .lock()
            .items
            .values()
            .filter(|i| {
                i.available
                    && (i.name.to_lowercase().contains(&needle)
                        || i.description.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| a.item_id.value().cmp(&b.item_id.value()));
        Ok(page.slice(items))
    }

    async fn find_by_request(&self, request_id: RequestId) -> ItemResult<Vec<Item>> {
        let mut items: Vec<Item> = self
            .lock()
            .items
            .values()
            .filter(|i| i.request_id == Some(request_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.item_id.value().cmp(&b.item_id.value()));
        Ok(items)
    }

    async fn delete(&self, item_id: ItemId) -> ItemResult<()> {
        // Mirrors the schema cascade: bookings and comments on the item
        // are removed with it, so no view join is left dangling.
        let mut state = self.lock();
        state.items.remove(&item_id);
        state.bookings.retain(|_, b| b.item_id != item_id);
        state.comments.retain(|_, c| c.item_id != item_id);
        Ok(())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, booking: Booking) -> BookingResult<Booking> {
        self.lock()
            .bookings
            .insert(booking.booking_id, booking.clone());
        Ok(booking)
    }

    async fn find_view(&self, booking_id: BookingId) -> BookingResult<Option<BookingView>> {
        let state = self.lock();
        match state.bookings.get(&booking_id) {
            Some(booking) => Ok(Some(Self::view_of(&state, booking)?)),
            None => Ok(None),
        }
    }

    async fn exists(&self, booking_id: BookingId) -> BookingResult<bool> {
        Ok(self.lock().bookings.contains_key(&booking_id))
    }

    async fn finalize(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> BookingResult<Option<BookingView>> {
        let mut state = self.lock();
        // Compare-and-set under the store lock: only a WAITING booking moves.
        let updated = match state.bookings.get_mut(&booking_id) {
            Some(booking) if booking.status == BookingStatus::Waiting => {
                booking.status = status;
                booking.clone()
            }
            _ => return Ok(None),
        };
        Ok(Some(Self::view_of(&state, &updated)?))
    }

    async fn find_for_subject(
        &self,
        subject: BookingSubject,
        predicate: BookingPredicate,
        page: PageParams,
    ) -> BookingResult<Vec<BookingView>> {
        let state = self.lock();
        let mut views = Vec::new();

        for booking in state.bookings.values() {
            if !predicate.matches(booking) {
                continue;
            }
            let view = Self::view_of(&state, booking)?;
            let matches_subject = match subject {
                BookingSubject::Booker(user_id) => view.booker_id == user_id,
                BookingSubject::Owner(user_id) => view.owner_id == user_id,
            };
            if matches_subject {
                views.push(view);
            }
        }

        views.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(page.slice(views))
    }

    async fn find_by_item_and_booker(
        &self,
        item_id: ItemId,
        booker_id: UserId,
    ) -> BookingResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .lock()
            .bookings
            .values()
            .filter(|b| b.item_id == item_id && b.booker_id == booker_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(bookings)
    }

    async fn last_approved_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        Ok(self
            .lock()
            .bookings
            .values()
            .filter(|b| {
                b.item_id == item_id && b.status == BookingStatus::Approved && b.end < now
            })
            .max_by_key(|b| b.end)
            .cloned())
    }

    async fn next_approved_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        Ok(self
            .lock()
            .bookings
            .values()
            .filter(|b| {
                b.item_id == item_id && b.status == BookingStatus::Approved && b.end > now
            })
            .min_by_key(|b| b.end)
            .cloned())
    }

    async fn delete(&self, booking_id: BookingId) -> BookingResult<()> {
        self.lock().bookings.remove(&booking_id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert(&self, comment: Comment) -> CommentResult<Comment> {
        self.lock()
            .comments
            .insert(comment.comment_id, comment.clone());
        Ok(comment)
    }

    async fn find_by_item(&self, item_id: ItemId) -> CommentResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .lock()
            .comments
            .values()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn insert(&self, request: ItemRequest) -> RequestResult<ItemRequest> {
        self.lock()
            .requests
            .insert(request.request_id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, request_id: RequestId) -> RequestResult<Option<ItemRequest>> {
        Ok(self.lock().requests.get(&request_id).cloned())
    }

    async fn find_by_requestor(&self, requestor_id: UserId) -> RequestResult<Vec<ItemRequest>> {
        let mut requests: Vec<ItemRequest> = self
            .lock()
            .requests
            .values()
            .filter(|r| r.requestor_id == requestor_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn find_all_except(
        &self,
        requestor_id: UserId,
        page: PageParams,
    ) -> RequestResult<Vec<ItemRequest>> {
        let mut requests: Vec<ItemRequest> = self
            .lock()
            .requests
            .values()
            .filter(|r| r.requestor_id != requestor_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(requests))
    }
}
