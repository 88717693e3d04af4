use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_comment, add_request, create_booking, create_item, create_user, decide_booking,
    delete_booking, delete_item, delete_user, get_booking, get_item, get_request, get_user,
    list_all_requests, list_bookings, list_bookings_for_owner, list_items, list_own_requests,
    list_users, search_items, update_item, update_user,
};

/// Creates the API router with all endpoints
///
/// User endpoints:
/// - POST /users, GET /users, GET /users/:id, PATCH /users/:id, DELETE /users/:id
///
/// Item endpoints (acting user via X-Sharer-User-Id):
/// - POST /items, PATCH /items/:id, GET /items/:id, GET /items
/// - GET /items/search?text=, DELETE /items/:id, POST /items/:id/comment
///
/// Booking endpoints (acting user via X-Sharer-User-Id):
/// - POST /bookings, PATCH /bookings/:id?approved=, GET /bookings/:id
/// - GET /bookings?state=, GET /bookings/owner?state=, DELETE /bookings/:id
///
/// Item request endpoints (acting user via X-Sharer-User-Id):
/// - POST /requests, GET /requests, GET /requests/all, GET /requests/:id
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // User endpoints
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        // Item endpoints
        .route("/items", post(create_item).get(list_items))
        .route("/items/search", get(search_items))
        .route(
            "/items/:id",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/items/:id/comment", post(add_comment))
        // Booking endpoints
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/owner", get(list_bookings_for_owner))
        .route(
            "/bookings/:id",
            get(get_booking).patch(decide_booking).delete(delete_booking),
        )
        // Item request endpoints
        .route("/requests", post(add_request).get(list_own_requests))
        .route("/requests/all", get(list_all_requests))
        .route("/requests/:id", get(get_request))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
