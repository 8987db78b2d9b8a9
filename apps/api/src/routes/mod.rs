//! # HTTP Routes
//!
//! ```text
//! /health                       GET                 health
//! /api/auth/signin              POST                auth
//! /api/auth/me                  GET                 auth
//! /api/categories               GET  POST           categories
//! /api/categories/{id}          GET  PUT  DELETE    categories
//! /api/inventory?page&pageSize  GET  POST           inventory
//! /api/inventory/{id}           GET  PUT  DELETE    inventory
//! /api/users                    GET  POST           users (OWNER)
//! /api/users/{id}               PUT  DELETE         users (OWNER)
//! /api/events                   GET (SSE)           events
//! ```
//!
//! Everything under `/api` except sign-in requires a bearer token.

use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod auth;
pub mod categories;
pub mod events;
pub mod health;
pub mod inventory;
pub mod users;

/// Body of delete confirmations: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Auth
        .route("/api/auth/signin", post(auth::sign_in))
        .route("/api/auth/me", get(auth::me))
        // Categories
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Inventory
        .route(
            "/api/inventory",
            get(inventory::list_inventory).post(inventory::create_item),
        )
        .route(
            "/api/inventory/{id}",
            get(inventory::get_item)
                .put(inventory::update_item)
                .delete(inventory::delete_item),
        )
        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        // Change feed
        .route("/api/events", get(events::stream_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
