//! Shared router state and the health probe.

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::JwtKeys;
use crate::repositories::{BookStore, UserStore};

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, books: Arc<dyn BookStore>, jwt: JwtKeys) -> Self {
        Self { users, books, jwt }
    }

    /// State backed by a single store serving both users and books.
    pub fn with_store<S>(store: Arc<S>, jwt: JwtKeys) -> Self
    where
        S: UserStore + BookStore,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let books: Arc<dyn BookStore> = store;
        Self::new(users, books, jwt)
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }
    pub fn books(&self) -> &dyn BookStore {
        self.books.as_ref()
    }
    pub fn jwt(&self) -> &JwtKeys {
        &self.jwt
    }
}

/// GET /health (liveness probe)
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "bookstore" })),
    )
}
