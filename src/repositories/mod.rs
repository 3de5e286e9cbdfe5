//! Persistence seam: user and book stores plus their shared error type.
//!
//! Handlers only see `dyn UserStore` / `dyn BookStore`; the Postgres
//! implementation lives in [`crate::db`], the in-memory one in [`memory`].

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Book, BookInput, NewUser, User};

pub use memory::MemoryStore;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field (`username` or `email`) is already taken.
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(String),

    #[error("malformed record id: {0}")]
    InvalidId(String),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Parses a path identifier. Malformed ids are a store failure, not a 404.
pub fn parse_id(raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn user_find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>>;

    async fn user_find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn user_get_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Inserts a user; returns [`StoreError::Duplicate`] when username or email is taken.
    async fn user_create(&self, user: NewUser) -> StoreResult<User>;
}

#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    async fn book_list(&self) -> StoreResult<Vec<Book>>;

    async fn book_create(&self, input: BookInput) -> StoreResult<Book>;

    async fn book_get_by_id(&self, id: Uuid) -> StoreResult<Option<Book>>;

    /// Replaces all fields of an existing book. `None` if no book has this id; nothing is inserted.
    async fn book_replace(&self, id: Uuid, input: BookInput) -> StoreResult<Option<Book>>;

    /// Removes a book and returns it, or `None` if it did not exist.
    async fn book_delete(&self, id: Uuid) -> StoreResult<Option<Book>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuid_and_rejects_garbage() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("64b7f0c2e1"), Err(StoreError::InvalidId(_))));
    }
}
