//! In-memory store used for `STORAGE_BACKEND=memory` and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookStore, StoreError, StoreResult, UserStore};
use crate::models::{Book, BookInput, NewUser, User};

/// Map-backed implementation of both stores.
///
/// Books keep insertion order so listing is stable across calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    books: RwLock<Vec<Book>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn book_count(&self) -> usize {
        self.books.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn user_find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn user_find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn user_get_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn user_create(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        // Same guarantee the unique indexes give the Postgres store.
        for existing in users.values() {
            if existing.username == user.username {
                return Err(StoreError::Duplicate("username".to_string()));
            }
            if existing.email == user.email {
                return Err(StoreError::Duplicate("email".to_string()));
            }
        }

        let row = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn book_list(&self) -> StoreResult<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn book_create(&self, input: BookInput) -> StoreResult<Book> {
        let book = Book::from_input(Uuid::new_v4(), input);
        self.books.write().await.push(book.clone());
        Ok(book)
    }

    async fn book_get_by_id(&self, id: Uuid) -> StoreResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    async fn book_replace(&self, id: Uuid, input: BookInput) -> StoreResult<Option<Book>> {
        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|b| b.id == id).map(|slot| {
            *slot = Book::from_input(id, input);
            slot.clone()
        }))
    }

    async fn book_delete(&self, id: Uuid) -> StoreResult<Option<Book>> {
        let mut books = self.books.write().await;
        let idx = books.iter().position(|b| b.id == id);
        Ok(idx.map(|idx| books.remove(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    fn dune() -> BookInput {
        BookInput {
            title: "Dune".into(),
            author: "Herbert".into(),
            price: 9.99,
            rating: 5.0,
        }
    }

    #[tokio::test]
    async fn user_uniqueness_on_username_and_email() {
        let store = MemoryStore::new();
        store.user_create(new_user("alice", "a@x.com")).await.unwrap();

        let err = store.user_create(new_user("alice", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(f) if f == "username"));
        let err = store.user_create(new_user("bob", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(f) if f == "email"));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn finds_users_by_either_field() {
        let store = MemoryStore::new();
        let alice = store.user_create(new_user("alice", "a@x.com")).await.unwrap();

        let hit = store
            .user_find_by_username_or_email("someone", "a@x.com")
            .await
            .unwrap();
        assert_eq!(hit.map(|u| u.id), Some(alice.id));
        assert!(store.user_find_by_username("bob").await.unwrap().is_none());
        assert!(store.user_get_by_id(alice.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn replace_missing_book_inserts_nothing() {
        let store = MemoryStore::new();
        let replaced = store.book_replace(Uuid::new_v4(), dune()).await.unwrap();
        assert!(replaced.is_none());
        assert_eq!(store.book_count().await, 0);
    }

    #[tokio::test]
    async fn book_lifecycle() {
        let store = MemoryStore::new();
        let book = store.book_create(dune()).await.unwrap();
        assert_eq!(store.book_get_by_id(book.id).await.unwrap(), Some(book.clone()));

        let updated = store
            .book_replace(
                book.id,
                BookInput {
                    price: 4.5,
                    ..dune()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price, 4.5);

        assert!(store.book_delete(book.id).await.unwrap().is_some());
        assert!(store.book_delete(book.id).await.unwrap().is_none());
        assert!(store.book_list().await.unwrap().is_empty());
    }
}
