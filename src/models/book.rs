//! Book catalog records.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub rating: f64,
}

impl Book {
    pub fn from_input(id: Uuid, input: BookInput) -> Self {
        Self {
            id,
            title: input.title,
            author: input.author,
            price: input.price,
            rating: input.rating,
        }
    }
}

/// Body of `POST /books` and `PUT /books/:id`. Update is a full replace of all four fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BookInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    pub price: f64,
    pub rating: f64,
}
