//! Book CRUD handlers. Every route here sits behind the auth gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::handlers::extract::ValidatedJson;
use crate::handlers::http::AppState;
use crate::models::{Book, BookInput, CurrentUser};
use crate::repositories::parse_id;

fn not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

/// GET /books
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.books().book_list().await?;
    Ok(Json(books))
}

/// POST /books. Answers with a message and the new id, not the record.
pub async fn create_book(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(body): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let book = state.books().book_create(body).await?;
    info!(book_id = %book.id, user = %user.username, "book created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Book created successfully", "id": book.id })),
    ))
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let id = parse_id(&id)?;
    let book = state.books().book_get_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(book))
}

/// PUT /books/:id. Full replace of all four fields.
pub async fn update_book(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<BookInput>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    state
        .books()
        .book_replace(id, body)
        .await?
        .ok_or_else(not_found)?;
    info!(book_id = %id, user = %user.username, "book updated");
    Ok(Json(json!({ "message": "Book updated successfully" })))
}

/// DELETE /books/:id
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    state.books().book_delete(id).await?.ok_or_else(not_found)?;
    info!(book_id = %id, user = %user.username, "book deleted");
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}
