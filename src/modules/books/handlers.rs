//! Request handlers for `/books`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use bookshelf_http::{
    error::{AppError, AppResult},
    response::ApiResponse,
};

use super::models::{Book, BookPayload, BookSummary, WriteAction};
use super::store::SharedStore;

/// State handed to every books handler.
#[derive(Clone)]
pub struct BooksState {
    pub store: SharedStore,
    pub recompute_finished_on_update: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

/// Filters parsed from the `GET /books` query string. Filters combine with AND.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring of the book name.
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl ListQuery {
    /// Build filters from raw query pairs.
    ///
    /// The first `name` wins. `reading` and `finished` apply only when given
    /// once with a value of `0` or `1`; anything else leaves them off.
    /// Unknown keys are ignored, so listing never rejects a query.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let values = |key: &str| -> Vec<&str> {
            pairs
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .collect()
        };

        Self {
            name: values("name").first().map(|name| name.to_string()),
            reading: single_flag(&values("reading")),
            finished: single_flag(&values("finished")),
        }
    }

    fn matches(&self, book: &Book) -> bool {
        let name_matches = self.name.as_deref().map_or(true, |needle| {
            book.name.to_lowercase().contains(&needle.to_lowercase())
        });
        let reading_matches = self
            .reading
            .map_or(true, |wanted| book.reading == Some(wanted));
        let finished_matches = self.finished.map_or(true, |wanted| book.finished == wanted);

        name_matches && reading_matches && finished_matches
    }
}

/// `"0"` → false, `"1"` → true; repeated keys and other values → not applied.
fn single_flag(raw: &[&str]) -> Option<bool> {
    match raw {
        ["0"] => Some(false),
        ["1"] => Some(true),
        _ => None,
    }
}

pub async fn create_book(
    State(state): State<BooksState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<ApiResponse<CreatedBook>> {
    let Json(payload) = payload?;
    let fields = payload.validate(WriteAction::Create)?;

    let mut store = state.store.write().await;
    let id = store.unused_id();
    store.append(Book::new(id.clone(), fields, Utc::now()));

    if store.find_by_id(&id).is_none() {
        tracing::error!(book_id = %id, "book missing from store right after append");
        return Err(AppError::inconsistency("Buku gagal ditambahkan"));
    }

    tracing::info!(book_id = %id, total = store.len(), "book created");
    Ok(ApiResponse::created(
        "Buku berhasil ditambahkan",
        CreatedBook { book_id: id },
    ))
}

pub async fn list_books(
    State(state): State<BooksState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<ApiResponse<BookList>> {
    let query = ListQuery::from_pairs(&pairs);

    let store = state.store.read().await;
    let books: Vec<BookSummary> = store
        .iter()
        .filter(|book| query.matches(book))
        .map(BookSummary::from)
        .collect();

    tracing::debug!(matched = books.len(), total = store.len(), "books listed");
    Ok(ApiResponse::ok(BookList { books }))
}

pub async fn get_book(
    State(state): State<BooksState>,
    Path(book_id): Path<String>,
) -> AppResult<ApiResponse<BookDetail>> {
    let store = state.store.read().await;
    let book = store
        .find_by_id(&book_id)
        .cloned()
        .ok_or_else(|| AppError::not_found("Buku tidak ditemukan"))?;

    Ok(ApiResponse::ok(BookDetail { book }))
}

/// Validation runs before the lookup, so a bad payload for an unknown id is a 400.
pub async fn update_book(
    State(state): State<BooksState>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<ApiResponse> {
    let Json(payload) = payload?;
    let fields = payload.validate(WriteAction::Update)?;

    let mut store = state.store.write().await;
    let (index, current) = store
        .find_index_by_id(&book_id)
        .and_then(|index| store.get(index).map(|book| (index, book)))
        .ok_or_else(|| AppError::not_found("Gagal memperbarui buku. Id tidak ditemukan"))?;

    let updated = current.with_fields(fields, Utc::now(), state.recompute_finished_on_update);
    store.replace_at(index, updated);

    tracing::info!(book_id = %book_id, "book updated");
    Ok(ApiResponse::message("Buku berhasil diperbarui"))
}

pub async fn delete_book(
    State(state): State<BooksState>,
    Path(book_id): Path<String>,
) -> AppResult<ApiResponse> {
    let mut store = state.store.write().await;
    let index = store
        .find_index_by_id(&book_id)
        .ok_or_else(|| AppError::not_found("Buku gagal dihapus. Id tidak ditemukan"))?;

    store.remove_at(index);

    tracing::info!(book_id = %book_id, remaining = store.len(), "book deleted");
    Ok(ApiResponse::message("Buku berhasil dihapus"))
}
