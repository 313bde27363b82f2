//! In-memory book collection.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use super::models::Book;

/// Length of generated book ids.
pub const ID_LENGTH: usize = 16;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Store handle shared by the books handlers. Writers hold the write lock for
/// the whole check-then-mutate sequence.
pub type SharedStore = Arc<RwLock<BookStore>>;

/// Ordered collection of books, kept in insertion order.
///
/// The store does not enforce id uniqueness; see [`BookStore::unused_id`].
#[derive(Debug, Default)]
pub struct BookStore {
    books: Vec<Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh, empty store for sharing across handlers.
    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Overwrite the record at `index`, keeping its position.
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_at(&mut self, index: usize, book: Book) {
        self.books[index] = book;
    }

    /// Remove the record at `index`, shifting later records down.
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Book {
        self.books.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Draw random ids until one is not already taken.
    pub fn unused_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = random_id(&mut rng);
            if self.find_by_id(&candidate).is_none() {
                return candidate;
            }
            tracing::warn!(id = %candidate, "generated book id collided, drawing again");
        }
    }
}

fn random_id<R: Rng>(rng: &mut R) -> String {
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::{BookPayload, WriteAction};
    use chrono::Utc;

    fn book(id: &str, name: &str) -> Book {
        let fields = BookPayload {
            name: Some(name.to_string()),
            ..BookPayload::default()
        }
        .validate(WriteAction::Create)
        .unwrap();
        Book::new(id.to_string(), fields, Utc::now())
    }

    fn ids(store: &BookStore) -> Vec<&str> {
        store.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut store = BookStore::new();
        store.append(book("a", "A"));
        store.append(book("b", "B"));
        store.append(book("c", "C"));
        assert_eq!(ids(&store), vec!["a", "b", "c"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn lookups_return_first_match() {
        let mut store = BookStore::new();
        store.append(book("a", "first"));
        store.append(book("a", "second"));
        assert_eq!(store.find_by_id("a").unwrap().name, "first");
        assert_eq!(store.find_index_by_id("a"), Some(0));
        assert!(store.find_by_id("zzz").is_none());
        assert_eq!(store.find_index_by_id("zzz"), None);
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = BookStore::new();
        store.append(book("a", "A"));
        store.append(book("b", "B"));
        store.replace_at(0, book("a", "renamed"));
        assert_eq!(ids(&store), vec!["a", "b"]);
        assert_eq!(store.get(0).unwrap().name, "renamed");
    }

    #[test]
    fn remove_shifts_later_records() {
        let mut store = BookStore::new();
        store.append(book("a", "A"));
        store.append(book("b", "B"));
        store.append(book("c", "C"));
        let removed = store.remove_at(1);
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&store), vec!["a", "c"]);
        assert_eq!(store.find_index_by_id("c"), Some(1));
    }

    #[test]
    fn generated_ids_use_url_safe_alphabet() {
        let store = BookStore::new();
        let id = store.unused_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let mut store = BookStore::new();
        for _ in 0..200 {
            let id = store.unused_id();
            assert!(store.find_by_id(&id).is_none());
            store.append(book(&id, "x"));
        }
        assert_eq!(store.len(), 200);
    }
}
