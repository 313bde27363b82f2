use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number;

use bookshelf_http::error::AppError;

/// A book record as held by the store and returned by `GET /books/{bookId}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    /// Any JSON number, echoed back as given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_page: Option<u64>,
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<bool>,
    #[serde(serialize_with = "iso_millis")]
    pub inserted_at: DateTime<Utc>,
    #[serde(serialize_with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a freshly created record. `finished` is derived here.
    pub fn new(id: String, fields: BookFields, now: DateTime<Utc>) -> Self {
        let finished = fields.page_count == fields.read_page;
        Self {
            id,
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            finished,
            reading: fields.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Copy of this record with every caller-owned field replaced.
    ///
    /// `id` and `inserted_at` are kept. `finished` keeps its stored value
    /// unless `recompute_finished` is set. `updated_at` never moves backwards.
    pub fn with_fields(&self, fields: BookFields, now: DateTime<Utc>, recompute_finished: bool) -> Self {
        let finished = if recompute_finished {
            fields.page_count == fields.read_page
        } else {
            self.finished
        };
        Self {
            id: self.id.clone(),
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            finished,
            reading: fields.reading,
            inserted_at: self.inserted_at,
            updated_at: now.max(self.updated_at),
        }
    }
}

fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Projection returned by the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Request body for create and update. Every field may be absent on the wire;
/// validation decides which absences are errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<Number>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<u64>,
    pub read_page: Option<u64>,
    pub reading: Option<bool>,
}

/// Which write a payload is validated for; selects the rejection wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
}

impl WriteAction {
    fn failure_prefix(self) -> &'static str {
        match self {
            WriteAction::Create => "Gagal menambahkan buku",
            WriteAction::Update => "Gagal memperbarui buku",
        }
    }
}

/// Caller-owned fields of a book that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub name: String,
    pub year: Option<Number>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<u64>,
    pub read_page: Option<u64>,
    pub reading: Option<bool>,
}

impl BookPayload {
    /// Check the payload in fixed order: a missing name wins over a read page
    /// past the page count.
    pub fn validate(self, action: WriteAction) -> Result<BookFields, AppError> {
        let Some(name) = self.name else {
            return Err(AppError::validation(format!(
                "{}. Mohon isi nama buku",
                action.failure_prefix()
            )));
        };

        if let (Some(read_page), Some(page_count)) = (self.read_page, self.page_count) {
            if read_page > page_count {
                return Err(AppError::validation(format!(
                    "{}. readPage tidak boleh lebih besar dari pageCount",
                    action.failure_prefix()
                )));
            }
        }

        Ok(BookFields {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fields(page_count: u64, read_page: u64) -> BookFields {
        BookPayload {
            name: Some("Laskar Pelangi".to_string()),
            page_count: Some(page_count),
            read_page: Some(read_page),
            reading: Some(true),
            ..BookPayload::default()
        }
        .validate(WriteAction::Create)
        .unwrap()
    }

    #[test]
    fn missing_name_takes_precedence() {
        let payload = BookPayload {
            page_count: Some(10),
            read_page: Some(20),
            ..BookPayload::default()
        };
        let err = payload.validate(WriteAction::Create).unwrap_err();
        assert_eq!(err.to_string(), "Gagal menambahkan buku. Mohon isi nama buku");
    }

    #[test]
    fn read_page_past_page_count_is_rejected_with_action_wording() {
        let payload = BookPayload {
            name: Some("x".to_string()),
            page_count: Some(10),
            read_page: Some(11),
            ..BookPayload::default()
        };
        let err = payload.validate(WriteAction::Update).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
        );
    }

    #[test]
    fn page_comparison_needs_both_counts() {
        let payload = BookPayload {
            name: Some("x".to_string()),
            read_page: Some(11),
            ..BookPayload::default()
        };
        assert!(payload.validate(WriteAction::Create).is_ok());
    }

    #[test]
    fn finished_is_derived_on_creation() {
        let now = Utc::now();
        assert!(Book::new("a".into(), fields(100, 100), now).finished);
        assert!(!Book::new("b".into(), fields(100, 25), now).finished);
    }

    #[test]
    fn with_fields_keeps_identity_and_finished() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let book = Book::new("abc".into(), fields(100, 25), created);

        let updated = book.with_fields(fields(100, 100), later, false);
        assert_eq!(updated.id, "abc");
        assert_eq!(updated.inserted_at, created);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.read_page, Some(100));
        assert!(!updated.finished);

        assert!(book.with_fields(fields(100, 100), later, true).finished);
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let skewed = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let book = Book::new("abc".into(), fields(1, 1), created);
        assert_eq!(book.with_fields(fields(1, 1), skewed, false).updated_at, created);
    }

    #[test]
    fn fractional_year_is_kept_as_sent() {
        let payload: BookPayload =
            serde_json::from_value(json!({"name": "Bumi", "year": 2010.5})).unwrap();
        let fields = payload.validate(WriteAction::Create).unwrap();
        let book = Book::new("id-1".into(), fields, Utc::now());
        assert_eq!(serde_json::to_value(&book).unwrap()["year"], json!(2010.5));

        let payload: BookPayload = serde_json::from_value(json!({"name": "x", "year": 2010})).unwrap();
        assert_eq!(payload.year, Some(Number::from(2010)));
    }

    #[test]
    fn absent_fields_are_omitted_and_timestamps_are_iso() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let payload = BookPayload {
            name: Some("Bumi".to_string()),
            ..BookPayload::default()
        };
        let book = Book::new("id-1".into(), payload.validate(WriteAction::Create).unwrap(), at);

        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({
                "id": "id-1",
                "name": "Bumi",
                "finished": true,
                "insertedAt": "2024-05-06T07:08:09.000Z",
                "updatedAt": "2024-05-06T07:08:09.000Z"
            })
        );
    }
}
