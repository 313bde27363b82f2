pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_kernel::{module::Endpoint, settings::BookSettings, InitCtx, Module};

use handlers::BooksState;
use store::{BookStore, SharedStore};

/// Route table for the books module, relative to its mount point.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        method: "POST",
        path: "/",
        summary: "Create a book",
    },
    Endpoint {
        method: "GET",
        path: "/",
        summary: "List books, filtered by name, reading, finished",
    },
    Endpoint {
        method: "GET",
        path: "/{bookId}",
        summary: "Fetch one book",
    },
    Endpoint {
        method: "PUT",
        path: "/{bookId}",
        summary: "Replace a book's fields",
    },
    Endpoint {
        method: "DELETE",
        path: "/{bookId}",
        summary: "Delete a book",
    },
    Endpoint {
        method: "GET",
        path: "/health",
        summary: "Books module health check",
    },
];

/// Books module: owns one in-memory store for the life of the process.
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    /// Module backed by a fresh, empty store.
    pub fn new(settings: &BookSettings) -> Self {
        Self::with_store(BookStore::shared(), settings)
    }

    pub fn with_store(store: SharedStore, settings: &BookSettings) -> Self {
        Self {
            state: BooksState {
                store,
                recompute_finished_on_update: settings.recompute_finished_on_update,
            },
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.state.store
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            recompute_finished_on_update = self.state.recompute_finished_on_update,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::list_books).post(handlers::create_book),
            )
            .route("/health", get(health_check))
            .route(
                "/{bookId}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .with_state(self.state.clone())
    }

    fn endpoints(&self) -> &'static [Endpoint] {
        ENDPOINTS
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let envelope_response = |description: &str| {
            serde_json::json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Envelope" }
                    }
                }
            })
        };
        let book_id_param = serde_json::json!({
            "name": "bookId",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let flag_param = |name: &str| {
            serde_json::json!({
                "name": name,
                "in": "query",
                "required": false,
                "schema": { "type": "string", "enum": ["0", "1"] }
            })
        };

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                                }
                            }
                        },
                        "responses": {
                            "201": envelope_response("Book created; data.bookId holds the new id"),
                            "400": envelope_response("Missing name or readPage larger than pageCount"),
                            "500": envelope_response("Book was not retained by the store")
                        }
                    },
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "name",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" }
                            },
                            flag_param("reading"),
                            flag_param("finished")
                        ],
                        "responses": {
                            "200": envelope_response("data.books holds {id, name, publisher} per match")
                        }
                    }
                },
                "/{bookId}": {
                    "get": {
                        "summary": "Fetch one book",
                        "tags": ["Books"],
                        "parameters": [book_id_param.clone()],
                        "responses": {
                            "200": envelope_response("data.book holds the full record"),
                            "404": envelope_response("Unknown id")
                        }
                    },
                    "put": {
                        "summary": "Replace a book's fields",
                        "tags": ["Books"],
                        "parameters": [book_id_param.clone()],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                                }
                            }
                        },
                        "responses": {
                            "200": envelope_response("Book updated"),
                            "400": envelope_response("Missing name or readPage larger than pageCount"),
                            "404": envelope_response("Unknown id")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [book_id_param],
                        "responses": {
                            "200": envelope_response("Book deleted"),
                            "404": envelope_response("Unknown id")
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "text/plain": {
                                        "schema": { "type": "string" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "year": { "type": "number" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "reading": { "type": "boolean" }
                        },
                        "required": ["name"]
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "year": { "type": "number" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer" },
                            "readPage": { "type": "integer" },
                            "finished": { "type": "boolean" },
                            "reading": { "type": "boolean" },
                            "insertedAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "finished", "insertedAt", "updatedAt"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.state.store.read().await.len();
        tracing::info!(module = self.name(), discarded, "books module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// Create a new instance of the books module
pub fn create_module(settings: &BookSettings) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(settings))
}
