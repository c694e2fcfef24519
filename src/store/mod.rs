//! Document store abstraction.
//!
//! All persistence is delegated to a hosted document database reached
//! through its client contract. The contract is the [`DocumentStore`]
//! trait; the handle is injected wherever persistence is needed, so the
//! rest of the crate never touches a global client instance and tests
//! substitute [`MemoryStore`] for the real backend.
//!
//! Two implementations ship:
//!
//! - [`RemoteStore`] — a thin reqwest client over the hosted JSON
//!   document API. Deliberately thin: no retry/backoff layer, the HTTP
//!   client's own timeout governs.
//! - [`MemoryStore`] — an in-memory fake used by tests and `--offline`
//!   mode.

mod memory;
mod remote;

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

/// Collection holding link records (`{name, link, category}`).
pub const LINKS_COLLECTION: &str = "links";
/// Collection holding category records (`{name}`).
pub const CATEGORIES_COLLECTION: &str = "category";
/// Collection holding user profile records.
pub const USERS_COLLECTION: &str = "users";
/// Path of the single document holding the authoritative category order.
/// Wholesale overwrite, last-writer-wins: concurrent sessions clobber
/// each other. Accepted for a single-admin tool.
pub const ORDER_DOC_PATH: &str = "meta/category_order";

// ============================================================================
// Error Types
// ============================================================================

/// Errors surfaced by document store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Store returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed store response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The store base URL must be HTTPS (localhost excepted, for tests).
    #[error("Insecure store base URL: HTTPS required (except localhost)")]
    InsecureBaseUrl,

    #[error("Document not found: {0}")]
    NotFound(String),
}

// ============================================================================
// Documents
// ============================================================================

/// A single record read from or written to the store.
///
/// `data` is the raw JSON payload; typed decoding happens at the call
/// sites that know the collection's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Convenience accessor for a top-level string field.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }
}

// ============================================================================
// Store Contract
// ============================================================================

/// Client contract of the hosted document database.
///
/// Read side: [`get_all`](Self::get_all) and equality
/// [`query`](Self::query). Write side: wholesale
/// [`set_document`](Self::set_document) plus the id-generating
/// [`add_document`](Self::add_document) and per-document
/// [`update_document`](Self::update_document) /
/// [`delete_document`](Self::delete_document) used by the admin surface.
///
/// Collections are addressed by slash-separated paths, so per-user
/// subcollections (`users/<uid>/notes`) work through the same methods.
///
/// Methods return `impl Future + Send` so generic callers can move the
/// calls into spawned tasks.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// All documents in a collection.
    fn get_all(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    /// Documents in `collection` whose `field` equals `value`.
    fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    /// Create or overwrite the document at `path` (`collection/id`).
    /// With `merge`, top-level fields are merged into the existing
    /// document instead of replacing it.
    fn set_document(
        &self,
        path: &str,
        data: Value,
        merge: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Add a document with a store-generated id; returns the new id.
    fn add_document(
        &self,
        collection: &str,
        data: Value,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Replace the fields of an existing document.
    fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a document. Deleting a missing document is an error
    /// (`StoreError::NotFound`).
    fn delete_document(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
