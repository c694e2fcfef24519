use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use super::{Document, DocumentStore, StoreError, CATEGORIES_COLLECTION, LINKS_COLLECTION};

/// In-memory document store.
///
/// Backs `--offline` mode and the test suite. Shares state across
/// clones, mirroring how every clone of a remote client talks to the
/// same backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    query_calls: Arc<AtomicUsize>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Document>>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a small demo set of categories and
    /// links, so `--offline` mode shows a working dashboard.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().expect("memory store poisoned");
            for name in ["Work", "Travel", "Shopping"] {
                let id = format!("doc-{}", inner.next_id);
                inner.next_id += 1;
                inner
                    .collections
                    .entry(CATEGORIES_COLLECTION.to_string())
                    .or_default()
                    .push(Document::new(id, json!({ "name": name })));
            }
            let links = [
                ("GitHub", "https://github.com", "Work"),
                ("Docs", "https://doc.rust-lang.org", "Work"),
                ("Booking.com", "https://www.booking.com", "Travel"),
                ("Amazon", "https://www.amazon.com", "Shopping"),
            ];
            for (name, url, category) in links {
                let id = format!("doc-{}", inner.next_id);
                inner.next_id += 1;
                inner
                    .collections
                    .entry(LINKS_COLLECTION.to_string())
                    .or_default()
                    .push(Document::new(
                        id,
                        json!({ "name": name, "link": url, "category": category }),
                    ));
            }
        }
        store
    }

    /// Number of `query` calls served so far. Tests use this to assert
    /// that cached categories are not re-fetched.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }
}

impl DocumentStore for MemoryStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        self.query_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .lock()
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.field_str(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_document(&self, path: &str, data: Value, merge: bool) -> Result<(), StoreError> {
        let (collection, id) = path
            .rsplit_once('/')
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        let mut inner = self.lock();
        let docs = inner.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) if merge => {
                if let (Some(existing), Some(incoming)) = (doc.data.as_object_mut(), data.as_object())
                {
                    for (k, v) in incoming {
                        existing.insert(k.clone(), v.clone());
                    }
                } else {
                    doc.data = data;
                }
            }
            Some(doc) => doc.data = data,
            None => docs.push(Document::new(id, data)),
        }
        Ok(())
    }

    async fn add_document(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let mut inner = self.lock();
        let id = format!("doc-{}", inner.next_id);
        inner.next_id += 1;
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), data));
        Ok(id)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let doc = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        doc.data = data;
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let docs = inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        Ok(())
    }
}
