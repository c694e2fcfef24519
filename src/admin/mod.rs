//! Link, category, and user management.
//!
//! The write-side counterpart of the start page: add/edit/remove links
//! and categories, and list the registered users. Exposed through CLI
//! subcommands rather than the dashboard itself; user records are
//! read-only here — account lifecycle belongs to the identity provider.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::links::{icon_url, Link};
use crate::store::{
    Document, DocumentStore, StoreError, CATEGORIES_COLLECTION, LINKS_COLLECTION, USERS_COLLECTION,
};
use crate::util::{strip_control_chars, validate_link_url, LinkUrlError};

#[derive(Debug, Error)]
pub enum AdminError {
    /// A required field was empty. All of name/url/category are
    /// mandatory for link writes.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Category name cannot be empty or whitespace-only")]
    EmptyCategoryName,

    #[error(transparent)]
    InvalidUrl(#[from] LinkUrlError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A registered user, as listed in the admin panel.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
}

impl UserProfile {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            display_name: doc.field_str("displayName").unwrap_or("No Name").to_string(),
            email: doc.field_str("email").unwrap_or("").to_string(),
            role: doc.field_str("role").unwrap_or("user").to_string(),
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AdminError> {
    if value.trim().is_empty() {
        return Err(AdminError::MissingField(field));
    }
    Ok(())
}

/// Sanitize a category name: strip control characters, trim, reject
/// empty. The write-side twin of the dashboard's blank-name filter —
/// what this rejects, the dashboard would refuse to render.
fn sanitize_category_name(name: &str) -> Result<String, AdminError> {
    let sanitized = strip_control_chars(name);
    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        return Err(AdminError::EmptyCategoryName);
    }
    Ok(trimmed.to_owned())
}

// ============================================================================
// Links
// ============================================================================

/// Add a bookmark. All fields are required and the URL must be an
/// absolute http/https URL. Returns the new document id.
pub async fn add_link<S: DocumentStore>(
    store: &S,
    name: &str,
    url: &str,
    category: &str,
) -> Result<String, AdminError> {
    require("name", name)?;
    require("url", url)?;
    require("category", category)?;
    validate_link_url(url)?;

    let id = store
        .add_document(
            LINKS_COLLECTION,
            json!({ "name": name, "link": url, "category": category }),
        )
        .await?;
    tracing::info!(id = %id, name = %name, category = %category, "Added link");
    Ok(id)
}

/// Update an existing bookmark. Like the add form, every field is
/// required — partial updates are not offered.
pub async fn update_link<S: DocumentStore>(
    store: &S,
    id: &str,
    name: &str,
    url: &str,
    category: &str,
) -> Result<(), AdminError> {
    require("name", name)?;
    require("url", url)?;
    require("category", category)?;
    validate_link_url(url)?;

    store
        .update_document(
            LINKS_COLLECTION,
            id,
            json!({ "name": name, "link": url, "category": category }),
        )
        .await?;
    tracing::info!(id = %id, "Updated link");
    Ok(())
}

pub async fn remove_link<S: DocumentStore>(store: &S, id: &str) -> Result<(), AdminError> {
    store.delete_document(LINKS_COLLECTION, id).await?;
    tracing::info!(id = %id, "Removed link");
    Ok(())
}

/// All links across categories, with derived icons, for the admin
/// listing.
pub async fn list_links<S: DocumentStore>(store: &S) -> Result<Vec<Link>, AdminError> {
    let docs = store.get_all(LINKS_COLLECTION).await?;
    let mut links = Vec::with_capacity(docs.len());
    for doc in docs {
        let (Some(name), Some(url)) = (doc.field_str("name"), doc.field_str("link")) else {
            tracing::warn!(id = %doc.id, "Skipping link document with missing fields");
            continue;
        };
        links.push(Link {
            icon_url: icon_url(url).map(Arc::from),
            name: Arc::from(name),
            url: Arc::from(url),
            category: Arc::from(doc.field_str("category").unwrap_or("")),
            id: doc.id,
        });
    }
    Ok(links)
}

// ============================================================================
// Categories
// ============================================================================

/// Create a category. Returns the new document id.
pub async fn add_category<S: DocumentStore>(store: &S, name: &str) -> Result<String, AdminError> {
    let clean_name = sanitize_category_name(name)?;
    let id = store
        .add_document(CATEGORIES_COLLECTION, json!({ "name": clean_name }))
        .await?;
    tracing::info!(id = %id, name = %clean_name, "Added category");
    Ok(id)
}

/// Delete a category record. Links keep their category string; a
/// dangling category name simply stops rendering on the dashboard.
pub async fn remove_category<S: DocumentStore>(store: &S, id: &str) -> Result<(), AdminError> {
    store.delete_document(CATEGORIES_COLLECTION, id).await?;
    tracing::info!(id = %id, "Removed category");
    Ok(())
}

pub async fn list_categories<S: DocumentStore>(store: &S) -> Result<Vec<Document>, AdminError> {
    Ok(store.get_all(CATEGORIES_COLLECTION).await?)
}

// ============================================================================
// Users
// ============================================================================

/// Read-only listing of registered users.
pub async fn list_users<S: DocumentStore>(store: &S) -> Result<Vec<UserProfile>, AdminError> {
    let docs = store.get_all(USERS_COLLECTION).await?;
    Ok(docs.iter().map(UserProfile::from_document).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_add_link_roundtrip() {
        let store = MemoryStore::new();
        let id = add_link(&store, "GitHub", "https://github.com", "Work")
            .await
            .unwrap();

        let links = list_links(&store).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, id);
        assert_eq!(&*links[0].name, "GitHub");
        assert_eq!(
            links[0].icon_url.as_deref(),
            Some("https://logo.clearbit.com/github.com")
        );
    }

    #[tokio::test]
    async fn test_add_link_requires_all_fields() {
        let store = MemoryStore::new();
        let cases: [(&str, &str, &str); 3] = [
            ("", "https://x.com", "Work"),
            ("X", "  ", "Work"),
            ("X", "https://x.com", ""),
        ];
        for (name, url, category) in cases {
            let err = add_link(&store, name, url, category).await.unwrap_err();
            assert!(matches!(err, AdminError::MissingField(_)), "{name} {url}");
        }
        assert!(list_links(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_link_rejects_bad_url() {
        let store = MemoryStore::new();
        let err = add_link(&store, "X", "not-a-url", "Work").await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_update_link() {
        let store = MemoryStore::new();
        let id = add_link(&store, "Old", "https://old.com", "Work")
            .await
            .unwrap();
        update_link(&store, &id, "New", "https://new.com", "Travel")
            .await
            .unwrap();

        let links = list_links(&store).await.unwrap();
        assert_eq!(&*links[0].name, "New");
        assert_eq!(&*links[0].category, "Travel");
    }

    #[tokio::test]
    async fn test_remove_link() {
        let store = MemoryStore::new();
        let id = add_link(&store, "X", "https://x.com", "Work").await.unwrap();
        remove_link(&store, &id).await.unwrap();
        assert!(list_links(&store).await.unwrap().is_empty());

        let err = remove_link(&store, &id).await.unwrap_err();
        assert!(matches!(err, AdminError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_category_sanitizes_name() {
        let store = MemoryStore::new();
        let id = add_category(&store, "  \x1b[31mTech\x1b[0m  ").await.unwrap();

        let docs = list_categories(&store).await.unwrap();
        let doc = docs.iter().find(|d| d.id == id).unwrap();
        assert_eq!(doc.field_str("name"), Some("Tech"));
    }

    #[tokio::test]
    async fn test_add_category_rejects_blank() {
        let store = MemoryStore::new();
        for name in ["", "   ", "\x1b[31m\x1b[0m"] {
            let err = add_category(&store, name).await.unwrap_err();
            assert!(matches!(err, AdminError::EmptyCategoryName));
        }
    }

    #[tokio::test]
    async fn test_remove_category_leaves_links() {
        let store = MemoryStore::new();
        let cat_id = add_category(&store, "Work").await.unwrap();
        add_link(&store, "GitHub", "https://github.com", "Work")
            .await
            .unwrap();

        remove_category(&store, &cat_id).await.unwrap();
        assert!(list_categories(&store).await.unwrap().is_empty());
        // The link survives with its (now dangling) category string
        let links = list_links(&store).await.unwrap();
        assert_eq!(&*links[0].category, "Work");
    }

    #[tokio::test]
    async fn test_list_users() {
        let store = MemoryStore::new();
        store
            .add_document(
                USERS_COLLECTION,
                json!({ "displayName": "Ada", "email": "ada@example.com", "role": "admin" }),
            )
            .await
            .unwrap();
        store
            .add_document(USERS_COLLECTION, json!({ "email": "anon@example.com" }))
            .await
            .unwrap();

        let users = list_users(&store).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].display_name, "Ada");
        assert_eq!(users[0].role, "admin");
        // Missing fields fall back to display defaults
        assert_eq!(users[1].display_name, "No Name");
        assert_eq!(users[1].role, "user");
    }
}
