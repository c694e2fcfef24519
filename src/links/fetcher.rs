use std::sync::Arc;

use thiserror::Error;
use url::Url;

use super::Link;
use crate::store::{DocumentStore, StoreError, LINKS_COLLECTION};

/// Favicon service the icon URL template points at.
const ICON_SERVICE: &str = "https://logo.clearbit.com";

/// Errors from fetching a category's links.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Failed to load links")]
    Store(#[from] StoreError),
}

/// Derive the favicon URL for a bookmark from its hostname.
///
/// Returns `None` when the URL does not parse as an absolute URL with a
/// host. Icon derivation failing must never fail the bookmark itself:
/// callers keep the link and render it without an icon.
pub fn icon_url(link_url: &str) -> Option<String> {
    let parsed = Url::parse(link_url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{ICON_SERVICE}/{host}"))
}

/// Fetch all links belonging to `category`, decorated with derived
/// icon URLs.
///
/// An empty or whitespace-only category name yields an empty list
/// without contacting the store — blank categories are filtered out of
/// the UI, so a query for one is a caller bug, not a user error.
///
/// Store failures surface as [`LinkError::Store`]; the caller decides
/// how to present them ("Failed to load links.") and whether to retry
/// by re-toggling. This function never writes and never touches the
/// cache — memoization is the caller's choice.
pub async fn fetch_links<S: DocumentStore>(
    store: &S,
    category: &str,
) -> Result<Vec<Link>, LinkError> {
    if category.trim().is_empty() {
        tracing::debug!("Ignoring link fetch for blank category name");
        return Ok(Vec::new());
    }

    let docs = store.query(LINKS_COLLECTION, "category", category).await?;

    let category: Arc<str> = Arc::from(category);
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
            category: Arc::clone(&category),
            id: doc.id,
        });
    }

    tracing::debug!(category = %category, count = links.len(), "Fetched links");
    Ok(links)
}
