use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::{Document, DocumentStore, StoreError};

/// Default request timeout for store calls. There is no retry layer on
/// top of this; failed calls surface to the caller immediately.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the hosted JSON document API.
///
/// Wire format:
///
/// - `GET {base}/{collection}` → `[{"id": "...", "data": {...}}, ...]`
/// - `GET {base}/{collection}?field=F&equals=V` → same shape, filtered
/// - `PUT {base}/{path}?merge=BOOL` with the document payload as body
/// - `POST {base}/{collection}` → `{"id": "..."}`
/// - `PATCH {base}/{collection}/{id}` with the replacement payload
/// - `DELETE {base}/{collection}/{id}`
///
/// The API key, when configured, is sent as a bearer token and held in
/// a [`SecretString`] so it never appears in debug output.
#[derive(Clone, Debug)]
pub struct RemoteStore {
    client: reqwest::Client,
    base: Arc<str>,
    api_key: Option<Arc<SecretString>>,
}

impl RemoteStore {
    /// Build a store client for the given base URL.
    ///
    /// HTTPS is required so the bearer key is never sent in the clear;
    /// plain HTTP is allowed only for localhost (mock servers in tests).
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Result<Self, StoreError> {
        if !base_url.starts_with("https://") {
            let is_localhost = base_url.starts_with("http://127.0.0.1")
                || base_url.starts_with("http://localhost");
            if !is_localhost {
                tracing::error!(base_url = %base_url, "Rejecting non-HTTPS store base URL");
                return Err(StoreError::InsecureBaseUrl);
            }
            tracing::warn!(base_url = %base_url, "Using non-HTTPS store base URL (localhost only)");
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base: Arc::from(base_url.trim_end_matches('/')),
            api_key: api_key.map(Arc::new),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, format!("{}/{}", self.base, path));
        if let Some(key) = &self.api_key {
            req = req.header("authorization", format!("Bearer {}", key.expose_secret()));
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String, StoreError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Store request failed");
            return Err(StoreError::HttpStatus(status.as_u16()));
        }
        Ok(resp.text().await?)
    }

    fn decode_documents(body: &str) -> Result<Vec<Document>, StoreError> {
        #[derive(serde::Deserialize)]
        struct Wire {
            id: String,
            data: Value,
        }
        let wire: Vec<Wire> = serde_json::from_str(body)?;
        Ok(wire
            .into_iter()
            .map(|w| Document::new(w.id, w.data))
            .collect())
    }
}

impl DocumentStore for RemoteStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let body = self
            .send(self.request(reqwest::Method::GET, collection))
            .await?;
        Self::decode_documents(&body)
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let req = self
            .request(reqwest::Method::GET, collection)
            .query(&[("field", field), ("equals", value)]);
        let body = self.send(req).await?;
        Self::decode_documents(&body)
    }

    async fn set_document(&self, path: &str, data: Value, merge: bool) -> Result<(), StoreError> {
        let req = self
            .request(reqwest::Method::PUT, path)
            .query(&[("merge", if merge { "true" } else { "false" })])
            .header("content-type", "application/json")
            .body(data.to_string());
        self.send(req).await?;
        Ok(())
    }

    async fn add_document(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let req = self
            .request(reqwest::Method::POST, collection)
            .header("content-type", "application/json")
            .body(data.to_string());
        let body = self.send(req).await?;

        #[derive(serde::Deserialize)]
        struct Created {
            id: String,
        }
        let created: Created = serde_json::from_str(&body)?;
        Ok(created.id)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        let req = self
            .request(reqwest::Method::PATCH, &format!("{collection}/{id}"))
            .header("content-type", "application/json")
            .body(data.to_string());
        match self.send(req).await {
            Ok(_) => Ok(()),
            Err(StoreError::HttpStatus(404)) => {
                Err(StoreError::NotFound(format!("{collection}/{id}")))
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let req = self.request(reqwest::Method::DELETE, &format!("{collection}/{id}"));
        match self.send(req).await {
            Ok(_) => Ok(()),
            Err(StoreError::HttpStatus(404)) => {
                Err(StoreError::NotFound(format!("{collection}/{id}")))
            }
            Err(e) => Err(e),
        }
    }
}
