use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config::ClientConfig;
use super::error::StoreError;
use super::ContentStore;
use crate::content::{ContentData, ContentPatch, ContentSection, CreateContent, Section};

/// [`ContentStore`] backed by the `/content` HTTP resource.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    client: Client,
    base_url: String,
}

impl HttpContentStore {
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing client, e.g. one carrying auth headers.
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch_by_section(
        &self,
        section: Section,
    ) -> Result<Option<ContentSection>, StoreError> {
        let resp = self
            .client
            .get(self.url("/content"))
            .query(&[("section", section.as_str())])
            .send()
            .await?;

        let body: Value = match read_json(resp).await {
            Err(StoreError::NotFound) => return Ok(None),
            other => other?,
        };
        let record = match body {
            Value::Array(items) => match items.into_iter().next() {
                Some(first) => first,
                None => return Ok(None),
            },
            Value::Null => return Ok(None),
            object => object,
        };
        Ok(Some(serde_json::from_value(record)?))
    }

    async fn fetch_by_id(&self, id: &str) -> Result<ContentSection, StoreError> {
        let resp = self
            .client
            .get(self.url(&format!("/content/{id}")))
            .send()
            .await?;
        read_json(resp).await
    }

    async fn create(
        &self,
        section: Section,
        data: ContentData,
    ) -> Result<ContentSection, StoreError> {
        tracing::debug!(%section, "creating content record");
        let resp = self
            .client
            .post(self.url("/content"))
            .json(&CreateContent { section, data })
            .send()
            .await?;
        read_json(resp).await
    }

    async fn patch(&self, id: &str, patch: ContentPatch) -> Result<ContentSection, StoreError> {
        tracing::debug!(content_id = id, action = ?patch.action, "patching content record");
        let resp = self
            .client
            .patch(self.url(&format!("/content/{id}")))
            .json(&patch)
            .send()
            .await?;
        read_json(resp).await
    }
}

/// Decode a successful response, mapping 404 and other non-2xx statuses.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, StoreError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(StoreError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pull `error.message` out of an API error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
