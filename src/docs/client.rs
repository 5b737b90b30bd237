//! Google Docs v1 REST client.

use super::auth::{ServiceAccountKey, TokenSource};
use super::{BatchUpdateRequest, DocsApi, Document};
use crate::error::{AppError, Result};
use crate::utils::truncate_for_log;
use chrono::Utc;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};

const DOCS_API_BASE: &str = "https://docs.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct GoogleDocsClient {
    http: Client,
    api_base: String,
    tokens: TokenSource,
}

impl GoogleDocsClient {
    /// Build a client for `key`. Fails when the private key cannot sign,
    /// so a bad key is reported before any scraping starts.
    pub fn new(key: ServiceAccountKey) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("cannot build HTTP client: {e}")))?;
        let tokens = TokenSource::new(http.clone(), key);
        tokens.assertion(Utc::now())?;

        Ok(Self {
            http,
            api_base: DOCS_API_BASE.to_string(),
            tokens,
        })
    }

    /// Point the client at another API root.
    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn document_url(&self, document_id: &str) -> String {
        format!(
            "{}/v1/documents/{}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(document_id)
        )
    }
}

impl DocsApi for GoogleDocsClient {
    #[instrument(level = "info", skip(self))]
    async fn get_document(&self, document_id: &str) -> Result<Document> {
        let url = self.document_url(document_id);
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::transport(&url, e))?;
        let response = check_status(response, "documents.get").await?;

        let body = response.text().await.map_err(|e| AppError::transport(&url, e))?;
        debug!(bytes = body.len(), "Read document");
        Ok(serde_json::from_str(&body)?)
    }

    #[instrument(level = "info", skip(self, update), fields(requests = update.requests.len()))]
    async fn batch_update(&self, document_id: &str, update: &BatchUpdateRequest) -> Result<()> {
        let url = format!("{}:batchUpdate", self.document_url(document_id));
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await
            .map_err(|e| AppError::transport(&url, e))?;
        check_status(response, "documents.batchUpdate").await?;
        Ok(())
    }
}

async fn check_status(response: Response, stage: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Api {
        stage,
        status: status.as_u16(),
        body: truncate_for_log(&body, 500),
    })
}
