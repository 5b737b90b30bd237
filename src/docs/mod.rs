//! Remote document synchronization.
//!
//! Every publish is a full replace: the current document is read only to
//! learn where its content ends, then one `batchUpdate` deletes everything
//! after the start offset and inserts the new text there.
//!
//! # Submodules
//!
//! - [`auth`]: Service account token exchange
//! - [`client`]: `reqwest` implementation of [`DocsApi`]

pub mod auth;
pub mod client;

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// Offset of the first character of a document body.
pub const BODY_START: i64 = 1;

/// The part of a Google Docs document this crate reads.
#[derive(Debug, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub body: Option<Body>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default)]
    pub end_index: Option<i64>,
}

impl Document {
    /// End offset of the body: the `endIndex` of its last element, or 1.
    pub fn end_index(&self) -> i64 {
        self.body
            .as_ref()
            .and_then(|body| body.content.last())
            .and_then(|element| element.end_index)
            .unwrap_or(BODY_START)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: i64,
    pub end_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub index: i64,
}

/// One edit inside a `batchUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    DeleteContentRange { range: Range },
    InsertText { location: Location, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

impl BatchUpdateRequest {
    /// Delete `[1, end_index - 1)` then insert `text` at 1.
    ///
    /// The trailing newline of the body cannot be deleted, hence the `- 1`.
    /// A body that is already empty gets only the insert, since the API
    /// rejects empty delete ranges.
    pub fn replace_all(end_index: i64, text: &str) -> Self {
        let mut requests = Vec::with_capacity(2);
        let delete_end = end_index - 1;
        if delete_end > BODY_START {
            requests.push(Request::DeleteContentRange {
                range: Range {
                    start_index: BODY_START,
                    end_index: delete_end,
                },
            });
        }
        requests.push(Request::InsertText {
            location: Location { index: BODY_START },
            text: text.to_string(),
        });
        Self { requests }
    }
}

/// Read and write access to remote documents.
pub trait DocsApi {
    async fn get_document(&self, document_id: &str) -> Result<Document>;
    async fn batch_update(&self, document_id: &str, update: &BatchUpdateRequest) -> Result<()>;
}

/// Replaces a document's whole content with rendered text.
#[derive(Debug)]
pub struct RemoteSync<A> {
    api: A,
}

impl<A: DocsApi> RemoteSync<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Overwrite the document. Returns `false` on any failure, which has
    /// already been logged with the document id and stage.
    #[instrument(level = "info", skip(self, text), fields(bytes = text.len()))]
    pub async fn publish(&self, document_id: &str, text: &str) -> bool {
        match self.replace(document_id, text).await {
            Ok(()) => {
                info!(%document_id, "Successfully updated Google Doc");
                true
            }
            Err(e) => {
                error!(%document_id, error = %e, "Error updating Google Doc");
                false
            }
        }
    }

    async fn replace(&self, document_id: &str, text: &str) -> Result<()> {
        if document_id.trim().is_empty() {
            return Err(AppError::config("target document id is empty"));
        }

        let document = self.api.get_document(document_id).await.inspect_err(|e| {
            error!(%document_id, stage = "documents.get", error = %e, "Failed to read document");
        })?;
        let end_index = document.end_index();
        info!(%document_id, end_index, "Fetched current document");

        let update = BatchUpdateRequest::replace_all(end_index, text);
        self.api
            .batch_update(document_id, &update)
            .await
            .inspect_err(|e| {
                error!(%document_id, stage = "documents.batchUpdate", error = %e, "Failed to replace content");
            })
    }
}
