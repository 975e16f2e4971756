//! Document-store client: PDF upload, listing, extracted text

use crate::ClientError;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Reply from a successful PDF upload.
#[derive(Clone, Debug, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    pub document_id: String,
}

/// One stored document as listed by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub upload_time: Option<String>,
}

#[derive(Deserialize)]
struct DocumentText {
    text: String,
}

/// HTTP client for the document store that backs knowledge-base stages.
pub struct DocumentStoreClient {
    client: Client,
    base_url: String,
}

impl DocumentStoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a PDF. The backend extracts its text and returns a document id.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadReceipt, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        debug!(filename, "uploading PDF");

        let response = self
            .client
            .post(format!("{}/upload-pdf", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Backend {
                status: status.as_u16(),
                detail: extract_detail(&body).unwrap_or(body),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentMeta>, ClientError> {
        let response = self
            .client
            .get(format!("{}/documents", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Backend {
                status: status.as_u16(),
                detail: extract_detail(&body).unwrap_or(body),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch the extracted text of a stored document by filename.
    pub async fn document_text(&self, filename: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .get(format!("{}/document-text/{}", self.base_url, filename))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Backend {
                status: status.as_u16(),
                detail: extract_detail(&body).unwrap_or(body),
            });
        }
        let doc: DocumentText = response.json().await?;
        Ok(doc.text)
    }
}

/// Pull the `detail` field out of a backend error body, when there is one.
/// Non-string details are kept as their JSON rendering.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = DocumentStoreClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn detail_extracted_from_error_body() {
        assert_eq!(
            extract_detail(r#"{"detail": "Only PDF files are supported"}"#),
            Some("Only PDF files are supported".to_string())
        );
    }

    #[test]
    fn structured_detail_kept_as_json() {
        let detail = extract_detail(r#"{"detail": {"code": 42}}"#).unwrap();
        assert_eq!(detail, r#"{"code":42}"#);
    }

    #[test]
    fn missing_or_malformed_detail_is_none() {
        assert_eq!(extract_detail(r#"{"error": "nope"}"#), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
    }

    #[test]
    fn document_meta_tolerates_missing_upload_time() {
        let meta: DocumentMeta =
            serde_json::from_str(r#"{"id": "d1", "filename": "notes.pdf"}"#).unwrap();
        assert_eq!(meta.filename, "notes.pdf");
        assert!(meta.upload_time.is_none());
    }
}
