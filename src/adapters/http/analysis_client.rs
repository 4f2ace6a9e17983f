//! HTTP adapter for the resume analysis service.
//!
//! Implements `AnalysisPort` over three routes on one configured origin:
//! `/analyze` (JSON), `/analyze-pdf` (multipart) and `/download-report` (JSON in, binary out).

use crate::domain::{AnalysisRequest, AnalysisResult, DomainError, PDF_MIME, ReportDocument};
use crate::ports::AnalysisPort;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Report rendering route, relative to the base URL.
pub const REPORT_PATH: &str = "/download-report";

/// Multipart field carrying the document.
const DOCUMENT_FIELD: &str = "resume";

/// How much of an error body is kept for logs.
const ERROR_BODY_PREVIEW: usize = 200;

/// reqwest-backed analysis client.
pub struct HttpAnalysisAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisAdapter {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Service origin (e.g., "http://resume-analyzer-backend.onrender.com")
    /// * `timeout` - Per-request timeout covering connect and body
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the one request matching the submission variant.
    fn build_analysis_request(
        &self,
        request: &AnalysisRequest,
    ) -> Result<reqwest::Request, DomainError> {
        let url = self.endpoint(request.path());
        let builder = match request {
            AnalysisRequest::Text(text) => self.client.post(url).json(&TextPayload { resume_text: text }),
            AnalysisRequest::Document(document) => {
                let part = Part::bytes(document.bytes.clone())
                    .file_name(document.file_name.clone())
                    .mime_str(&document.mime)
                    .map_err(|e| DomainError::Transport(format!("Invalid document type: {}", e)))?;
                self.client
                    .post(url)
                    .multipart(Form::new().part(DOCUMENT_FIELD, part))
            }
        };
        builder
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to build request: {}", e)))
    }

    fn build_report_request(&self, result: &AnalysisResult) -> Result<reqwest::Request, DomainError> {
        self.client
            .post(self.endpoint(REPORT_PATH))
            .json(result)
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to build request: {}", e)))
    }

    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, DomainError> {
        let url = request.url().to_string();
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| DomainError::Transport(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, url = %url, body = %text, "analysis service returned error");
            return Err(DomainError::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }
        Ok(response)
    }
}

/// `/analyze` request body.
#[derive(Serialize)]
struct TextPayload<'a> {
    #[serde(rename = "resumeText")]
    resume_text: &'a str,
}

/// Parse a success body. Anything that does not match the result shape is malformed.
fn decode_analysis(body: &[u8]) -> Result<AnalysisResult, DomainError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(
            error = %e,
            body = %String::from_utf8_lossy(body).chars().take(ERROR_BODY_PREVIEW).collect::<String>(),
            "analysis response parse failed"
        );
        DomainError::Decode(format!("Failed to parse analysis result: {}", e))
    })
}

/// File extension for a report response. Unknown or missing types fall back to pdf.
fn report_extension(content_type: Option<&str>) -> &'static str {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match mime.as_str() {
        PDF_MIME => "pdf",
        "text/html" => "html",
        "text/markdown" => "md",
        "text/plain" => "txt",
        "application/json" => "json",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        _ => "pdf",
    }
}

#[async_trait::async_trait]
impl AnalysisPort for HttpAnalysisAdapter {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, DomainError> {
        let http_request = self.build_analysis_request(request)?;
        info!(url = %http_request.url(), "sending resume to analysis service");

        let response = self.execute(http_request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::Transport(format!("Failed to read response: {}", e)))?;
        debug!(body_len = body.len(), "received analysis response");

        decode_analysis(&body)
    }

    async fn render_report(&self, result: &AnalysisResult) -> Result<ReportDocument, DomainError> {
        let http_request = self.build_report_request(result)?;
        info!(url = %http_request.url(), "requesting analysis report");

        let response = self.execute(http_request).await?;
        let extension = report_extension(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::Report(format!("Failed to read report body: {}", e)))?;

        info!(bytes = bytes.len(), extension, "report received");
        Ok(ReportDocument {
            extension: extension.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}
