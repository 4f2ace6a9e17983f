//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{AnalysisRequest, AnalysisResult, DomainError, Notice, ReportDocument};
use std::path::PathBuf;

/// Remote analysis service. One call per submission; no retries at this layer.
#[async_trait::async_trait]
pub trait AnalysisPort: Send + Sync {
    /// Submit a resume. Non-2xx, transport failures and malformed bodies are all errors.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, DomainError>;

    /// Render a downloadable report for a previous result.
    async fn render_report(&self, result: &AnalysisResult)
    -> Result<ReportDocument, DomainError>;
}

/// Where exported reports end up (client-side "download").
#[async_trait::async_trait]
pub trait ReportSinkPort: Send + Sync {
    /// Save the report under its fixed file name. Returns the written path.
    async fn save(&self, report: &ReportDocument) -> Result<PathBuf, DomainError>;
}

/// User-facing notices (alerts). Never receives raw error causes.
pub trait NotifierPort: Send + Sync {
    fn notify(&self, notice: Notice);
}
