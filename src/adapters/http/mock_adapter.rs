//! Mock analysis adapter for trying the client without a backend.
//!
//! Returns canned evaluations and a Markdown report without making network calls.

use crate::domain::{AnalysisRequest, AnalysisResult, DomainError, ReportDocument};
use crate::ports::AnalysisPort;
use std::time::Duration;
use tracing::info;

/// Mock analysis service.
///
/// The score is derived from the input size so repeated runs with different
/// resumes show different gauges. Simulates network latency with a configurable delay.
pub struct MockAnalysisAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockAnalysisAdapter {
    /// Create a new mock adapter with default delay (800ms).
    pub fn new() -> Self {
        Self { delay_ms: 800 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    fn mock_score(request: &AnalysisRequest) -> i64 {
        let units = match request {
            AnalysisRequest::Text(text) => text.split_whitespace().count(),
            AnalysisRequest::Document(document) => document.bytes.len() / 1024,
        };
        35 + (units.min(60) as i64)
    }
}

impl Default for MockAnalysisAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AnalysisPort for MockAnalysisAdapter {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, DomainError> {
        info!(route = request.path(), "[MOCK] Simulating resume analysis");

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        let ats_score = Self::mock_score(request);
        let weaknesses = if ats_score >= 75 {
            Vec::new()
        } else {
            vec!["[MOCK] Experience section lacks measurable outcomes".to_string()]
        };

        Ok(AnalysisResult {
            ats_score,
            strengths: vec![
                "[MOCK] Clear role progression".to_string(),
                "[MOCK] Relevant technical keywords".to_string(),
            ],
            weaknesses,
            missing_skills: vec!["[MOCK] Kubernetes".to_string()],
            improvement_suggestions: vec![
                "[MOCK] Add metrics to each bullet point".to_string(),
                "[MOCK] Configure RESUME_ANALYZER_API_URL for real results".to_string(),
            ],
        })
    }

    async fn render_report(&self, result: &AnalysisResult) -> Result<ReportDocument, DomainError> {
        info!(ats_score = result.ats_score, "[MOCK] Simulating report rendering");

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        Ok(ReportDocument {
            extension: "md".to_string(),
            bytes: markdown_report(result).into_bytes(),
        })
    }
}

/// Markdown rendition of a result, one section per feedback category.
fn markdown_report(result: &AnalysisResult) -> String {
    let mut md = String::new();

    md.push_str("# Resume Analysis Report\n\n");
    md.push_str(&format!("**ATS Score:** {}/100\n\n", result.ats_score));
    md.push_str("---\n\n");

    let sections = [
        ("Strengths", &result.strengths),
        ("Weaknesses", &result.weaknesses),
        ("Missing Skills", &result.missing_skills),
        ("Improvement Suggestions", &result.improvement_suggestions),
    ];
    for (title, items) in sections {
        md.push_str(&format!("## {}\n\n", title));
        if items.is_empty() {
            md.push_str("_No major issues detected._\n");
        }
        for item in items {
            md.push_str(&format!("- {}\n", item));
        }
        md.push('\n');
    }

    md.push_str("---\n");
    md.push_str("*Generated by resume-analyzer (mock)*\n");
    md
}
