//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/terminal types here — adapters map to and from these.

use serde::{Deserialize, Deserializer, Serialize};

/// MIME type of the only document format the picker accepts.
pub const PDF_MIME: &str = "application/pdf";

/// Base name of the exported report; the extension comes from the response.
pub const REPORT_FILE_STEM: &str = "resume-analysis-report";

/// An attached resume document (raw bytes, not parsed client-side).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ResumeDocument {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: PDF_MIME.to_string(),
            bytes,
        }
    }
}

/// Current resume input. Text and document are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResumeInput {
    #[default]
    Empty,
    Text(String),
    Document(ResumeDocument),
}

impl ResumeInput {
    /// Pasted text, or `""` when a document is attached or nothing is set.
    pub fn text(&self) -> &str {
        match self {
            ResumeInput::Text(t) => t,
            _ => "",
        }
    }

    pub fn document(&self) -> Option<&ResumeDocument> {
        match self {
            ResumeInput::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Blank text with no document counts as nothing to submit.
    pub fn is_submittable(&self) -> bool {
        match self {
            ResumeInput::Empty => false,
            ResumeInput::Text(t) => !t.trim().is_empty(),
            ResumeInput::Document(_) => true,
        }
    }
}

/// One submission, resolved once from the input. Each variant has its own route and encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// JSON `{ "resumeText": ... }` to `/analyze`.
    Text(String),
    /// Multipart field `resume` to `/analyze-pdf`.
    Document(ResumeDocument),
}

impl AnalysisRequest {
    /// The document wins when one is attached; otherwise the text is sent.
    /// Returns `None` when there is nothing to submit.
    pub fn from_input(input: &ResumeInput) -> Option<Self> {
        if !input.is_submittable() {
            return None;
        }
        match input {
            ResumeInput::Document(d) => Some(AnalysisRequest::Document(d.clone())),
            ResumeInput::Text(t) => Some(AnalysisRequest::Text(t.clone())),
            ResumeInput::Empty => None,
        }
    }

    /// Route path relative to the configured base.
    pub fn path(&self) -> &'static str {
        match self {
            AnalysisRequest::Text(_) => "/analyze",
            AnalysisRequest::Document(_) => "/analyze-pdf",
        }
    }
}

/// Evaluation returned by the analysis service. Field names match the wire format,
/// which is also what the report endpoint expects back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Expected 0–100 but not enforced.
    #[serde(deserialize_with = "deserialize_score")]
    pub ats_score: i64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_skills: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

/// Accepts any JSON number; fractional scores are truncated toward zero.
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    n.as_f64()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
        .ok_or_else(|| serde::de::Error::custom(format!("ats_score out of range: {}", n)))
}

/// Rendered report returned by `/download-report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ReportDocument {
    /// Fixed download name: `resume-analysis-report.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", REPORT_FILE_STEM, self.extension)
    }
}

/// User-visible notices. Failure causes are logged, never shown here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    MissingInput,
    AnalysisFailed,
    ReportSaved(std::path::PathBuf),
    ReportUnavailable,
    ReportInProgress,
    ReportFailed,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::MissingInput => "Please paste resume text OR upload a PDF".to_string(),
            Notice::AnalysisFailed => "Something went wrong. Please try again.".to_string(),
            Notice::ReportSaved(path) => format!("Report saved to {}", path.display()),
            Notice::ReportUnavailable => "Analyze a resume before downloading a report".to_string(),
            Notice::ReportInProgress => "A report download is already in progress".to_string(),
            Notice::ReportFailed => "Could not download the report. Please try again.".to_string(),
        }
    }

    /// Failure notices are rendered as alerts.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::MissingInput | Notice::AnalysisFailed | Notice::ReportFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_takes_precedence() {
        let input = ResumeInput::Document(ResumeDocument::pdf("cv.pdf", vec![1, 2, 3]));
        let req = AnalysisRequest::from_input(&input).unwrap();
        assert_eq!(req.path(), "/analyze-pdf");
    }

    #[test]
    fn test_text_request() {
        let input = ResumeInput::Text("Senior Engineer".to_string());
        assert_eq!(
            AnalysisRequest::from_input(&input),
            Some(AnalysisRequest::Text("Senior Engineer".to_string()))
        );
        assert_eq!(AnalysisRequest::Text(String::new()).path(), "/analyze");
    }

    #[test]
    fn test_blank_text_not_submittable() {
        assert!(AnalysisRequest::from_input(&ResumeInput::Empty).is_none());
        assert!(AnalysisRequest::from_input(&ResumeInput::Text("  \n\t".into())).is_none());
    }

    #[test]
    fn test_result_parses_wire_format() {
        let json = r#"{"ats_score": 82, "strengths": ["Clear experience"], "weaknesses": [],
            "missing_skills": ["Kubernetes"], "improvement_suggestions": ["Add metrics"]}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.ats_score, 82);
        assert!(result.weaknesses.is_empty());
        assert_eq!(result.missing_skills, vec!["Kubernetes"]);
    }

    #[test]
    fn test_float_score_truncates() {
        let json = r#"{"ats_score": 67.9, "strengths": [], "weaknesses": [],
            "missing_skills": [], "improvement_suggestions": []}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.ats_score, 67);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let json = r#"{"ats_score": 50, "strengths": []}"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn test_result_serializes_snake_case() {
        let result = AnalysisResult {
            ats_score: 40,
            strengths: vec![],
            weaknesses: vec!["Gaps".into()],
            missing_skills: vec![],
            improvement_suggestions: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["ats_score"], 40);
        assert_eq!(value["weaknesses"][0], "Gaps");
        assert!(value.get("improvement_suggestions").is_some());
    }

    #[test]
    fn test_report_file_name() {
        let doc = ReportDocument {
            extension: "pdf".into(),
            bytes: vec![],
        };
        assert_eq!(doc.file_name(), "resume-analysis-report.pdf");
    }
}
