//! Orchestrator state. One cohesive object, mutated only through named transitions.

use crate::domain::{AnalysisRequest, AnalysisResult, ResumeDocument, ResumeInput};

/// Why a submission did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// An analysis request is already in flight.
    Busy,
    /// Blank text and no document.
    MissingInput,
}

/// Input, request state and last result.
#[derive(Debug, Default)]
pub struct OrchestratorState {
    input: ResumeInput,
    pending: bool,
    result: Option<AnalysisResult>,
}

impl OrchestratorState {
    pub fn input(&self) -> &ResumeInput {
        &self.input
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Non-empty text replaces whatever was there (last writer wins).
    /// Empty text never discards an attached document.
    pub fn set_text(&mut self, text: String) {
        if !text.is_empty() {
            self.input = ResumeInput::Text(text);
        } else if !matches!(self.input, ResumeInput::Document(_)) {
            self.input = ResumeInput::Empty;
        }
    }

    /// Attaching a document clears any text.
    pub fn set_document(&mut self, document: ResumeDocument) {
        self.input = ResumeInput::Document(document);
    }

    pub fn clear_input(&mut self) {
        self.input = ResumeInput::Empty;
    }

    /// idle -> pending. Drops the previous result so it is never shown during a new request.
    pub fn begin_submit(&mut self) -> Result<AnalysisRequest, SubmitRejection> {
        if self.pending {
            return Err(SubmitRejection::Busy);
        }
        let request = AnalysisRequest::from_input(&self.input).ok_or(SubmitRejection::MissingInput)?;
        self.result = None;
        self.pending = true;
        Ok(request)
    }

    /// pending -> idle with a fresh result.
    pub fn resolve_success(&mut self, result: AnalysisResult) {
        self.pending = false;
        self.result = Some(result);
    }

    /// pending -> idle, no result.
    pub fn resolve_failure(&mut self) {
        self.pending = false;
        self.result = None;
    }
}
