//! Analysis orchestrator. Owns the input, the pending flag and the last result.
//!
//! Coordinates between the analysis service (network), the report sink (filesystem) and
//! the notifier (user alerts). Errors stop here; presentation only ever sees results.

use crate::domain::{AnalysisResult, DomainError, Notice, ResumeDocument, ResumeInput};
use crate::ports::{AnalysisPort, NotifierPort, ReportSinkPort};
use crate::usecases::state::{OrchestratorState, SubmitRejection};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Analyzed(AnalysisResult),
    /// Nothing to submit; no request was made.
    Invalid,
    /// Another analysis is pending; no request was made.
    Busy,
    /// Request made but failed (transport, status or body).
    Failed,
}

/// Result of one report export attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    NoResult,
    InProgress,
    Failed,
}

/// Service that validates input, dispatches the matching request and stores the result.
pub struct AnalysisOrchestrator {
    analysis: Arc<dyn AnalysisPort>,
    reports: Arc<dyn ReportSinkPort>,
    notifier: Arc<dyn NotifierPort>,
    /// Never held across an await.
    state: Mutex<OrchestratorState>,
    /// Export in flight. Separate from the analysis pending flag.
    exporting: AtomicBool,
}

impl AnalysisOrchestrator {
    pub fn new(
        analysis: Arc<dyn AnalysisPort>,
        reports: Arc<dyn ReportSinkPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            analysis,
            reports,
            notifier,
            state: Mutex::new(OrchestratorState::default()),
            exporting: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.state().set_text(text.into());
    }

    pub fn set_document(&self, document: ResumeDocument) {
        info!(file = %document.file_name, bytes = document.bytes.len(), "document attached");
        self.state().set_document(document);
    }

    pub fn clear_input(&self) {
        self.state().clear_input();
    }

    pub fn input(&self) -> ResumeInput {
        self.state().input().clone()
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.state().result().cloned()
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Submit the current input for analysis.
    ///
    /// Picks exactly one request encoding (document first, else text). The previous
    /// result is cleared before the request goes out. Always ends idle.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = match self.state().begin_submit() {
            Ok(request) => request,
            Err(SubmitRejection::Busy) => {
                warn!("analysis already pending; submit ignored");
                return SubmitOutcome::Busy;
            }
            Err(SubmitRejection::MissingInput) => {
                self.notifier.notify(Notice::MissingInput);
                return SubmitOutcome::Invalid;
            }
        };
        let pending = PendingGuard { state: &self.state };

        info!(route = request.path(), "submitting resume for analysis");

        match self.analysis.analyze(&request).await {
            Ok(result) => {
                info!(ats_score = result.ats_score, "analysis complete");
                pending.lock().resolve_success(result.clone());
                SubmitOutcome::Analyzed(result)
            }
            Err(e) => {
                error!(error = %e, route = request.path(), "analysis failed");
                pending.lock().resolve_failure();
                self.notifier.notify(Notice::AnalysisFailed);
                SubmitOutcome::Failed
            }
        }
    }

    /// Request a rendered report for the stored result and save it.
    ///
    /// Does not touch the pending flag or the stored result. Only one export runs at a time.
    pub async fn export_report(&self) -> ExportOutcome {
        let Some(result) = self.result() else {
            self.notifier.notify(Notice::ReportUnavailable);
            return ExportOutcome::NoResult;
        };

        if self
            .exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.notifier.notify(Notice::ReportInProgress);
            return ExportOutcome::InProgress;
        }
        let _exporting = ExportGuard(&self.exporting);

        match self.download(&result).await {
            Ok(path) => {
                info!(path = %path.display(), "report saved");
                self.notifier.notify(Notice::ReportSaved(path.clone()));
                ExportOutcome::Saved(path)
            }
            Err(e) => {
                error!(error = %e, "report export failed");
                self.notifier.notify(Notice::ReportFailed);
                ExportOutcome::Failed
            }
        }
    }

    async fn download(&self, result: &AnalysisResult) -> Result<PathBuf, DomainError> {
        let report = self.analysis.render_report(result).await?;
        self.reports.save(&report).await
    }
}

/// Returns the state to idle if a submit future is dropped before it resolves.
struct PendingGuard<'a> {
    state: &'a Mutex<OrchestratorState>,
}

impl PendingGuard<'_> {
    fn lock(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.lock();
        if state.is_pending() {
            state.resolve_failure();
        }
    }
}

struct ExportGuard<'a>(&'a AtomicBool);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
