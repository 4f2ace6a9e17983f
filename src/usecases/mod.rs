//! Application use cases. Orchestrate domain logic via ports.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{AnalysisOrchestrator, ExportOutcome, SubmitOutcome};
pub use state::{OrchestratorState, SubmitRejection};
