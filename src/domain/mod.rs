//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    AnalysisRequest, AnalysisResult, Notice, PDF_MIME, REPORT_FILE_STEM, ReportDocument,
    ResumeDocument, ResumeInput,
};
pub use errors::DomainError;
