//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response. Body is kept (truncated) for diagnostics only.
    #[error("Analysis service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Report export failed: {0}")]
    Report(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("UI error: {0}")]
    Ui(String),
}
