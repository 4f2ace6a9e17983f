//! Analysis service adapters. Implement AnalysisPort.
//!
//! Provides the reqwest client for the real service and a mock adapter for local use.

pub mod analysis_client;
pub mod mock_adapter;

pub use analysis_client::HttpAnalysisAdapter;
pub use mock_adapter::MockAnalysisAdapter;
