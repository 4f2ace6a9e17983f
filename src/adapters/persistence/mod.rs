//! Filesystem adapters. Implement ReportSinkPort.

pub mod report_fs;

pub use report_fs::FsReportSink;
