//! Implements ReportSinkPort by writing exported reports to a directory.
//!
//! The file name is fixed (`resume-analysis-report.<ext>`); a later export replaces it.

use crate::domain::{DomainError, ReportDocument};
use crate::ports::ReportSinkPort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Filesystem "download folder" for reports.
pub struct FsReportSink {
    dir: PathBuf,
}

impl FsReportSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

/// Removes the temp file on drop unless it was renamed into place. Covers both
/// the error returns and a cancelled save.
struct TempFile {
    path: PathBuf,
    persisted: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.persisted && std::fs::remove_file(&self.path).is_ok() {
            debug!(path = %self.path.display(), "removed leftover temp report");
        }
    }
}

#[async_trait::async_trait]
impl ReportSinkPort for FsReportSink {
    /// Atomic save: temp file, sync_all, rename. A crash mid-write never leaves a
    /// truncated report under the final name.
    async fn save(&self, report: &ReportDocument) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Io(format!("create output dir: {}", e)))?;

        let path = self.dir.join(report.file_name());
        let temp_path = self.dir.join(format!(".{}.tmp", report.file_name()));

        let mut temp = TempFile::new(temp_path);
        let mut f = fs::File::create(&temp.path)
            .await
            .map_err(|e| DomainError::Io(format!("create temp file: {}", e)))?;
        f.write_all(&report.bytes)
            .await
            .map_err(|e| DomainError::Io(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Io(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp.path, &path)
            .await
            .map_err(|e| DomainError::Io(format!("atomic rename failed: {}", e)))?;
        temp.persisted = true;

        debug!(path = %path.display(), bytes = report.bytes.len(), "report written");
        Ok(path)
    }
}
