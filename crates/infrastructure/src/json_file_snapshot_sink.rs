use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rollcall_application::SnapshotSink;
use rollcall_core::{AppError, AppResult};
use rollcall_domain::RosterSnapshot;
use tracing::info;

/// File name of the snapshot inside the output directory.
pub const SNAPSHOT_FILE_NAME: &str = "output.json";

/// Writes snapshots as compact JSON to `<workspace>/<output>/output.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotSink {
    output_directory: PathBuf,
}

impl JsonFileSnapshotSink {
    /// Creates a sink targeting `output` nested under `workspace`.
    #[must_use]
    pub fn new(workspace: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            output_directory: workspace.as_ref().join(output),
        }
    }

    /// Returns the path the snapshot is written to.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.output_directory.join(SNAPSHOT_FILE_NAME)
    }
}

#[async_trait]
impl SnapshotSink for JsonFileSnapshotSink {
    async fn write_snapshot(&self, snapshot: &RosterSnapshot) -> AppResult<()> {
        let payload = serde_json::to_vec(snapshot)
            .map_err(|error| AppError::Internal(format!("failed to encode snapshot: {error}")))?;

        tokio::fs::create_dir_all(&self.output_directory)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to create output directory '{}': {error}",
                    self.output_directory.display()
                ))
            })?;

        // Written beside the target then renamed so readers never observe a
        // truncated file.
        let target = self.snapshot_path();
        let staging = target.with_extension("json.partial");
        tokio::fs::write(&staging, &payload)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write '{}': {error}",
                    staging.display()
                ))
            })?;
        tokio::fs::rename(&staging, &target)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to move snapshot into '{}': {error}",
                    target.display()
                ))
            })?;

        info!(path = %target.display(), bytes = payload.len(), "snapshot file written");
        Ok(())
    }
}
