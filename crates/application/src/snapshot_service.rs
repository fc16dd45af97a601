//! End-to-end snapshot run: login, roster, cross-index, write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use rollcall_core::AppResult;
use rollcall_domain::RosterSnapshot;

use crate::{AuthSessionService, GroupRosterService, RunContext};

/// Port for persisting a finished snapshot.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Writes a complete snapshot. Never called with partial data.
    async fn write_snapshot(&self, snapshot: &RosterSnapshot) -> AppResult<()>;
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReport {
    /// Group display name.
    pub group_name: String,
    /// Number of roles written.
    pub role_count: usize,
    /// Number of members written.
    pub member_count: usize,
}

/// Application service that produces and persists one roster snapshot.
#[derive(Clone)]
pub struct SnapshotService {
    auth_session_service: AuthSessionService,
    group_roster_service: GroupRosterService,
    snapshot_sink: Arc<dyn SnapshotSink>,
}

impl SnapshotService {
    /// Creates a new snapshot service.
    #[must_use]
    pub fn new(
        auth_session_service: AuthSessionService,
        group_roster_service: GroupRosterService,
        snapshot_sink: Arc<dyn SnapshotSink>,
    ) -> Self {
        Self {
            auth_session_service,
            group_roster_service,
            snapshot_sink,
        }
    }

    /// Captures and writes a snapshot of `group_id`.
    ///
    /// Nothing is written unless every stage succeeded.
    pub async fn run(&self, context: &RunContext, group_id: &str) -> AppResult<SnapshotReport> {
        let identity = self.auth_session_service.login(context).await?;
        let roster = self
            .group_roster_service
            .fetch_roster(context, group_id, &identity)
            .await?;

        let snapshot = RosterSnapshot::build(&roster.roles, &roster.members);
        snapshot.verify_cross_index()?;

        context.ensure_active()?;
        self.snapshot_sink.write_snapshot(&snapshot).await?;

        let report = SnapshotReport {
            group_name: roster.group_name,
            role_count: snapshot.roles().len(),
            member_count: snapshot.members().len(),
        };
        info!(
            group_id = %roster.group_id,
            group_name = %report.group_name,
            role_count = report.role_count,
            member_count = report.member_count,
            "snapshot written"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests;
