//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_session_service;
mod group_roster_service;
mod provider_ports;
mod run_context;
mod snapshot_service;
#[cfg(test)]
mod test_support;

pub use auth_session_service::{
    AuthSessionService, AuthState, MIN_CODE_VALIDITY_SECONDS, TotpProvider,
};
pub use group_roster_service::{
    GroupRoster, GroupRosterService, MEMBER_PAGE_DELAY, MEMBER_PAGE_SIZE,
};
pub use provider_ports::{AuthProvider, GroupProvider, MemberPageRequest};
pub use run_context::RunContext;
pub use snapshot_service::{SnapshotReport, SnapshotService, SnapshotSink};
