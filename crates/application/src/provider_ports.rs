//! Ports for the remote identity and group provider.

use async_trait::async_trait;

use rollcall_core::{AppResult, UserIdentity};
use rollcall_domain::{GroupMember, GroupRole, GroupSummary};

/// Identity provider capabilities used during login.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the current user, or `None` when a second factor is required.
    async fn current_identity(&self) -> AppResult<Option<UserIdentity>>;

    /// Submits a one-time code for the pending second factor challenge.
    async fn verify_second_factor(&self, code: &str) -> AppResult<()>;
}

/// One page request against the member listing, oldest joins first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberPageRequest {
    /// Maximum number of members to return.
    pub limit: usize,
    /// Number of listing records to skip.
    pub offset: usize,
}

/// Group provider capabilities used to build a roster.
#[async_trait]
pub trait GroupProvider: Send + Sync {
    /// Fetches the group summary including the caller's own membership.
    async fn group(&self, group_id: &str) -> AppResult<GroupSummary>;

    /// Fetches every role defined on the group.
    async fn roles(&self, group_id: &str) -> AppResult<Vec<GroupRole>>;

    /// Fetches one page of members. The caller is never included.
    async fn members(
        &self,
        group_id: &str,
        request: MemberPageRequest,
    ) -> AppResult<Vec<GroupMember>>;
}
