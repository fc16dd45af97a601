//! Scripted provider doubles shared by the service tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use rollcall_core::{AppError, AppResult, UserIdentity};
use rollcall_domain::{
    GroupMember, GroupMembership, GroupRole, GroupSummary, RosterSnapshot, SecondFactorKey,
};

use crate::{AuthProvider, GroupProvider, MemberPageRequest, SnapshotSink, TotpProvider};

fn lock_error(error: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("failed to lock fake state: {error}"))
}

pub(crate) fn test_key() -> SecondFactorKey {
    match SecondFactorKey::new("JBSWY3DPEHPK3PXP") {
        Ok(key) => key,
        Err(error) => panic!("test key must be valid: {error}"),
    }
}

pub(crate) fn member(user_id: &str, display_name: &str, role_ids: &[&str]) -> GroupMember {
    GroupMember {
        membership_id: Some(format!("gmem_{user_id}")),
        user_id: user_id.to_owned(),
        display_name: display_name.to_owned(),
        role_ids: role_ids.iter().map(|role_id| (*role_id).to_owned()).collect(),
        joined_at: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeAuthProvider {
    pub identities: Mutex<VecDeque<Option<UserIdentity>>>,
    pub submitted_codes: Mutex<Vec<(String, Instant)>>,
    pub reject_code: bool,
}

impl FakeAuthProvider {
    pub(crate) fn scripted(identities: Vec<Option<UserIdentity>>) -> Self {
        Self {
            identities: Mutex::new(identities.into()),
            ..Self::default()
        }
    }

    pub(crate) fn submitted(&self) -> Vec<(String, Instant)> {
        self.submitted_codes
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn current_identity(&self) -> AppResult<Option<UserIdentity>> {
        Ok(self
            .identities
            .lock()
            .map_err(lock_error)?
            .pop_front()
            .flatten())
    }

    async fn verify_second_factor(&self, code: &str) -> AppResult<()> {
        self.submitted_codes
            .lock()
            .map_err(lock_error)?
            .push((code.to_owned(), Instant::now()));

        if self.reject_code {
            return Err(AppError::Auth("invalid second factor code".to_owned()));
        }

        Ok(())
    }
}

pub(crate) struct FakeTotpProvider {
    pub remaining_seconds: u64,
}

impl TotpProvider for FakeTotpProvider {
    fn seconds_remaining(&self, _key: &SecondFactorKey) -> AppResult<u64> {
        Ok(self.remaining_seconds)
    }

    fn current_code(&self, _key: &SecondFactorKey) -> AppResult<String> {
        Ok("123456".to_owned())
    }
}

pub(crate) struct FakeGroupProvider {
    pub summary: GroupSummary,
    pub roles: Vec<GroupRole>,
    pub listing: Vec<GroupMember>,
    pub max_page_size: usize,
    pub fail_on_request: Option<usize>,
    pub requests: Mutex<Vec<(MemberPageRequest, Instant)>>,
}

impl FakeGroupProvider {
    pub(crate) fn new(
        member_count: usize,
        my_membership: Option<GroupMembership>,
        roles: Vec<GroupRole>,
        listing: Vec<GroupMember>,
    ) -> Self {
        Self {
            summary: GroupSummary {
                id: "grp_test".to_owned(),
                name: "Test Group".to_owned(),
                member_count,
                my_membership,
            },
            roles,
            listing,
            max_page_size: usize::MAX,
            fail_on_request: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn recorded(&self) -> Vec<(MemberPageRequest, Instant)> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GroupProvider for FakeGroupProvider {
    async fn group(&self, _group_id: &str) -> AppResult<GroupSummary> {
        Ok(self.summary.clone())
    }

    async fn roles(&self, _group_id: &str) -> AppResult<Vec<GroupRole>> {
        Ok(self.roles.clone())
    }

    async fn members(
        &self,
        _group_id: &str,
        request: MemberPageRequest,
    ) -> AppResult<Vec<GroupMember>> {
        let request_number = {
            let mut requests = self.requests.lock().map_err(lock_error)?;
            requests.push((request, Instant::now()));
            requests.len()
        };

        if self.fail_on_request == Some(request_number) {
            return Err(AppError::provider_status("rate limited", 429));
        }

        let take = request.limit.min(self.max_page_size);
        Ok(self
            .listing
            .iter()
            .skip(request.offset)
            .take(take)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct RecordingSnapshotSink {
    pub written: Mutex<Vec<RosterSnapshot>>,
}

impl RecordingSnapshotSink {
    pub(crate) fn written_count(&self) -> usize {
        self.written.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SnapshotSink for RecordingSnapshotSink {
    async fn write_snapshot(&self, snapshot: &RosterSnapshot) -> AppResult<()> {
        self.written
            .lock()
            .map_err(lock_error)?
            .push(snapshot.clone());
        Ok(())
    }
}
