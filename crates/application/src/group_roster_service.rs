//! Group roster retrieval.
//!
//! Members are paginated at a fixed page size with a fixed pause between
//! requests. The listing never includes the caller, so pagination targets
//! `member_count - 1` and the caller's record is synthesized from the group
//! summary afterwards.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use rollcall_core::{AppError, AppResult, UserIdentity};
use rollcall_domain::{GroupMember, GroupRole, order_members, order_roles};

use crate::{GroupProvider, MemberPageRequest, RunContext};

/// Fixed member page size requested from the provider.
pub const MEMBER_PAGE_SIZE: usize = 100;

/// Fixed pause between successive member page requests.
pub const MEMBER_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Complete, name-ordered roster of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRoster {
    /// Group identifier.
    pub group_id: String,
    /// Group display name.
    pub group_name: String,
    /// Roles sorted by name.
    pub roles: Vec<GroupRole>,
    /// Members sorted by display name, including the acting user.
    pub members: Vec<GroupMember>,
}

/// Application service for fetching a group roster.
#[derive(Clone)]
pub struct GroupRosterService {
    group_provider: Arc<dyn GroupProvider>,
}

impl GroupRosterService {
    /// Creates a roster service.
    #[must_use]
    pub fn new(group_provider: Arc<dyn GroupProvider>) -> Self {
        Self { group_provider }
    }

    /// Fetches the group's roles and full member list.
    ///
    /// On success the member list has exactly `member_count` entries and the
    /// acting user appears once. Any provider failure discards the partial
    /// result.
    pub async fn fetch_roster(
        &self,
        context: &RunContext,
        group_id: &str,
        identity: &UserIdentity,
    ) -> AppResult<GroupRoster> {
        context.ensure_active()?;
        let summary = context.run(self.group_provider.group(group_id)).await?;
        info!(
            group_id = %summary.id,
            group_name = %summary.name,
            member_count = summary.member_count,
            "fetched group"
        );

        let Some(my_membership) = summary.my_membership.as_ref() else {
            return Err(AppError::Membership(format!(
                "user '{}' must be a member of group '{group_id}'",
                identity.user_id()
            )));
        };

        let Some(target) = summary.member_count.checked_sub(1) else {
            return Err(AppError::provider(format!(
                "group '{group_id}' reports no members but lists the caller's membership"
            )));
        };

        context.ensure_active()?;
        let roles = order_roles(context.run(self.group_provider.roles(group_id)).await?);
        info!(role_count = roles.len(), "fetched group roles");

        let mut members = self
            .fetch_other_members(context, group_id, identity, target)
            .await?;
        members.push(GroupMember::from_own_membership(identity, my_membership));
        let members = order_members(members);
        info!(member_count = members.len(), "fetched group members");

        debug_assert_eq!(members.len(), summary.member_count);

        Ok(GroupRoster {
            group_id: summary.id,
            group_name: summary.name,
            roles,
            members,
        })
    }

    async fn fetch_other_members(
        &self,
        context: &RunContext,
        group_id: &str,
        identity: &UserIdentity,
        target: usize,
    ) -> AppResult<Vec<GroupMember>> {
        let mut members: Vec<GroupMember> = Vec::with_capacity(target);
        let mut seen_user_ids = HashSet::from([identity.user_id().to_owned()]);
        let mut page_number = 0_usize;
        // Position in the provider listing; runs ahead of `members.len()` when
        // repeated records are skipped.
        let mut offset = 0_usize;

        while members.len() < target {
            context.ensure_active()?;
            if page_number > 0 {
                context.sleep(MEMBER_PAGE_DELAY).await?;
            }
            page_number = page_number.saturating_add(1);

            let request = MemberPageRequest {
                limit: MEMBER_PAGE_SIZE,
                offset,
            };
            let page = context
                .run(self.group_provider.members(group_id, request))
                .await?;

            if page.is_empty() {
                return Err(AppError::provider(format!(
                    "member pagination stalled at {} of {target} members",
                    members.len()
                )));
            }
            offset = offset.saturating_add(page.len());

            for member in page {
                if members.len() == target {
                    break;
                }
                if seen_user_ids.insert(member.user_id.clone()) {
                    members.push(member);
                } else {
                    debug!(user_id = %member.user_id, "skipping repeated member");
                }
            }

            info!(
                page = page_number,
                fetched = members.len(),
                target,
                "fetched member page"
            );
        }

        Ok(members)
    }
}
