//! Group roster value types as retrieved from the provider.

use std::collections::HashSet;

use rollcall_core::UserIdentity;
use serde::{Deserialize, Serialize};

use crate::collation::compare_names;

/// Role defined on a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRole {
    /// Provider role identifier.
    pub id: String,
    /// Role display name. Defines the index order of roles.
    pub name: String,
}

impl GroupRole {
    /// Creates a role value.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The acting user's own membership record from the group summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    /// Membership record identifier.
    pub membership_id: String,
    /// Identifier of the user the membership belongs to.
    pub user_id: String,
    /// Roles granted through this membership.
    pub role_ids: Vec<String>,
    /// Join timestamp as reported by the provider.
    pub joined_at: Option<String>,
    /// Membership status such as `member`.
    pub membership_status: Option<String>,
}

/// Group summary with the provider's authoritative member total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// Group identifier.
    pub id: String,
    /// Group display name.
    pub name: String,
    /// Total members including the acting user.
    pub member_count: usize,
    /// Membership of the acting user, absent when they are not a member.
    pub my_membership: Option<GroupMembership>,
}

/// One member of a group together with the roles they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Membership record identifier, when the provider returned one.
    pub membership_id: Option<String>,
    /// User identifier. Members are deduplicated on this value.
    pub user_id: String,
    /// User display name. Defines the index order of members.
    pub display_name: String,
    /// Roles held by the member.
    pub role_ids: Vec<String>,
    /// Join timestamp as reported by the provider.
    pub joined_at: Option<String>,
}

impl GroupMember {
    /// Synthesizes the acting user's member record.
    ///
    /// The paginated member listing never returns the caller, so identity
    /// fields come from the authenticated session and role data from the
    /// group summary.
    #[must_use]
    pub fn from_own_membership(identity: &UserIdentity, membership: &GroupMembership) -> Self {
        Self {
            membership_id: Some(membership.membership_id.clone()),
            user_id: identity.user_id().to_owned(),
            display_name: identity.display_name().to_owned(),
            role_ids: membership.role_ids.clone(),
            joined_at: membership.joined_at.clone(),
        }
    }
}

/// Deduplicates roles by id (first wins) and sorts them by name in
/// dictionary order.
#[must_use]
pub fn order_roles(roles: Vec<GroupRole>) -> Vec<GroupRole> {
    let mut seen = HashSet::new();
    let mut roles: Vec<GroupRole> = roles
        .into_iter()
        .filter(|role| seen.insert(role.id.clone()))
        .collect();
    roles.sort_by(|left, right| compare_names(&left.name, &right.name));
    roles
}

/// Sorts members by display name. Equal names keep their retrieval order.
#[must_use]
pub fn order_members(mut members: Vec<GroupMember>) -> Vec<GroupMember> {
    members.sort_by(|left, right| compare_names(&left.display_name, &right.display_name));
    members
}
