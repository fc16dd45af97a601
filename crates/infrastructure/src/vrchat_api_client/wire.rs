use serde::{Deserialize, Serialize};

use rollcall_core::UserIdentity;
use rollcall_domain::{GroupMember, GroupMembership, GroupRole, GroupSummary};

/// `GET /auth/user`. A pending second factor returns only
/// `requiresTwoFactorAuth`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CurrentUserResponse {
    id: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    requires_two_factor_auth: Vec<String>,
}

impl CurrentUserResponse {
    pub(super) fn into_identity(self) -> Option<UserIdentity> {
        if !self.requires_two_factor_auth.is_empty() {
            return None;
        }

        match (self.id, self.display_name) {
            (Some(id), Some(display_name)) => Some(UserIdentity::new(id, display_name)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct VerifyCodeRequest<'a> {
    pub code: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifyCodeResponse {
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GroupResponse {
    id: String,
    name: String,
    member_count: usize,
    my_member: Option<GroupMyMemberResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupMyMemberResponse {
    id: String,
    user_id: String,
    #[serde(default)]
    role_ids: Vec<String>,
    joined_at: Option<String>,
    membership_status: Option<String>,
}

impl From<GroupResponse> for GroupSummary {
    fn from(value: GroupResponse) -> Self {
        Self {
            id: value.id,
            name: value.name,
            member_count: value.member_count,
            my_membership: value.my_member.map(|member| GroupMembership {
                membership_id: member.id,
                user_id: member.user_id,
                role_ids: member.role_ids,
                joined_at: member.joined_at,
                membership_status: member.membership_status,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GroupRoleResponse {
    id: String,
    name: String,
}

impl From<GroupRoleResponse> for GroupRole {
    fn from(value: GroupRoleResponse) -> Self {
        Self::new(value.id, value.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GroupMemberResponse {
    id: Option<String>,
    user_id: String,
    user: Option<GroupMemberUserResponse>,
    #[serde(default)]
    role_ids: Vec<String>,
    joined_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupMemberUserResponse {
    display_name: String,
}

impl From<GroupMemberResponse> for GroupMember {
    fn from(value: GroupMemberResponse) -> Self {
        let display_name = value
            .user
            .map(|user| user.display_name)
            .unwrap_or_else(|| value.user_id.clone());

        Self {
            membership_id: value.id,
            user_id: value.user_id,
            display_name,
            role_ids: value.role_ids,
            joined_at: value.joined_at,
        }
    }
}
