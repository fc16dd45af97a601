//! Serialized roster snapshot with bidirectional role/member indexes.

use rollcall_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Role entry in a snapshot, listing positions of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRole {
    id: String,
    name: String,
    member_indexes: Vec<usize>,
}

impl TrackedRole {
    pub(crate) fn new(id: String, name: String, member_indexes: Vec<usize>) -> Self {
        Self {
            id,
            name,
            member_indexes,
        }
    }

    /// Returns the provider role identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns ascending positions into [`RosterSnapshot::members`].
    #[must_use]
    pub fn member_indexes(&self) -> &[usize] {
        &self.member_indexes
    }
}

/// Member entry in a snapshot, listing positions of the roles they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedMember {
    id: String,
    name: String,
    role_indexes: Vec<usize>,
}

impl TrackedMember {
    pub(crate) fn new(id: String, name: String, role_indexes: Vec<usize>) -> Self {
        Self {
            id,
            name,
            role_indexes,
        }
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the member's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns ascending positions into [`RosterSnapshot::roles`].
    #[must_use]
    pub fn role_indexes(&self) -> &[usize] {
        &self.role_indexes
    }
}

/// Immutable point-in-time roster of a group.
///
/// Built once by [`RosterSnapshot::build`]; the role and member index arrays
/// encode the same membership relation from both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    roles: Vec<TrackedRole>,
    members: Vec<TrackedMember>,
}

impl RosterSnapshot {
    pub(crate) fn from_parts(roles: Vec<TrackedRole>, members: Vec<TrackedMember>) -> Self {
        Self { roles, members }
    }

    /// Returns roles in name order.
    #[must_use]
    pub fn roles(&self) -> &[TrackedRole] {
        &self.roles
    }

    /// Returns members in display name order.
    #[must_use]
    pub fn members(&self) -> &[TrackedMember] {
        &self.members
    }

    /// Checks that every index is in bounds and the two index arrays are
    /// inverses of each other.
    pub fn verify_cross_index(&self) -> AppResult<()> {
        for (role_index, role) in self.roles.iter().enumerate() {
            for &member_index in role.member_indexes() {
                let member = self.members.get(member_index).ok_or_else(|| {
                    AppError::Internal(format!(
                        "role '{}' references member index {member_index} out of bounds",
                        role.id
                    ))
                })?;

                if member.role_indexes.binary_search(&role_index).is_err() {
                    return Err(AppError::Internal(format!(
                        "member '{}' is missing back-reference to role '{}'",
                        member.id, role.id
                    )));
                }
            }
        }

        for (member_index, member) in self.members.iter().enumerate() {
            for &role_index in member.role_indexes() {
                let role = self.roles.get(role_index).ok_or_else(|| {
                    AppError::Internal(format!(
                        "member '{}' references role index {role_index} out of bounds",
                        member.id
                    ))
                })?;

                if role.member_indexes.binary_search(&member_index).is_err() {
                    return Err(AppError::Internal(format!(
                        "role '{}' is missing back-reference to member '{}'",
                        role.id, member.id
                    )));
                }
            }
        }

        Ok(())
    }
}
