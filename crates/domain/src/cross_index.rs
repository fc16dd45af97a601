use std::collections::HashSet;

use crate::group::{GroupMember, GroupRole};
use crate::snapshot::{RosterSnapshot, TrackedMember, TrackedRole};

impl RosterSnapshot {
    /// Builds a snapshot from already ordered roles and members.
    ///
    /// Index positions are taken from the input order, so callers must sort
    /// first (see [`crate::order_roles`] and [`crate::order_members`]). Role ids
    /// held by a member that match no role are ignored.
    #[must_use]
    pub fn build(roles: &[GroupRole], members: &[GroupMember]) -> Self {
        let member_role_sets: Vec<HashSet<&str>> = members
            .iter()
            .map(|member| member.role_ids.iter().map(String::as_str).collect())
            .collect();

        let tracked_roles = roles
            .iter()
            .map(|role| {
                let member_indexes = member_role_sets
                    .iter()
                    .enumerate()
                    .filter(|(_, role_ids)| role_ids.contains(role.id.as_str()))
                    .map(|(member_index, _)| member_index)
                    .collect();

                TrackedRole::new(role.id.clone(), role.name.clone(), member_indexes)
            })
            .collect();

        let tracked_members = members
            .iter()
            .zip(&member_role_sets)
            .map(|(member, role_ids)| {
                let role_indexes = roles
                    .iter()
                    .enumerate()
                    .filter(|(_, role)| role_ids.contains(role.id.as_str()))
                    .map(|(role_index, _)| role_index)
                    .collect();

                TrackedMember::new(
                    member.user_id.clone(),
                    member.display_name.clone(),
                    role_indexes,
                )
            })
            .collect();

        Self::from_parts(tracked_roles, tracked_members)
    }
}
