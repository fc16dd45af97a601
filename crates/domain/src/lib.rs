//! Domain entities and invariants for group roster snapshots.

#![forbid(unsafe_code)]

mod collation;
mod cross_index;
mod group;
mod second_factor;
mod snapshot;

pub use collation::compare_names;
pub use group::{
    GroupMember, GroupMembership, GroupRole, GroupSummary, order_members, order_roles,
};
pub use second_factor::SecondFactorKey;
pub use snapshot::{RosterSnapshot, TrackedMember, TrackedRole};
