use std::sync::Arc;

use rollcall_core::{AppError, AppResult, UserIdentity};
use rollcall_domain::{GroupMembership, GroupRole};

use crate::test_support::{
    FakeAuthProvider, FakeGroupProvider, FakeTotpProvider, RecordingSnapshotSink, member,
    test_key,
};
use crate::{AuthSessionService, GroupRosterService, RunContext};

use super::SnapshotService;

fn own_membership() -> GroupMembership {
    GroupMembership {
        membership_id: "gmem_self".to_owned(),
        user_id: "usr_self".to_owned(),
        role_ids: vec!["grol_owner".to_owned(), "grol_member".to_owned()],
        joined_at: None,
        membership_status: Some("member".to_owned()),
    }
}

fn build_service(
    auth_identities: Vec<Option<UserIdentity>>,
    group_provider: FakeGroupProvider,
    sink: Arc<RecordingSnapshotSink>,
) -> SnapshotService {
    let auth_session_service = AuthSessionService::new(
        Arc::new(FakeAuthProvider::scripted(auth_identities)),
        Arc::new(FakeTotpProvider {
            remaining_seconds: 30,
        }),
        test_key(),
    );

    SnapshotService::new(
        auth_session_service,
        GroupRosterService::new(Arc::new(group_provider)),
        sink,
    )
}

fn identity() -> UserIdentity {
    UserIdentity::new("usr_self", "Carol")
}

#[tokio::test(start_paused = true)]
async fn run_writes_consistent_snapshot() -> AppResult<()> {
    let provider = FakeGroupProvider::new(
        3,
        Some(own_membership()),
        vec![
            GroupRole::new("grol_member", "Member"),
            GroupRole::new("grol_owner", "Owner"),
            GroupRole::new("grol_mod", "Moderator"),
        ],
        vec![
            member("usr_bob", "Bob", &["grol_member", "grol_mod"]),
            member("usr_alice", "Alice", &["grol_member"]),
        ],
    );
    let sink = Arc::new(RecordingSnapshotSink::default());
    let service = build_service(vec![None, Some(identity())], provider, sink.clone());

    let report = service.run(&RunContext::new(), "grp_test").await?;

    assert_eq!(report.member_count, 3);
    assert_eq!(report.role_count, 3);

    let written = sink
        .written
        .lock()
        .map(|guard| guard.clone())
        .map_err(|error| AppError::Internal(error.to_string()))?;
    assert_eq!(written.len(), 1);
    let snapshot = &written[0];

    let member_names: Vec<&str> = snapshot.members().iter().map(|member| member.name()).collect();
    assert_eq!(member_names, vec!["Alice", "Bob", "Carol"]);
    let role_names: Vec<&str> = snapshot.roles().iter().map(|role| role.name()).collect();
    assert_eq!(role_names, vec!["Member", "Moderator", "Owner"]);

    assert_eq!(snapshot.roles()[0].member_indexes(), &[0, 1, 2]);
    assert_eq!(snapshot.roles()[1].member_indexes(), &[1]);
    assert_eq!(snapshot.roles()[2].member_indexes(), &[2]);
    assert_eq!(snapshot.members()[2].role_indexes(), &[0, 2]);
    assert_eq!(
        snapshot
            .members()
            .iter()
            .filter(|member| member.id() == "usr_self")
            .count(),
        1
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn missing_membership_writes_nothing() {
    let provider = FakeGroupProvider::new(3, None, Vec::new(), Vec::new());
    let sink = Arc::new(RecordingSnapshotSink::default());
    let service = build_service(vec![Some(identity())], provider, sink.clone());

    let result = service.run(&RunContext::new(), "grp_test").await;

    assert!(matches!(result, Err(AppError::Membership(_))));
    assert_eq!(sink.written_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn provider_failure_mid_pagination_writes_nothing() {
    let mut provider = FakeGroupProvider::new(
        150,
        Some(own_membership()),
        Vec::new(),
        (0..149)
            .map(|index| member(&format!("usr_{index}"), &format!("User {index}"), &[]))
            .collect(),
    );
    provider.fail_on_request = Some(2);
    let sink = Arc::new(RecordingSnapshotSink::default());
    let service = build_service(vec![Some(identity())], provider, sink.clone());

    let result = service.run(&RunContext::new(), "grp_test").await;

    assert!(matches!(result, Err(AppError::Provider { .. })));
    assert_eq!(sink.written_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_second_factor_writes_nothing() {
    let provider = FakeGroupProvider::new(1, Some(own_membership()), Vec::new(), Vec::new());
    let sink = Arc::new(RecordingSnapshotSink::default());
    let service = build_service(vec![None, None], provider, sink.clone());

    let result = service.run(&RunContext::new(), "grp_test").await;

    assert!(matches!(result, Err(AppError::Auth(_))));
    assert_eq!(sink.written_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_run_writes_nothing() {
    let provider = FakeGroupProvider::new(1, Some(own_membership()), Vec::new(), Vec::new());
    let sink = Arc::new(RecordingSnapshotSink::default());
    let service = build_service(vec![Some(identity())], provider, sink.clone());
    let context = RunContext::new();
    context.cancel_token().cancel();

    let result = service.run(&context, "grp_test").await;

    assert!(matches!(result, Err(AppError::Cancelled)));
    assert_eq!(sink.written_count(), 0);
}
