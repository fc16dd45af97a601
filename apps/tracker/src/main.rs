//! Rollcall group roster snapshot runner.

#![forbid(unsafe_code)]

mod tracker_config;

use std::process::ExitCode;
use std::sync::Arc;

use rollcall_application::{
    AuthSessionService, GroupRosterService, RunContext, SnapshotService,
};
use rollcall_core::{AppError, AppResult};
use rollcall_infrastructure::{
    JsonFileSnapshotSink, TotpRsProvider, VrchatApiClient, VrchatApiConfig,
};
use tracing::{error, info, warn};

use crate::tracker_config::{TrackerConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match TrackerConfig::load() {
        Ok(config) => config,
        Err(error) => return report_failure(&error),
    };

    let context = RunContext::new();
    spawn_interrupt_listener(context.clone());

    let result = match build_snapshot_service(&config) {
        Ok(service) => service.run(&context, config.group_id.as_str()).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(report) => {
            info!(
                group_name = %report.group_name,
                role_count = report.role_count,
                member_count = report.member_count,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(error) => report_failure(&error),
    }
}

fn build_snapshot_service(config: &TrackerConfig) -> AppResult<SnapshotService> {
    let totp_provider = TotpRsProvider::new();
    totp_provider.validate_key(&config.second_factor_key)?;

    let api_client = Arc::new(VrchatApiClient::new(VrchatApiConfig {
        base_url: config.api_base_url.clone(),
        username: config.username.clone(),
        password: config.password.clone(),
        user_agent: config.user_agent.clone(),
    })?);

    let auth_session_service = AuthSessionService::new(
        api_client.clone(),
        Arc::new(totp_provider),
        config.second_factor_key.clone(),
    );
    let group_roster_service = GroupRosterService::new(api_client);
    let snapshot_sink = Arc::new(JsonFileSnapshotSink::new(
        &config.workspace,
        &config.output,
    ));
    info!(path = %snapshot_sink.snapshot_path().display(), "snapshot target");

    Ok(SnapshotService::new(
        auth_session_service,
        group_roster_service,
        snapshot_sink,
    ))
}

fn spawn_interrupt_listener(context: RunContext) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling run");
            context.cancel_token().cancel();
        }
    });
}

fn report_failure(error: &AppError) -> ExitCode {
    match error.status() {
        Some(status) => error!(kind = error.kind(), status, error = %error, "snapshot run failed"),
        None => error!(kind = error.kind(), error = %error, "snapshot run failed"),
    }

    ExitCode::from(error.exit_code())
}
