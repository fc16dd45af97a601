//! Login state machine with a time-boxed TOTP second factor.
//!
//! TOTP codes are 6-digit with a 30-second step. A code is only submitted
//! when enough of its step remains for the request to land before it expires.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use rollcall_core::{AppError, AppResult, UserIdentity};
use rollcall_domain::SecondFactorKey;

use crate::{AuthProvider, RunContext};

/// Minimum seconds a code must stay valid before it is submitted.
pub const MIN_CODE_VALIDITY_SECONDS: u64 = 5;

/// Port for TOTP code generation. Infrastructure provides the implementation.
pub trait TotpProvider: Send + Sync {
    /// Returns the seconds left before the current time step rolls over.
    fn seconds_remaining(&self, key: &SecondFactorKey) -> AppResult<u64>;

    /// Generates the code for the current time step.
    fn current_code(&self, key: &SecondFactorKey) -> AppResult<String>;
}

/// Login progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No identity query issued yet.
    Unauthenticated,
    /// Primary credentials were accepted but a code is required.
    AwaitingSecondFactor,
    /// Login finished with a usable identity.
    Authenticated(UserIdentity),
    /// The second factor was submitted and the provider still has no identity.
    Failed,
}

/// Application service that yields the acting user's identity.
#[derive(Clone)]
pub struct AuthSessionService {
    auth_provider: Arc<dyn AuthProvider>,
    totp_provider: Arc<dyn TotpProvider>,
    second_factor_key: SecondFactorKey,
}

impl AuthSessionService {
    /// Creates a new auth session service.
    #[must_use]
    pub fn new(
        auth_provider: Arc<dyn AuthProvider>,
        totp_provider: Arc<dyn TotpProvider>,
        second_factor_key: SecondFactorKey,
    ) -> Self {
        Self {
            auth_provider,
            totp_provider,
            second_factor_key,
        }
    }

    /// Logs in, answering a second factor challenge if one is raised.
    ///
    /// Returns the identity or an error; there is no partially authenticated
    /// outcome. The identity is re-queried exactly once after the code.
    pub async fn login(&self, context: &RunContext) -> AppResult<UserIdentity> {
        let mut state = AuthState::Unauthenticated;

        loop {
            context.ensure_active()?;

            state = match state {
                AuthState::Unauthenticated => {
                    info!("logging in");
                    match context.run(self.auth_provider.current_identity()).await? {
                        Some(identity) => AuthState::Authenticated(identity),
                        None => {
                            info!("second factor required");
                            AuthState::AwaitingSecondFactor
                        }
                    }
                }
                AuthState::AwaitingSecondFactor => {
                    self.submit_second_factor(context).await?;
                    match context.run(self.auth_provider.current_identity()).await? {
                        Some(identity) => AuthState::Authenticated(identity),
                        None => AuthState::Failed,
                    }
                }
                AuthState::Authenticated(identity) => {
                    info!(
                        user_id = %identity.user_id(),
                        display_name = %identity.display_name(),
                        "logged in"
                    );
                    return Ok(identity);
                }
                AuthState::Failed => {
                    warn!("second factor was not accepted");
                    return Err(AppError::Auth(
                        "failed to validate second factor".to_owned(),
                    ));
                }
            };
        }
    }

    async fn submit_second_factor(&self, context: &RunContext) -> AppResult<()> {
        let remaining_seconds = self
            .totp_provider
            .seconds_remaining(&self.second_factor_key)?;

        if remaining_seconds < MIN_CODE_VALIDITY_SECONDS {
            info!(remaining_seconds, "waiting for next second factor time step");
            context
                .sleep(Duration::from_secs(remaining_seconds.saturating_add(1)))
                .await?;
        }

        let code = self.totp_provider.current_code(&self.second_factor_key)?;
        info!("submitting second factor code");
        context
            .run(self.auth_provider.verify_second_factor(code.as_str()))
            .await
    }
}
