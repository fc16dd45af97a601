use std::future::Future;
use std::time::Duration;

use rollcall_core::{AppError, AppResult};
use tokio_util::sync::CancellationToken;

/// Per-run context threaded through every stage.
///
/// Carries the cancellation signal observed at each suspension point and at
/// the head of every loop iteration.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    cancel_token: CancellationToken,
}

impl RunContext {
    /// Creates a context with a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context driven by an existing token.
    #[must_use]
    pub fn with_cancel_token(cancel_token: CancellationToken) -> Self {
        Self { cancel_token }
    }

    /// Returns the token so callers can trigger cancellation.
    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Fails with [`AppError::Cancelled`] once cancellation was requested.
    pub fn ensure_active(&self) -> AppResult<()> {
        if self.cancel_token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        Ok(())
    }

    /// Sleeps for `duration` unless cancelled first.
    pub async fn sleep(&self, duration: Duration) -> AppResult<()> {
        tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => Err(AppError::Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Runs a provider call, abandoning it if cancellation arrives first.
    pub async fn run<T, F>(&self, operation: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => Err(AppError::Cancelled),
            result = operation => result,
        }
    }
}
