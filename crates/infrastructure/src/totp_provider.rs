//! TOTP provider implementation using the `totp-rs` crate.

use rollcall_application::TotpProvider;
use rollcall_core::{AppError, AppResult};
use rollcall_domain::SecondFactorKey;
use totp_rs::{Algorithm, Secret, TOTP};

const TOTP_DIGITS: usize = 6;
const TOTP_STEP_SECONDS: u64 = 30;

/// TOTP provider with RFC 6238 parameters (SHA-1, 6 digits, 30 seconds).
#[derive(Clone, Default)]
pub struct TotpRsProvider;

impl TotpRsProvider {
    /// Creates a new TOTP provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decodes the key and checks it can produce codes.
    ///
    /// Called at startup so a malformed key fails before any network call.
    pub fn validate_key(&self, key: &SecondFactorKey) -> AppResult<()> {
        totp_for(key).map(|_| ())
    }
}

fn totp_for(key: &SecondFactorKey) -> AppResult<TOTP> {
    let secret_bytes = Secret::Encoded(key.as_base32().to_owned())
        .to_bytes()
        .map_err(|error| {
            AppError::Config(format!("second factor key is not valid base32: {error:?}"))
        })?;

    // Provider-issued keys are not guaranteed to meet the 128-bit minimum
    // enforced by `TOTP::new`.
    Ok(TOTP::new_unchecked(
        Algorithm::SHA1,
        TOTP_DIGITS,
        0,
        TOTP_STEP_SECONDS,
        secret_bytes,
        None,
        String::new(),
    ))
}

impl TotpProvider for TotpRsProvider {
    fn seconds_remaining(&self, key: &SecondFactorKey) -> AppResult<u64> {
        totp_for(key)?
            .ttl()
            .map_err(|error| AppError::Internal(format!("system clock error: {error}")))
    }

    fn current_code(&self, key: &SecondFactorKey) -> AppResult<String> {
        totp_for(key)?
            .generate_current()
            .map_err(|error| AppError::Internal(format!("failed to generate TOTP code: {error}")))
    }
}
