use std::fmt::{Debug, Formatter};

use rollcall_core::{AppError, AppResult};

/// Base32 shared key for one-time password generation.
///
/// Whitespace is stripped so keys copied with spacing (`ABCD EFGH ...`) are
/// accepted. Letters are upper-cased and trailing padding removed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecondFactorKey(String);

impl SecondFactorKey {
    /// Normalizes and validates a human-entered base32 key.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = value
            .as_ref()
            .chars()
            .filter(|character| !character.is_whitespace())
            .map(|character| character.to_ascii_uppercase())
            .collect();
        let normalized = normalized.trim_end_matches('=').to_owned();

        if normalized.is_empty() {
            return Err(AppError::Config(
                "second factor key must not be empty".to_owned(),
            ));
        }

        if let Some(invalid) = normalized
            .chars()
            .find(|character| !matches!(character, 'A'..='Z' | '2'..='7'))
        {
            return Err(AppError::Config(format!(
                "second factor key contains non-base32 character '{invalid}'"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized base32 text.
    #[must_use]
    pub fn as_base32(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for SecondFactorKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("SecondFactorKey(<redacted>)")
    }
}
