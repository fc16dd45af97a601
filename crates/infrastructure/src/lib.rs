//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod json_file_snapshot_sink;
mod totp_provider;
mod vrchat_api_client;

pub use json_file_snapshot_sink::{JsonFileSnapshotSink, SNAPSHOT_FILE_NAME};
pub use totp_provider::TotpRsProvider;
pub use vrchat_api_client::{DEFAULT_VRCHAT_API_BASE_URL, VrchatApiClient, VrchatApiConfig};
