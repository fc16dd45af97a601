use std::path::{Path, PathBuf};

use clap::Parser;
use rollcall_core::{AppError, NonEmptyString};
use rollcall_domain::SecondFactorKey;
use rollcall_infrastructure::DEFAULT_VRCHAT_API_BASE_URL;
use tracing_subscriber::EnvFilter;

/// Command line surface. Every flag can also be supplied through the
/// environment, which keeps secrets out of process listings.
#[derive(Debug, Parser)]
#[command(name = "rollcall-tracker")]
#[command(about = "Snapshot a VRChat group's roles and members into output.json")]
pub struct Cli {
    /// Workspace directory the output directory is created under.
    #[arg(short, long, env = "ROLLCALL_WORKSPACE")]
    pub workspace: PathBuf,

    /// Output directory name, relative to the workspace.
    #[arg(short, long, env = "ROLLCALL_OUTPUT")]
    pub output: String,

    /// Account username or email.
    #[arg(short, long, env = "ROLLCALL_USERNAME")]
    pub username: String,

    /// Account password.
    #[arg(short, long, env = "ROLLCALL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Base32 TOTP shared key. Spaces are ignored.
    #[arg(short, long, env = "ROLLCALL_TOTP_KEY", hide_env_values = true)]
    pub key: String,

    /// Group identifier, e.g. `grp_...`.
    #[arg(short, long, env = "ROLLCALL_GROUP")]
    pub group: String,

    /// User agent sent with every API request.
    #[arg(
        long,
        env = "ROLLCALL_USER_AGENT",
        default_value = concat!("rollcall/", env!("CARGO_PKG_VERSION"))
    )]
    pub user_agent: String,

    /// API root URL.
    #[arg(long, env = "ROLLCALL_API_BASE_URL", default_value = DEFAULT_VRCHAT_API_BASE_URL)]
    pub api_base_url: String,
}

pub struct TrackerConfig {
    pub workspace: PathBuf,
    pub output: PathBuf,
    pub username: String,
    pub password: String,
    pub second_factor_key: SecondFactorKey,
    pub group_id: String,
    pub user_agent: String,
    pub api_base_url: String,
}

impl TrackerConfig {
    /// Parses the command line. Usage errors exit with status 2 via clap.
    pub fn load() -> Result<Self, AppError> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, AppError> {
        let output = required("output", cli.output)?;
        if Path::new(output.as_str()).is_absolute() {
            return Err(AppError::Config(format!(
                "output must be relative to the workspace, got '{}'",
                output.as_str()
            )));
        }

        if cli.workspace.as_os_str().is_empty() {
            return Err(AppError::Config("workspace must not be empty".to_owned()));
        }

        Ok(Self {
            workspace: cli.workspace,
            output: PathBuf::from(String::from(output)),
            username: required("username", cli.username)?.into(),
            password: required("password", cli.password)?.into(),
            second_factor_key: SecondFactorKey::new(cli.key)?,
            group_id: required("group", cli.group)?.into(),
            user_agent: required("user-agent", cli.user_agent)?.into(),
            api_base_url: required("api-base-url", cli.api_base_url)?.into(),
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required(name: &str, value: String) -> Result<NonEmptyString, AppError> {
    NonEmptyString::new(value).map_err(|_| AppError::Config(format!("{name} must not be empty")))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rollcall_core::AppError;

    use super::{Cli, TrackerConfig};

    fn parse(output: &str, group: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from([
            "rollcall-tracker",
            "-w",
            "/tmp/workspace",
            "-o",
            output,
            "-u",
            "bot@example.com",
            "-p",
            "hunter2",
            "-k",
            "JBSW Y3DP EHPK 3PXP",
            "-g",
            group,
        ])
    }

    #[test]
    fn short_flags_build_config() {
        let config = parse("snapshots", "grp_0000")
            .map_err(|error| AppError::Config(error.to_string()))
            .and_then(TrackerConfig::from_cli);

        let Ok(config) = config else {
            panic!("config should parse");
        };
        assert_eq!(config.group_id, "grp_0000");
        assert_eq!(config.output.to_str(), Some("snapshots"));
        assert_eq!(config.second_factor_key.as_base32(), "JBSWY3DPEHPK3PXP");
        assert_eq!(config.api_base_url, "https://api.vrchat.cloud/api/1");
        assert!(config.user_agent.starts_with("rollcall/"));
    }

    #[test]
    fn missing_required_flag_is_usage_error() {
        let result = Cli::try_parse_from(["rollcall-tracker", "-w", "/tmp/workspace"]);
        assert!(result.is_err_and(|error| error.exit_code() == 2));
    }

    #[test]
    fn blank_group_is_config_error() {
        let result = parse("snapshots", "  ")
            .map_err(|error| AppError::Config(error.to_string()))
            .and_then(TrackerConfig::from_cli);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn absolute_output_is_rejected() {
        let result = parse("/etc", "grp_0000")
            .map_err(|error| AppError::Config(error.to_string()))
            .and_then(TrackerConfig::from_cli);

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
