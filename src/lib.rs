pub mod commands;
pub mod core;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::{LaunchOutcome, LaunchRequest};
use crate::core::auth::{LaunchAccountProfile, UNSET_IDENTITY_FIELD};
use crate::core::config::LauncherConfig;
use crate::core::downloader::Downloader;
use crate::core::error::LauncherResult;

#[derive(Parser, Debug)]
#[command(
    name = "mclauncher",
    author,
    about = "Downloads a Minecraft release into a local cache and starts it",
    disable_version_flag = true
)]
pub struct Cli {
    /// Release id from the version manifest (e.g. 1.12.2).
    #[arg(long)]
    pub version: String,

    /// Player name passed as `--username`.
    #[arg(long)]
    pub username: String,

    /// Player UUID passed as `--uuid`.
    #[arg(long, default_value = UNSET_IDENTITY_FIELD)]
    pub uuid: String,

    /// Account type passed as `--userType` (e.g. msa).
    #[arg(long = "userType", default_value = UNSET_IDENTITY_FIELD)]
    pub user_type: String,

    /// Access token forwarded as `--accessToken`.
    #[arg(long, default_value = UNSET_IDENTITY_FIELD)]
    pub token: String,

    /// Cache root; defaults to `~/.MCLauncher`.
    #[arg(long)]
    pub game_dir: Option<PathBuf>,

    /// Materialize the release and print the command without starting it.
    #[arg(long)]
    pub no_launch: bool,
}

impl Cli {
    pub fn launch_request(&self) -> LaunchRequest {
        LaunchRequest {
            release_id: self.version.clone(),
            account: LaunchAccountProfile {
                username: self.username.clone(),
                uuid: self.uuid.clone(),
                access_token: self.token.clone(),
                user_type: self.user_type.clone(),
            },
            no_launch: self.no_launch,
        }
    }

    pub fn config(&self) -> LauncherResult<LauncherConfig> {
        match &self.game_dir {
            Some(dir) => Ok(LauncherConfig::new(dir)?.with_settings_from_disk()),
            None => LauncherConfig::from_home(),
        }
    }
}

pub fn run() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mclauncher_lib=debug")),
        )
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(&cli)) {
        Ok(LaunchOutcome::Prepared(_)) => ExitCode::SUCCESS,
        Ok(LaunchOutcome::Exited(status)) => status
            .code()
            .and_then(|code| u8::try_from(code).ok())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::FAILURE),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> LauncherResult<LaunchOutcome> {
    let config = cli.config()?;
    let downloader = Downloader::http()?;
    tracing::info!("MCLauncher using {:?}", config.game_dir());

    commands::launch_release(&config, &downloader, cli.launch_request()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_flags_default_to_placeholder() {
        let cli = Cli::try_parse_from(["mclauncher", "--version", "1.12.2", "--username", "Steve"])
            .unwrap();

        let request = cli.launch_request();
        assert_eq!(request.release_id, "1.12.2");
        assert_eq!(request.account, LaunchAccountProfile::offline("Steve"));
        assert!(!request.no_launch);
        assert!(cli.game_dir.is_none());
    }

    #[test]
    fn identity_flags_are_forwarded() {
        let cli = Cli::try_parse_from([
            "mclauncher",
            "--version",
            "1.12.2",
            "--username",
            "Steve",
            "--uuid",
            "abc",
            "--userType",
            "msa",
            "--token",
            "secret",
            "--game-dir",
            "/tmp/mc",
            "--no-launch",
        ])
        .unwrap();

        let request = cli.launch_request();
        assert_eq!(request.account.uuid, "abc");
        assert_eq!(request.account.user_type, "msa");
        assert_eq!(request.account.access_token, "secret");
        assert!(request.no_launch);
        assert_eq!(
            cli.config().unwrap().game_dir(),
            std::path::Path::new("/tmp/mc")
        );
    }

    #[test]
    fn every_flag_has_help_text() {
        use clap::CommandFactory;

        let command = Cli::command();
        for arg in command.get_arguments() {
            if arg.get_id() == "help" {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{} has no help", arg.get_id());
        }
    }

    #[test]
    fn version_and_username_are_required() {
        assert!(Cli::try_parse_from(["mclauncher", "--version", "1.12.2"]).is_err());
        assert!(Cli::try_parse_from(["mclauncher", "--username", "Steve"]).is_err());
    }
}
