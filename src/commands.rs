use std::process::ExitStatus;

use tracing::info;

use crate::core::auth::LaunchAccountProfile;
use crate::core::config::LauncherConfig;
use crate::core::downloader::Downloader;
use crate::core::error::LauncherResult;
use crate::core::install::Materializer;
use crate::core::launch::{self, LaunchInvocation};

/// What the user asked to start.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub release_id: String,
    pub account: LaunchAccountProfile,
    /// Prepare everything but do not spawn the game.
    pub no_launch: bool,
}

/// Outcome of [`launch_release`].
#[derive(Debug)]
pub enum LaunchOutcome {
    Prepared(LaunchInvocation),
    Exited(ExitStatus),
}

/// Resolve, materialize and start a release.
pub async fn launch_release(
    config: &LauncherConfig,
    downloader: &Downloader,
    request: LaunchRequest,
) -> LauncherResult<LaunchOutcome> {
    let release = Materializer::new(config, downloader)
        .install(&request.release_id)
        .await?;

    let invocation =
        launch::build_invocation(config, &release.id, &release.version, request.account)?;

    if request.no_launch {
        let cmd = launch::build_command(config, &invocation);
        info!(
            "Prepared {}: {}",
            release.id,
            launch::task::format_command_for_logs(&cmd)
        );
        return Ok(LaunchOutcome::Prepared(invocation));
    }

    info!("Starting Minecraft {}", release.id);
    let status = launch::launch(config, &invocation).await?;
    Ok(LaunchOutcome::Exited(status))
}
