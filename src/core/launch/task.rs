// ─── Launch Task ───
// Spawns the game process for a prepared invocation.

use std::ffi::OsString;
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info};

use crate::core::config::{LauncherConfig, Platform};
use crate::core::error::{LauncherError, LauncherResult};

use super::classpath::path_str;
use super::invocation::LaunchInvocation;

/// Heap and G1 tuning flags passed to every launch.
const JVM_TUNING_ARGS: [&str; 7] = [
    "-Xmx2G",
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:MaxGCPauseMillis=50",
    "-XX:G1HeapRegionSize=32M",
];

/// Assemble the full `java` command line for `invocation`.
pub fn build_command(config: &LauncherConfig, invocation: &LaunchInvocation) -> Command {
    let mut cmd = Command::new(config.java_binary());
    cmd.args(jvm_args(config.platform, invocation));
    cmd.arg(&invocation.main_class);
    cmd.args(game_args(invocation));

    configure_native_library_env(&mut cmd, config.platform, invocation);
    cmd
}

fn jvm_args(platform: Platform, invocation: &LaunchInvocation) -> Vec<String> {
    let mut args = vec![
        format!("-Djava.library.path={}", path_str(&invocation.natives_dir)),
        format!("-Dminecraft.client.jar={}", path_str(&invocation.client_jar)),
        "-cp".to_string(),
        invocation.classpath(platform),
    ];
    args.extend(JVM_TUNING_ARGS.iter().map(|s| s.to_string()));

    if let Some(log_config) = &invocation.log_config_path {
        args.push(format!("-Dlog4j.configurationFile={}", path_str(log_config)));
    }

    args
}

fn game_args(invocation: &LaunchInvocation) -> Vec<String> {
    let account = &invocation.account;
    [
        ("--username", account.username.clone()),
        ("--version", invocation.release_id.clone()),
        ("--gameDir", path_str(&invocation.game_dir)),
        ("--assetsDir", path_str(&invocation.assets_dir)),
        ("--assetIndex", invocation.asset_index_id.clone()),
        ("--uuid", account.uuid.clone()),
        ("--accessToken", account.access_token.clone()),
        ("--userType", account.user_type.clone()),
        ("--userProperties", "{}".to_string()),
    ]
    .into_iter()
    .flat_map(|(flag, value)| [flag.to_string(), value])
    .collect()
}

/// Launch the game and wait for it to exit.
///
/// Stdout and stderr are inherited; the exit status is returned as-is.
pub async fn launch(
    config: &LauncherConfig,
    invocation: &LaunchInvocation,
) -> LauncherResult<ExitStatus> {
    let mut cmd = build_command(config, invocation);
    cmd.current_dir(&invocation.game_dir);
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    info!("Starting {} with {:?}", invocation.release_id, cmd.get_program());
    debug!("Command (copy/paste): {}", format_command_for_logs(&cmd));

    let status = tokio::task::spawn_blocking(move || cmd.status())
        .await
        .map_err(|e| LauncherError::Other(format!("Task join error: {}", e)))?
        .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;

    info!("Game exited with {}", status);
    Ok(status)
}

fn configure_native_library_env(
    cmd: &mut Command,
    platform: Platform,
    invocation: &LaunchInvocation,
) {
    let var_name = platform.library_path_env();
    let merged = append_env_path(
        std::env::var_os(var_name),
        &path_str(&invocation.natives_dir),
        platform,
    );
    cmd.env(var_name, merged);
}

/// Prefix `value` to an existing search path variable.
fn append_env_path(existing: Option<OsString>, value: &str, platform: Platform) -> OsString {
    match existing {
        Some(existing) if !existing.is_empty() => {
            let mut merged = OsString::from(value);
            merged.push(platform.path_separator());
            merged.push(existing);
            merged
        }
        _ => OsString::from(value),
    }
}

/// Game flags whose value must never reach the logs.
const REDACTED_FLAGS: [&str; 1] = ["--accessToken"];

/// Render `cmd` for logs with secret flag values masked.
pub fn format_command_for_logs(cmd: &Command) -> String {
    let program = shell_escape(&cmd.get_program().to_string_lossy());
    let mut redact_next = false;
    let args = cmd
        .get_args()
        .map(|arg| {
            let arg = arg.to_string_lossy();
            let rendered = if redact_next {
                "***".to_string()
            } else {
                shell_escape(&arg)
            };
            redact_next = REDACTED_FLAGS.iter().any(|flag| *flag == arg);
            rendered
        })
        .collect::<Vec<_>>()
        .join(" ");

    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=' | '+')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
