// ─── MCLauncher Core ───
// Release resolution, cache materialization and launch preparation.
//
// Architecture:
//   core/
//     config      — Cache layout, platform, persisted settings
//     downloader/ — Fetch seam, HTTP transport, content store
//     version/    — Release manifest + release descriptor
//     install/    — Materializes a release into the content store
//     launch/     — Natives, library path, invocation, process spawn
//     auth/       — Identity forwarded to the game

pub mod auth;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod install;
pub mod launch;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;
