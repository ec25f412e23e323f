// ─── Launcher Configuration ───
// Cache layout, platform detection and persisted launcher settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};

pub const LAUNCHER_NAME: &str = "MCLauncher";
pub const DEFAULT_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";
const SETTINGS_FILE: &str = "launcher_settings.json";

/// Operating systems the descriptor format knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    Osx,
}

impl Platform {
    /// Platform of the running binary.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    /// Name used by the descriptor format (`linux`, `windows`, `osx`).
    pub fn os_name(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Osx => "osx",
        }
    }

    /// Key of this platform's entry under `downloads.classifiers`.
    pub fn classifier_key(self) -> String {
        format!("natives-{}", self.os_name())
    }

    /// File name suffixes of native shared libraries on this platform.
    pub fn native_suffixes(self) -> &'static [&'static str] {
        match self {
            Platform::Linux => &[".so"],
            Platform::Windows => &[".dll"],
            Platform::Osx => &[".dylib", ".jnilib"],
        }
    }

    /// Environment variable the dynamic linker searches.
    pub fn library_path_env(self) -> &'static str {
        match self {
            Platform::Linux => "LD_LIBRARY_PATH",
            Platform::Windows => "PATH",
            Platform::Osx => "DYLD_LIBRARY_PATH",
        }
    }

    /// Java classpath / search path separator.
    pub fn path_separator(self) -> &'static str {
        match self {
            Platform::Windows => ";",
            _ => ":",
        }
    }
}

/// User-editable settings persisted as `launcher_settings.json` in the game dir.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LauncherSettings {
    #[serde(default)]
    pub java_path: Option<PathBuf>,
    #[serde(default)]
    pub manifest_url: Option<String>,
}

/// Everything the pipeline needs to know about its environment.
///
/// Built once at startup and handed to every component; nothing in the crate
/// reads the home directory or the target platform on its own.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    game_dir: PathBuf,
    pub platform: Platform,
    pub manifest_url: String,
    pub settings: LauncherSettings,
}

impl LauncherConfig {
    /// Config rooted at `game_dir` for the current platform.
    ///
    /// The root is made absolute so every derived path is absolute too.
    pub fn new(game_dir: impl AsRef<Path>) -> LauncherResult<Self> {
        let game_dir = game_dir.as_ref();
        let game_dir =
            std::path::absolute(game_dir).map_err(|e| LauncherError::io(game_dir, e))?;

        Ok(Self {
            game_dir,
            platform: Platform::current(),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            settings: LauncherSettings::default(),
        })
    }

    /// Config rooted at `~/.MCLauncher`, with settings applied from disk.
    pub fn from_home() -> LauncherResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| LauncherError::Other("Cannot determine home directory".into()))?;
        Self::new(home.join(format!(".{}", LAUNCHER_NAME))).map(Self::with_settings_from_disk)
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    /// Apply `launcher_settings.json` from the game dir, if present.
    pub fn with_settings_from_disk(mut self) -> Self {
        if let Some(settings) = load_settings_from_disk(&self.game_dir) {
            if let Some(url) = &settings.manifest_url {
                self.manifest_url = url.clone();
            }
            self.settings = settings;
        }
        self
    }

    /// Java binary used to start the game.
    pub fn java_binary(&self) -> PathBuf {
        self.settings
            .java_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("java"))
    }

    // ── Cache layout ────────────────────────────────────

    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.game_dir.join("versions")
    }

    pub fn version_dir(&self, release_id: &str) -> PathBuf {
        self.versions_dir().join(release_id)
    }

    pub fn descriptor_path(&self, release_id: &str) -> PathBuf {
        self.version_dir(release_id)
            .join(format!("{}.json", release_id))
    }

    pub fn client_jar_path(&self, release_id: &str) -> PathBuf {
        self.version_dir(release_id)
            .join(format!("{}.jar", release_id))
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.game_dir.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.game_dir.join("assets")
    }

    pub fn asset_indexes_dir(&self) -> PathBuf {
        self.assets_dir().join("indexes")
    }

    pub fn log_configs_dir(&self) -> PathBuf {
        self.assets_dir().join("log_configs")
    }

    pub fn natives_dir(&self, release_id: &str) -> PathBuf {
        self.game_dir.join("bin").join("natives").join(release_id)
    }
}

fn load_settings_from_disk(game_dir: &Path) -> Option<LauncherSettings> {
    let path = game_dir.join(SETTINGS_FILE);
    let raw = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => {
            debug!("Loaded launcher settings from {:?}", path);
            Some(settings)
        }
        Err(e) => {
            warn!("Ignoring malformed settings file {:?}: {}", path, e);
            None
        }
    }
}
