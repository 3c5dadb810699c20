//! File-backed project host
//!
//! The CLI drives builds for a project directory rather than a live editor.
//! Host configuration comes from `gantry.toml` at the project root, player
//! settings persist in `PlayerSettings.toml`, and the actual player and
//! bundle builds are delegated to configured external commands. Each command
//! receives its build inputs through `GANTRY_*` environment variables and
//! signals failure through its exit status.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use gantry_profile::profile::BundleCompression;
use gantry_profile::{
    HostContext, HostError, HostResult, Platform, PlayerBuildJob, PlayerSettings,
};

pub const HOST_CONFIG_FILE: &str = "gantry.toml";
pub const PLAYER_SETTINGS_FILE: &str = "PlayerSettings.toml";

fn default_builders_dir() -> String {
    "builders".to_string()
}

/// Project-level host configuration, from `gantry.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// The project's active build target
    pub platform: Platform,
    /// Directory holding build profiles, relative to the project root
    pub builders_dir: String,
    /// Command invoked for player builds, argv style
    pub player_build_command: Vec<String>,
    /// Command invoked for content-bundle builds, argv style
    pub bundle_build_command: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Windows64,
            builders_dir: default_builders_dir(),
            player_build_command: Vec::new(),
            bundle_build_command: Vec::new(),
        }
    }
}

/// Host backed by a project directory on disk.
#[derive(Debug)]
pub struct ProjectHost {
    root: PathBuf,
    config: HostConfig,
    settings: PlayerSettings,
}

impl ProjectHost {
    /// Load host state from a project directory. Missing files fall back to
    /// defaults so a fresh project works out of the box.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let config = match fs::read_to_string(root.join(HOST_CONFIG_FILE)) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HostConfig::default(),
            Err(e) => return Err(e.into()),
        };
        let settings = match fs::read_to_string(root.join(PLAYER_SETTINGS_FILE)) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PlayerSettings::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            root: root.to_path_buf(),
            config,
            settings,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    fn run_build_command(
        &self,
        command: &[String],
        what: &str,
        env: &[(&str, String)],
    ) -> Result<(), String> {
        let Some(program) = command.first() else {
            return Err(format!("no {what} command configured in {HOST_CONFIG_FILE}"));
        };

        let mut invocation = Command::new(program);
        invocation.args(&command[1..]).current_dir(&self.root);
        for (key, value) in env {
            invocation.env(key, value);
        }

        let status = invocation
            .status()
            .map_err(|e| format!("failed to launch '{program}': {e}"))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("'{program}' exited with {status}"))
        }
    }
}

impl HostContext for ProjectHost {
    fn active_platform(&self) -> Platform {
        self.config.platform
    }

    fn project_dir(&self) -> &Path {
        &self.root
    }

    fn player_settings(&self) -> &PlayerSettings {
        &self.settings
    }

    fn player_settings_mut(&mut self) -> &mut PlayerSettings {
        &mut self.settings
    }

    fn build_bundles(
        &mut self,
        output: &Path,
        compression: BundleCompression,
        copy_to_streaming_assets: bool,
    ) -> HostResult<()> {
        let output = if output.is_absolute() {
            output.to_path_buf()
        } else {
            self.root.join(output)
        };
        fs::create_dir_all(&output)?;

        self.run_build_command(
            &self.config.bundle_build_command,
            "bundle build",
            &[
                ("GANTRY_BUNDLE_OUTPUT", output.display().to_string()),
                ("GANTRY_COMPRESSION", compression.as_str().to_string()),
                (
                    "GANTRY_COPY_TO_STREAMING",
                    if copy_to_streaming_assets { "1" } else { "0" }.to_string(),
                ),
            ],
        )
        .map_err(HostError::BundleBuildFailed)
    }

    fn build_player(&mut self, job: &PlayerBuildJob) -> HostResult<()> {
        if let Some(parent) = job.output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        self.run_build_command(
            &self.config.player_build_command,
            "player build",
            &[
                ("GANTRY_PLATFORM", job.platform.label().to_string()),
                ("GANTRY_OUTPUT", job.output_path.display().to_string()),
                ("GANTRY_SCENES", job.scenes.join(";")),
                (
                    "GANTRY_DEVELOPMENT",
                    if job.development { "1" } else { "0" }.to_string(),
                ),
                (
                    "GANTRY_RUN",
                    if job.auto_run { "1" } else { "0" }.to_string(),
                ),
            ],
        )
        .map_err(HostError::PlayerBuildFailed)
    }

    fn save(&mut self) -> HostResult<()> {
        let contents = toml::to_string_pretty(&self.settings)
            .map_err(|e| HostError::SaveFailed(e.to_string()))?;
        fs::write(self.root.join(PLAYER_SETTINGS_FILE), contents)?;
        Ok(())
    }
}
