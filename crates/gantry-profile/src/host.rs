//! Host editor abstraction
//!
//! The hosting editor runtime owns the real player-settings store and the
//! build pipeline. Instead of reaching for that state through globals, every
//! profile operation takes a [`HostContext`], so tests and embedders can
//! substitute their own. [`PlayerSettings`] is the plain state bag a host
//! exposes; mutating it has no effect until the host persists or builds.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::Platform;
use crate::profile::BundleCompression;
use crate::settings::android::{ArchitectureSet, ScriptingBackend};

pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("AssetBundle build failed: {0}")]
    BundleBuildFailed(String),

    #[error("Player build failed: {0}")]
    PlayerBuildFailed(String),

    #[error("Failed to persist host settings: {0}")]
    SaveFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One scene in the host's build list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntry {
    /// Scene path relative to the project root
    pub path: String,
    pub enabled: bool,
}

/// Android-native slots in the host player-settings store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidHostSettings {
    pub bundle_version_code: i64,
    pub use_custom_keystore: bool,
    pub keystore_file: String,
    pub keystore_password: String,
    pub keystore_alias_name: String,
    pub keystore_alias_password: String,
    pub scripting_backend: ScriptingBackend,
    pub architectures: ArchitectureSet,
    pub export_android_project: bool,
    pub build_app_bundle: bool,
    pub create_symbols_zip: bool,
}

/// iOS-native slots in the host player-settings store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosHostSettings {
    pub build_number: String,
    pub developer_team_id: String,
    pub automatically_sign: bool,
    pub provisioning_profile_id: String,
}

/// The host editor's player-settings store, for the active target group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub product_name: String,
    pub company_name: String,
    pub application_identifier: String,
    pub bundle_version: String,
    pub define_symbols: String,
    pub development_build: bool,
    pub allow_debugging: bool,
    pub scenes: Vec<SceneEntry>,
    pub android: AndroidHostSettings,
    pub ios: IosHostSettings,
}

/// Everything the host needs to run one player build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerBuildJob {
    pub platform: Platform,
    /// Enabled scenes, in build order
    pub scenes: Vec<String>,
    pub output_path: PathBuf,
    pub development: bool,
    /// Launch the player after a successful build
    pub auto_run: bool,
}

/// Interface over the hosting editor runtime.
pub trait HostContext {
    /// The host's currently active build target
    fn active_platform(&self) -> Platform;

    /// Project root directory
    fn project_dir(&self) -> &Path;

    fn player_settings(&self) -> &PlayerSettings;

    fn player_settings_mut(&mut self) -> &mut PlayerSettings;

    /// Build content bundles into `output`
    fn build_bundles(
        &mut self,
        output: &Path,
        compression: BundleCompression,
        copy_to_streaming_assets: bool,
    ) -> HostResult<()>;

    /// Run the host build pipeline for one player
    fn build_player(&mut self, job: &PlayerBuildJob) -> HostResult<()>;

    /// Persist applied settings. Hosts without a backing store keep this a
    /// no-op.
    fn save(&mut self) -> HostResult<()> {
        Ok(())
    }
}

/// In-memory host for tests and embedding.
///
/// Build results are scripted: each call to [`HostContext::build_bundles`] or
/// [`HostContext::build_player`] pops the next queued result, defaulting to
/// success, and records the request for inspection.
#[derive(Debug)]
pub struct MemoryHost {
    platform: Platform,
    project_dir: PathBuf,
    pub settings: PlayerSettings,
    bundle_results: VecDeque<Result<(), String>>,
    player_results: VecDeque<Result<(), String>>,
    /// Bundle output paths requested so far
    pub bundle_builds: Vec<PathBuf>,
    /// Player build jobs requested so far
    pub player_builds: Vec<PlayerBuildJob>,
    /// Number of times settings were persisted
    pub saves: usize,
}

impl MemoryHost {
    pub fn new(platform: Platform, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            project_dir: project_dir.into(),
            settings: PlayerSettings::default(),
            bundle_results: VecDeque::new(),
            player_results: VecDeque::new(),
            bundle_builds: Vec::new(),
            player_builds: Vec::new(),
            saves: 0,
        }
    }

    /// Queue a bundle-build failure for the next request
    pub fn with_bundle_failure(mut self, message: impl Into<String>) -> Self {
        self.bundle_results.push_back(Err(message.into()));
        self
    }

    /// Queue a player-build failure for the next request
    pub fn with_player_failure(mut self, message: impl Into<String>) -> Self {
        self.player_results.push_back(Err(message.into()));
        self
    }
}

impl HostContext for MemoryHost {
    fn active_platform(&self) -> Platform {
        self.platform
    }

    fn project_dir(&self) -> &Path {
        &self.project_dir
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
        _compression: BundleCompression,
        _copy_to_streaming_assets: bool,
    ) -> HostResult<()> {
        self.bundle_builds.push(output.to_path_buf());
        match self.bundle_results.pop_front() {
            Some(Err(message)) => Err(HostError::BundleBuildFailed(message)),
            _ => Ok(()),
        }
    }

    fn build_player(&mut self, job: &PlayerBuildJob) -> HostResult<()> {
        self.player_builds.push(job.clone());
        match self.player_results.pop_front() {
            Some(Err(message)) => Err(HostError::PlayerBuildFailed(message)),
            _ => Ok(()),
        }
    }

    fn save(&mut self) -> HostResult<()> {
        self.saves += 1;
        Ok(())
    }
}
