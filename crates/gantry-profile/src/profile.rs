//! Build profiles
//!
//! A [`BuildProfile`] is a named, persistable description of one shippable
//! build: identity fields, version, output-path templates, define symbols,
//! scenes, and the per-platform sub-settings. Applying a profile pushes its
//! fields into the host player-settings store and stamps a `BUILD_VERSION`
//! marker file at the project root; it never starts a build by itself.

use std::fs;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::error::{ProfileError, ProfileResult};
use crate::host::HostContext;
use crate::platform::Platform;
use crate::settings::{AndroidSettings, IosSettings, TargetSettings, WebGlSettings};
use crate::symbols::{self, SymbolResolution};
use crate::tokens::{sanitize_product_name, TokenContext};
use crate::version::{clamp_version_code, composite_version_code, is_valid_version};

/// Marker file written at the project root on every apply
pub const BUILD_VERSION_FILE: &str = "BUILD_VERSION";

/// Directory name for content-bundle output, per platform label
pub const BUNDLE_OUTPUT_ROOT: &str = "AssetBundles";

/// Compression applied to built content bundles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleCompression {
    Lzma,
    #[default]
    Lz4,
    Uncompressed,
}

impl BundleCompression {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleCompression::Lzma => "lzma",
            BundleCompression::Lz4 => "lz4",
            BundleCompression::Uncompressed => "uncompressed",
        }
    }
}

/// One scene override carried by a profile. Matched against the host scene
/// list by file name; host scenes without an override keep their state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSetting {
    pub name: String,
    pub enabled: bool,
}

fn deserialize_version_code<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_version_code(raw))
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_version_code() -> u32 {
    1
}

fn default_builds_path() -> String {
    "Build".to_string()
}

fn default_builds_directory_name() -> String {
    "$PLATFORM".to_string()
}

fn default_builds_name() -> String {
    "$IDENTIFIER_$VERSION_$VERSION_CODE_LONG$EXECUTABLE".to_string()
}

fn default_true() -> bool {
    true
}

/// A complete build configuration for one target platform.
///
/// Field order matters for the persisted form: scalar fields first, then
/// arrays of tables, then the sub-settings tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildProfile {
    /// Display name, also the store lookup key
    pub name: String,
    pub platform: Platform,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub company_name: String,
    /// Reverse-DNS application identifier
    #[serde(default)]
    pub application_identifier: String,
    /// `major.minor.patch`, each segment one or two digits
    #[serde(default = "default_version")]
    version: String,
    /// Per-profile build counter, 0 to 99
    #[serde(
        default = "default_version_code",
        deserialize_with = "deserialize_version_code"
    )]
    version_code: u32,
    #[serde(default)]
    pub development_build: bool,
    #[serde(default)]
    pub allow_debugging: bool,
    /// Run the host build pipeline when this profile is built; when off only
    /// settings application and bundle builds happen.
    #[serde(default = "default_true")]
    pub build_application: bool,
    #[serde(default)]
    pub build_asset_bundles: bool,
    #[serde(default)]
    pub copy_to_streaming_assets: bool,
    #[serde(default)]
    pub bundle_compression: BundleCompression,
    /// Output root, template-expanded, relative to the project root unless
    /// absolute
    #[serde(default = "default_builds_path")]
    pub builds_path: String,
    /// Per-build directory name template
    #[serde(default = "default_builds_directory_name")]
    pub builds_directory_name: String,
    /// Artifact file name template
    #[serde(default = "default_builds_name")]
    pub builds_name: String,
    /// Define symbols appended to the host's current set, same separators as
    /// the host accepts
    #[serde(default)]
    pub define_symbols: String,
    /// Directory names hidden from the host importer during a build
    #[serde(default)]
    pub exclude_directories: Vec<String>,
    #[serde(default)]
    pub scenes: Vec<SceneSetting>,
    #[serde(default)]
    pub android: AndroidSettings,
    #[serde(default)]
    pub ios: IosSettings,
    #[serde(default)]
    pub webgl: WebGlSettings,
}

impl BuildProfile {
    pub fn new(name: impl Into<String>, platform: Platform) -> Self {
        Self {
            name: name.into(),
            platform,
            product_name: String::new(),
            company_name: String::new(),
            application_identifier: String::new(),
            version: default_version(),
            version_code: default_version_code(),
            development_build: false,
            allow_debugging: false,
            build_application: true,
            build_asset_bundles: false,
            copy_to_streaming_assets: false,
            bundle_compression: BundleCompression::default(),
            builds_path: default_builds_path(),
            builds_directory_name: default_builds_directory_name(),
            builds_name: default_builds_name(),
            define_symbols: String::new(),
            exclude_directories: Vec::new(),
            scenes: Vec::new(),
            android: AndroidSettings::default(),
            ios: IosSettings::default(),
            webgl: WebGlSettings::default(),
        }
    }

    /// Seed a profile from current host state.
    pub fn from_host(name: impl Into<String>, host: &dyn HostContext) -> Self {
        let mut profile = Self::new(name, host.active_platform());
        profile.read_from_host(host);
        profile
    }

    /// The platform this profile actually targets: its own tag when the host
    /// pipeline runs, otherwise the host's active platform.
    pub fn actual_platform(&self, host: &dyn HostContext) -> Platform {
        if self.build_application {
            self.platform
        } else {
            host.active_platform()
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Accepts only `major.minor.patch` with one- or two-digit segments.
    /// Returns whether the value was taken.
    pub fn set_version(&mut self, version: &str) -> bool {
        if is_valid_version(version) {
            self.version = version.to_string();
            true
        } else {
            false
        }
    }

    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    pub fn set_version_code(&mut self, code: i64) {
        self.version_code = clamp_version_code(code);
    }

    /// Numeric build identity derived from version and version code, e.g.
    /// `1.2.3` code 7 becomes `1020307`.
    pub fn composite_version_code(&self) -> String {
        composite_version_code(&self.version, self.version_code)
    }

    /// Version string as stamped into the build; a development-build number
    /// is appended only on development builds.
    pub fn effective_version(&self, dev_build_number: Option<&str>) -> String {
        match dev_build_number {
            Some(number) if self.development_build && !number.is_empty() => {
                format!("{}.{}", self.version, number)
            }
            _ => self.version.clone(),
        }
    }

    /// Token values for expanding this profile's path templates.
    pub fn token_context(&self, host: &dyn HostContext, timestamp: NaiveDateTime) -> TokenContext {
        let platform = self.actual_platform(host);
        TokenContext {
            identifier: self.application_identifier.clone(),
            product_name: sanitize_product_name(&self.product_name),
            platform_label: platform.label().to_string(),
            composite_version_code: self.composite_version_code(),
            version_code: self.version_code,
            version: self.version.clone(),
            timestamp,
            executable_suffix: platform
                .executable_suffix(self.android.target.build_mode)
                .to_string(),
        }
    }

    /// Expanded output directory for one build
    pub fn resolve_output_directory(
        &self,
        host: &dyn HostContext,
        timestamp: NaiveDateTime,
    ) -> PathBuf {
        let context = self.token_context(host, timestamp);
        PathBuf::from(context.resolve(&self.builds_path))
            .join(context.resolve(&self.builds_directory_name))
    }

    /// Expanded artifact file name for one build
    pub fn resolve_file_name(&self, host: &dyn HostContext, timestamp: NaiveDateTime) -> String {
        self.token_context(host, timestamp).resolve(&self.builds_name)
    }

    /// Full expanded artifact path for one build
    pub fn resolve_output_path(&self, host: &dyn HostContext, timestamp: NaiveDateTime) -> PathBuf {
        self.resolve_output_directory(host, timestamp)
            .join(self.resolve_file_name(host, timestamp))
    }

    /// Where content bundles for this profile's platform land
    pub fn resolve_bundle_output_path(&self, host: &dyn HostContext) -> PathBuf {
        PathBuf::from(BUNDLE_OUTPUT_ROOT).join(self.actual_platform(host).label())
    }

    /// Snapshot identity, version, scene, and platform fields from host state.
    pub fn read_from_host(&mut self, host: &dyn HostContext) {
        let settings = host.player_settings();
        self.product_name = settings.product_name.clone();
        self.company_name = settings.company_name.clone();
        self.application_identifier = settings.application_identifier.clone();
        if is_valid_version(&settings.bundle_version) {
            self.version = settings.bundle_version.clone();
        }
        self.development_build = settings.development_build;
        self.allow_debugging = settings.allow_debugging;
        self.scenes = settings
            .scenes
            .iter()
            .map(|scene| SceneSetting {
                name: scene_file_name(&scene.path),
                enabled: scene.enabled,
            })
            .collect();

        self.android.read_from_host(settings);
        self.ios.read_from_host(settings);
        self.webgl.read_from_host(settings);
    }

    /// Merge this profile's symbols (plus optional extras) against the host's
    /// current set, and write the result back. The host still has to
    /// recompile before the new set is in effect.
    pub fn resolve_symbols(
        &self,
        host: &mut dyn HostContext,
        append: Option<&str>,
    ) -> SymbolResolution {
        let previous = host.player_settings().define_symbols.clone();
        let resolution = symbols::resolve(&self.define_symbols, append, &previous);
        host.player_settings_mut().define_symbols = resolution.symbols.clone();
        resolution
    }

    /// Push this profile into host state, stamp `BUILD_VERSION`, and persist.
    ///
    /// Only the sub-settings variant for the actual target platform is
    /// applied; the others stay dormant in the profile.
    pub fn apply(
        &self,
        host: &mut dyn HostContext,
        dev_build_number: Option<&str>,
    ) -> ProfileResult<()> {
        let version = self.effective_version(dev_build_number);
        let composite = self.composite_version_code();
        let platform = self.actual_platform(host);

        {
            let settings = host.player_settings_mut();
            settings.product_name = self.product_name.clone();
            settings.company_name = self.company_name.clone();
            settings.application_identifier = self.application_identifier.clone();
            settings.bundle_version = version.clone();
            settings.development_build = self.development_build;
            settings.allow_debugging = self.allow_debugging;

            for setting in &self.scenes {
                for scene in settings.scenes.iter_mut() {
                    if scene_file_name(&scene.path) == setting.name {
                        scene.enabled = setting.enabled;
                    }
                }
            }

            match platform {
                Platform::Android => self.android.apply_to_host(settings, &composite)?,
                Platform::Ios => self.ios.apply_to_host(settings, &composite)?,
                Platform::WebGl => self.webgl.apply_to_host(settings, &composite)?,
                _ => {}
            }
        }

        let marker = host.project_dir().join(BUILD_VERSION_FILE);
        fs::write(&marker, &version).map_err(|e| ProfileError::io(&marker, e))?;

        host.save()?;
        Ok(())
    }
}

fn scene_file_name(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_string()
}
