//! Android build settings
//!
//! Composed of three independently read/applied parts: keystore credentials,
//! target (scripting backend, CPU architectures, build mode), and the
//! symbols.zip switch. The architecture set is constrained by the scripting
//! backend: Mono only ever runs ARMv7, IL2CPP allows the full set. Resolving
//! or toggling an architecture that is illegal for the current backend forces
//! it off instead of permitting an invalid combination.

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};
use crate::host::PlayerSettings;
use crate::platform::Platform;
use crate::settings::TargetSettings;

/// Scripting backend for Android players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptingBackend {
    #[default]
    Mono2x,
    Il2cpp,
}

impl ScriptingBackend {
    /// Architectures legal under this backend
    pub fn allowed_architectures(&self) -> ArchitectureSet {
        match self {
            Self::Mono2x => ArchitectureSet::ARMV7,
            Self::Il2cpp => ArchitectureSet::ALL,
        }
    }
}

/// A single Android CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidArchitecture {
    Armv7,
    Arm64,
}

/// Set of enabled Android CPU architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectureSet {
    pub armv7: bool,
    pub arm64: bool,
}

impl ArchitectureSet {
    pub const ARMV7: ArchitectureSet = ArchitectureSet {
        armv7: true,
        arm64: false,
    };

    pub const ALL: ArchitectureSet = ArchitectureSet {
        armv7: true,
        arm64: true,
    };

    pub fn contains(&self, arch: AndroidArchitecture) -> bool {
        match arch {
            AndroidArchitecture::Armv7 => self.armv7,
            AndroidArchitecture::Arm64 => self.arm64,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.armv7 && !self.arm64
    }

    /// Keep only the architectures also present in `other`.
    pub fn intersect(&self, other: ArchitectureSet) -> ArchitectureSet {
        ArchitectureSet {
            armv7: self.armv7 && other.armv7,
            arm64: self.arm64 && other.arm64,
        }
    }

    fn set(&mut self, arch: AndroidArchitecture, enabled: bool) {
        match arch {
            AndroidArchitecture::Armv7 => self.armv7 = enabled,
            AndroidArchitecture::Arm64 => self.arm64 = enabled,
        }
    }
}

/// How the Android player is packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndroidBuildMode {
    #[default]
    Apk,
    AndroidProject,
    GoogleBundle,
}

impl AndroidBuildMode {
    /// Artifact extension for this mode, including the leading dot.
    /// An exported Android project is a directory and has none.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Apk => ".apk",
            Self::GoogleBundle => ".aab",
            Self::AndroidProject => "",
        }
    }
}

/// Keystore signing credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidKeystoreSettings {
    /// Enable application signing with a custom keystore
    pub use_custom_keystore: bool,
    /// Keystore file path, relative to the project root
    pub keystore_file: String,
    pub keystore_password: String,
    pub keystore_alias_name: String,
    pub keystore_alias_password: String,
}

impl AndroidKeystoreSettings {
    fn read_from_host(&mut self, settings: &PlayerSettings) {
        let android = &settings.android;
        self.use_custom_keystore = android.use_custom_keystore;
        self.keystore_file = android.keystore_file.replace('\\', "/");
        self.keystore_password = android.keystore_password.clone();
        self.keystore_alias_name = android.keystore_alias_name.clone();
        self.keystore_alias_password = android.keystore_alias_password.clone();
    }

    fn apply_to_host(&self, settings: &mut PlayerSettings) {
        let android = &mut settings.android;
        android.use_custom_keystore = self.use_custom_keystore;
        android.keystore_file = self.keystore_file.clone();
        android.keystore_password = self.keystore_password.clone();
        android.keystore_alias_name = self.keystore_alias_name.clone();
        android.keystore_alias_password = self.keystore_alias_password.clone();
    }
}

/// Scripting backend, target architectures, and build mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidTargetSettings {
    pub scripting_backend: ScriptingBackend,
    architectures: ArchitectureSet,
    pub build_mode: AndroidBuildMode,
}

impl Default for AndroidTargetSettings {
    fn default() -> Self {
        Self {
            scripting_backend: ScriptingBackend::Mono2x,
            architectures: ArchitectureSet::ARMV7,
            build_mode: AndroidBuildMode::Apk,
        }
    }
}

impl AndroidTargetSettings {
    pub fn architectures(&self) -> ArchitectureSet {
        self.architectures
    }

    /// Enable or disable an architecture. Enabling one that is illegal under
    /// the current scripting backend leaves the stored flags unchanged.
    pub fn toggle_architecture(&mut self, arch: AndroidArchitecture, enabled: bool) {
        if enabled && !self.scripting_backend.allowed_architectures().contains(arch) {
            return;
        }
        self.architectures.set(arch, enabled);
    }

    /// Switch backend, forcing off any architecture the new backend forbids.
    pub fn set_scripting_backend(&mut self, backend: ScriptingBackend) {
        self.scripting_backend = backend;
        self.architectures = self.architectures.intersect(backend.allowed_architectures());
    }

    fn read_from_host(&mut self, settings: &PlayerSettings) {
        let android = &settings.android;
        self.scripting_backend = android.scripting_backend;
        self.architectures = android.architectures;

        self.build_mode = if android.export_android_project {
            AndroidBuildMode::AndroidProject
        } else if android.build_app_bundle {
            AndroidBuildMode::GoogleBundle
        } else {
            AndroidBuildMode::Apk
        };
    }

    fn apply_to_host(&self, settings: &mut PlayerSettings) {
        let android = &mut settings.android;
        android.scripting_backend = self.scripting_backend;
        // Persisted data may predate a backend switch; never apply an
        // architecture the backend forbids.
        android.architectures = self
            .architectures
            .intersect(self.scripting_backend.allowed_architectures());

        match self.build_mode {
            AndroidBuildMode::Apk => {
                android.export_android_project = false;
                android.build_app_bundle = false;
            }
            AndroidBuildMode::AndroidProject => {
                android.export_android_project = true;
                android.build_app_bundle = false;
            }
            AndroidBuildMode::GoogleBundle => {
                android.export_android_project = false;
                android.build_app_bundle = true;
            }
        }
    }
}

/// symbols.zip generation next to the produced .apk/.aab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidSymbolsZipSettings {
    pub create_symbols_zip: bool,
}

impl AndroidSymbolsZipSettings {
    fn read_from_host(&mut self, settings: &PlayerSettings) {
        self.create_symbols_zip = settings.android.create_symbols_zip;
    }

    fn apply_to_host(&self, settings: &mut PlayerSettings) {
        settings.android.create_symbols_zip = self.create_symbols_zip;
    }
}

/// Android sub-settings variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidSettings {
    pub keystore: AndroidKeystoreSettings,
    pub target: AndroidTargetSettings,
    pub symbols_zip: AndroidSymbolsZipSettings,
}

impl TargetSettings for AndroidSettings {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn read_from_host(&mut self, settings: &PlayerSettings) {
        self.keystore.read_from_host(settings);
        self.target.read_from_host(settings);
        self.symbols_zip.read_from_host(settings);
    }

    fn apply_to_host(
        &self,
        settings: &mut PlayerSettings,
        composite_version_code: &str,
    ) -> ProfileResult<()> {
        self.keystore.apply_to_host(settings);
        self.target.apply_to_host(settings);
        self.symbols_zip.apply_to_host(settings);

        settings.android.bundle_version_code = composite_version_code
            .parse::<i64>()
            .map_err(|_| ProfileError::InvalidVersion(composite_version_code.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_target_is_mono_armv7_apk() {
        let target = AndroidTargetSettings::default();
        assert_eq!(target.scripting_backend, ScriptingBackend::Mono2x);
        assert_eq!(target.architectures(), ArchitectureSet::ARMV7);
        assert_eq!(target.build_mode, AndroidBuildMode::Apk);
    }

    #[test]
    fn test_toggle_illegal_architecture_is_rejected() {
        let mut target = AndroidTargetSettings::default();
        let before = target.architectures();

        // Mono only allows ARMv7.
        target.toggle_architecture(AndroidArchitecture::Arm64, true);
        assert_eq!(target.architectures(), before);
        assert!(!target.architectures().arm64);
    }

    #[test]
    fn test_toggle_legal_architecture() {
        let mut target = AndroidTargetSettings::default();
        target.set_scripting_backend(ScriptingBackend::Il2cpp);

        target.toggle_architecture(AndroidArchitecture::Arm64, true);
        assert!(target.architectures().arm64);

        target.toggle_architecture(AndroidArchitecture::Armv7, false);
        assert!(!target.architectures().armv7);
    }

    #[test]
    fn test_backend_switch_masks_architectures() {
        let mut target = AndroidTargetSettings::default();
        target.set_scripting_backend(ScriptingBackend::Il2cpp);
        target.toggle_architecture(AndroidArchitecture::Arm64, true);

        target.set_scripting_backend(ScriptingBackend::Mono2x);
        assert!(!target.architectures().arm64);
        assert!(target.architectures().armv7);
    }

    #[test]
    fn test_disabling_is_always_allowed() {
        let mut target = AndroidTargetSettings::default();
        target.toggle_architecture(AndroidArchitecture::Armv7, false);
        assert!(target.architectures().is_empty());
    }

    #[test]
    fn test_apply_writes_composite_version_code() {
        let settings_bag = AndroidSettings::default();
        let mut host = PlayerSettings::default();

        settings_bag.apply_to_host(&mut host, "1020307").unwrap();
        assert_eq!(host.android.bundle_version_code, 1020307);
    }

    #[test]
    fn test_apply_rejects_non_integer_composite() {
        let settings_bag = AndroidSettings::default();
        let mut host = PlayerSettings::default();

        let result = settings_bag.apply_to_host(&mut host, "not-a-number");
        assert!(matches!(result, Err(ProfileError::InvalidVersion(_))));
    }

    #[test]
    fn test_apply_masks_stale_persisted_architectures() {
        let mut settings_bag = AndroidSettings::default();
        // Simulate a profile persisted under IL2CPP, then edited back to Mono
        // without touching the architecture set.
        settings_bag.target.set_scripting_backend(ScriptingBackend::Il2cpp);
        settings_bag
            .target
            .toggle_architecture(AndroidArchitecture::Arm64, true);
        settings_bag.target.scripting_backend = ScriptingBackend::Mono2x;

        let mut host = PlayerSettings::default();
        settings_bag.apply_to_host(&mut host, "100").unwrap();
        assert!(!host.android.architectures.arm64);
    }

    #[test]
    fn test_build_mode_round_trip_through_host_flags() {
        for mode in [
            AndroidBuildMode::Apk,
            AndroidBuildMode::AndroidProject,
            AndroidBuildMode::GoogleBundle,
        ] {
            let mut settings_bag = AndroidSettings::default();
            settings_bag.target.build_mode = mode;

            let mut host = PlayerSettings::default();
            settings_bag.apply_to_host(&mut host, "1").unwrap();

            let mut read_back = AndroidSettings::default();
            TargetSettings::read_from_host(&mut read_back, &host);
            assert_eq!(read_back.target.build_mode, mode);
        }
    }

    #[test]
    fn test_keystore_read_normalizes_separators() {
        let mut host = PlayerSettings::default();
        host.android.keystore_file = "keys\\release.keystore".to_string();

        let mut keystore = AndroidKeystoreSettings::default();
        keystore.read_from_host(&host);
        assert_eq!(keystore.keystore_file, "keys/release.keystore");
    }
}
