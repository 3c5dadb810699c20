//! iOS build settings
//!
//! Six independent parts: languages, frameworks, services, entitlements,
//! signing, and export options. Only the signing part has a counterpart in
//! host player settings; the others are inputs to the Xcode post-processing
//! stage and are carried through the profile untouched. The parts share
//! nothing except the developer team id and export method, which the
//! post-processors read together.

use serde::{Deserialize, Serialize};

use crate::error::ProfileResult;
use crate::host::PlayerSettings;
use crate::platform::Platform;
use crate::settings::TargetSettings;

/// Localizations added to the produced Xcode project; the first entry is the
/// development region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosLanguagesSettings {
    /// Comma-separated language codes
    pub languages: String,
}

impl Default for IosLanguagesSettings {
    fn default() -> Self {
        Self {
            languages: "en".to_string(),
        }
    }
}

impl IosLanguagesSettings {
    pub fn language_list(&self) -> Vec<String> {
        split_list(&self.languages)
    }
}

/// System frameworks linked into the produced Xcode project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosFrameworksSettings {
    /// Comma-separated framework names
    pub frameworks: String,
}

impl IosFrameworksSettings {
    pub fn framework_list(&self) -> Vec<String> {
        split_list(&self.frameworks)
    }
}

/// System capabilities enabled on the produced Xcode project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosServicesSettings {
    /// Comma-separated capability names
    pub services: String,
}

impl IosServicesSettings {
    pub fn service_list(&self) -> Vec<String> {
        split_list(&self.services)
    }
}

/// Entitlements file attached to the produced Xcode project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosEntitlementsSettings {
    /// Path relative to the project root; empty disables the step
    pub entitlements_file: String,
}

/// Code signing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosSigningSettings {
    pub automatically_sign: bool,
    pub developer_team_id: String,
    pub code_sign_identity: String,
    /// Provisioning profile id, e.g. `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
    pub profile_id: String,
    pub profile_specifier: String,
}

impl IosSigningSettings {
    fn read_from_host(&mut self, settings: &PlayerSettings) {
        let ios = &settings.ios;
        self.developer_team_id = ios.developer_team_id.clone();
        self.automatically_sign = ios.automatically_sign;
        self.profile_id = ios.provisioning_profile_id.clone();
    }

    fn apply_to_host(&self, settings: &mut PlayerSettings) {
        let ios = &mut settings.ios;
        ios.developer_team_id = self.developer_team_id.clone();
        ios.automatically_sign = self.automatically_sign;
        if !self.automatically_sign {
            ios.provisioning_profile_id = self.profile_id.clone();
        }
    }
}

/// exportOptions.plist generation for xcodebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosExportOptionsSettings {
    pub generate_export_options: bool,
    /// `development`, `ad-hoc`, `app-store`, or `enterprise`
    pub export_method: String,
    pub upload_bitcode: bool,
    pub upload_symbols: bool,
    pub entitlements_file: String,
}

impl Default for IosExportOptionsSettings {
    fn default() -> Self {
        Self {
            generate_export_options: false,
            export_method: "development".to_string(),
            upload_bitcode: false,
            upload_symbols: false,
            entitlements_file: String::new(),
        }
    }
}

/// iOS sub-settings variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IosSettings {
    pub languages: IosLanguagesSettings,
    pub frameworks: IosFrameworksSettings,
    pub services: IosServicesSettings,
    pub entitlements: IosEntitlementsSettings,
    pub signing: IosSigningSettings,
    pub export_options: IosExportOptionsSettings,
}

impl TargetSettings for IosSettings {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn read_from_host(&mut self, settings: &PlayerSettings) {
        self.signing.read_from_host(settings);
    }

    fn apply_to_host(
        &self,
        settings: &mut PlayerSettings,
        composite_version_code: &str,
    ) -> ProfileResult<()> {
        self.signing.apply_to_host(settings);
        settings.ios.build_number = composite_version_code.to_string();
        Ok(())
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
