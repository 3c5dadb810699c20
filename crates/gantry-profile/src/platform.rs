//! Target platforms and their labels
//!
//! The platform label feeds the `$PLATFORM` token and the asset-bundle output
//! path. Desktop targets carry label overrides; every other platform uses its
//! canonical name.

use serde::{Deserialize, Serialize};

use crate::settings::android::AndroidBuildMode;

/// Target platform for a build profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows32,
    Windows64,
    MacOs,
    Linux64,
    Ios,
    Android,
    WebGl,
}

impl Platform {
    /// Human-readable label used in paths and the `$PLATFORM` token
    pub fn label(&self) -> &'static str {
        match self {
            Self::Windows32 => "Windows32",
            Self::Windows64 => "Windows64",
            Self::MacOs => "OSX",
            Self::Linux64 => "Linux",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::WebGl => "WebGL",
        }
    }

    /// File extension for the built player, including the leading dot.
    ///
    /// Android depends on the build mode (`.apk` for packages, `.aab` for app
    /// bundles, none for an exported project); macOS and WebGL produce a
    /// directory and have no extension.
    pub fn executable_suffix(&self, android_mode: AndroidBuildMode) -> &'static str {
        match self {
            Self::Windows32 | Self::Windows64 => ".exe",
            Self::Linux64 => ".x86_64",
            Self::MacOs | Self::WebGl => "",
            Self::Ios => ".ipa",
            Self::Android => android_mode.extension(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_label_overrides() {
        assert_eq!(Platform::MacOs.label(), "OSX");
        assert_eq!(Platform::Windows32.label(), "Windows32");
        assert_eq!(Platform::Windows64.label(), "Windows64");
        assert_eq!(Platform::Linux64.label(), "Linux");
    }

    #[test]
    fn test_default_labels() {
        assert_eq!(Platform::Ios.label(), "iOS");
        assert_eq!(Platform::Android.label(), "Android");
        assert_eq!(Platform::WebGl.label(), "WebGL");
    }

    #[test]
    fn test_executable_suffixes() {
        let mode = AndroidBuildMode::Apk;
        assert_eq!(Platform::Windows64.executable_suffix(mode), ".exe");
        assert_eq!(Platform::Linux64.executable_suffix(mode), ".x86_64");
        assert_eq!(Platform::MacOs.executable_suffix(mode), "");
        assert_eq!(Platform::WebGl.executable_suffix(mode), "");
        assert_eq!(Platform::Ios.executable_suffix(mode), ".ipa");
    }

    #[test]
    fn test_android_suffix_follows_build_mode() {
        assert_eq!(
            Platform::Android.executable_suffix(AndroidBuildMode::Apk),
            ".apk"
        );
        assert_eq!(
            Platform::Android.executable_suffix(AndroidBuildMode::GoogleBundle),
            ".aab"
        );
        assert_eq!(
            Platform::Android.executable_suffix(AndroidBuildMode::AndroidProject),
            ""
        );
    }
}
