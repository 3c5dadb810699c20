//! Composite version code formatting
//!
//! Platform packaging systems (Android `versionCode`, iOS `buildNumber`)
//! consume a single integer. The composite code packs `MAJOR.MINOR.PATCH`
//! plus the per-release build counter into a fixed-width decimal string:
//! version `1.2.3` with counter `7` becomes `1020307`.

use semver::Version;

/// Upper bound for the per-release version code.
pub const MAX_VERSION_CODE: u32 = 99;

/// Format the composite version code for `version` and `build_code`.
///
/// When `version` does not parse as a plain `MAJOR.MINOR.PATCH` (prerelease
/// and build metadata are not allowed), the raw counter is returned as a
/// decimal string instead. The result is always parseable as an integer.
pub fn composite_version_code(version: &str, build_code: u32) -> String {
    match Version::parse(version) {
        Ok(v) if v.pre.is_empty() && v.build.is_empty() => {
            format!("{}{:02}{:02}{:02}", v.major, v.minor, v.patch, build_code)
        }
        _ => build_code.to_string(),
    }
}

/// Validate an interactive version edit: exactly three dot-separated
/// segments of one or two ASCII digits.
pub fn is_valid_version(version: &str) -> bool {
    let segments: Vec<&str> = version.split('.').collect();
    segments.len() == 3
        && segments.iter().all(|s| {
            !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit())
        })
}

/// Clamp a version code into `[0, MAX_VERSION_CODE]`.
pub fn clamp_version_code(code: i64) -> u32 {
    code.clamp(0, MAX_VERSION_CODE as i64) as u32
}
