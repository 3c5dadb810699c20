//! JSON profile overrides
//!
//! Command lines can carry a one-shot JSON patch that tweaks a loaded
//! profile without touching its file. The patch is deep-merged: nested
//! objects merge field by field, everything else replaces the stored value.

use serde_json::Value;

use crate::error::{ProfileError, ProfileResult};
use crate::profile::BuildProfile;

/// Patch `profile` with a JSON object. A patch whose value types do not
/// match the profile's fields is rejected and leaves the profile unchanged.
pub fn apply_json_override(profile: &mut BuildProfile, json: &str) -> ProfileResult<()> {
    let patch: Value =
        serde_json::from_str(json).map_err(|e| ProfileError::InvalidOverride(e.to_string()))?;
    if !patch.is_object() {
        return Err(ProfileError::InvalidOverride(
            "override must be a JSON object".to_string(),
        ));
    }

    let mut current = serde_json::to_value(&*profile)
        .map_err(|e| ProfileError::InvalidOverride(e.to_string()))?;
    merge(&mut current, patch);

    *profile = serde_json::from_value(current)
        .map_err(|e| ProfileError::InvalidOverride(e.to_string()))?;
    Ok(())
}

fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use pretty_assertions::assert_eq;

    fn profile() -> BuildProfile {
        let mut profile = BuildProfile::new("Demo", Platform::Android);
        profile.application_identifier = "com.example.demo".to_string();
        profile
    }

    #[test]
    fn test_top_level_field_replacement() {
        let mut p = profile();
        apply_json_override(&mut p, r#"{"application_identifier": "com.example.patched"}"#)
            .unwrap();
        assert_eq!(p.application_identifier, "com.example.patched");
        // Untouched fields survive.
        assert_eq!(p.name, "Demo");
    }

    #[test]
    fn test_nested_merge_keeps_sibling_fields() {
        let mut p = profile();
        p.android.keystore.keystore_alias_name = "release".to_string();

        apply_json_override(
            &mut p,
            r#"{"android": {"keystore": {"keystore_file": "keys/release.keystore"}}}"#,
        )
        .unwrap();

        assert_eq!(p.android.keystore.keystore_file, "keys/release.keystore");
        assert_eq!(p.android.keystore.keystore_alias_name, "release");
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let mut p = profile();
        assert!(matches!(
            apply_json_override(&mut p, "{not json"),
            Err(ProfileError::InvalidOverride(_))
        ));
    }

    #[test]
    fn test_non_object_patch_is_rejected() {
        let mut p = profile();
        assert!(matches!(
            apply_json_override(&mut p, r#"["DEMO"]"#),
            Err(ProfileError::InvalidOverride(_))
        ));
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let mut p = profile();
        let before = p.clone();
        let result = apply_json_override(&mut p, r#"{"development_build": "yes"}"#);
        assert!(matches!(result, Err(ProfileError::InvalidOverride(_))));
        assert_eq!(p, before);
    }
}
