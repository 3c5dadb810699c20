//! Profile persistence
//!
//! Profiles live as TOML files in a single directory, one profile per file,
//! named `<profile name>.toml`. Lookup is by the `name` field inside the
//! file, not the file name, so renamed files still resolve.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ProfileError, ProfileResult};
use crate::host::HostContext;
use crate::profile::BuildProfile;

/// Directory-backed profile collection.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every `.toml` profile under the store directory, sorted by name.
    /// A missing directory is an empty store.
    pub fn load_all(&self) -> ProfileResult<Vec<BuildProfile>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut profiles = Vec::new();
        for entry in WalkDir::new(&self.dir).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                profiles.push(self.load_file(path)?);
            }
        }
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    pub fn load_file(&self, path: &Path) -> ProfileResult<BuildProfile> {
        let contents =
            fs::read_to_string(path).map_err(|e| ProfileError::profile_read(path, e))?;
        toml::from_str(&contents).map_err(|e| ProfileError::profile_read(path, e))
    }

    /// Find a profile by its `name` field.
    pub fn find_by_name(&self, name: &str) -> ProfileResult<BuildProfile> {
        self.load_all()?
            .into_iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    /// Write a profile to `<name>.toml`, creating the store directory if
    /// needed.
    pub fn save(&self, profile: &BuildProfile) -> ProfileResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| ProfileError::io(&self.dir, e))?;
        let path = self.dir.join(format!("{}.toml", profile.name));
        let contents =
            toml::to_string_pretty(profile).map_err(|e| ProfileError::profile_write(&path, e))?;
        fs::write(&path, contents).map_err(|e| ProfileError::profile_write(&path, e))?;
        Ok(path)
    }

    /// Create and persist a profile seeded from current host state.
    pub fn create_from_host(
        &self,
        name: impl Into<String>,
        host: &dyn HostContext,
    ) -> ProfileResult<BuildProfile> {
        let profile = BuildProfile::from_host(name, host);
        self.save(&profile)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::platform::Platform;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_directory_is_empty_store() {
        let store = ProfileStore::new("/nonexistent/builders");
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_find_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());

        let mut profile = BuildProfile::new("Release", Platform::Linux64);
        profile.application_identifier = "com.example.release".to_string();
        let path = store.save(&profile).unwrap();
        assert_eq!(path, dir.path().join("Release.toml"));

        let loaded = store.find_by_name("Release").unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_lookup_uses_name_field_not_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());

        let profile = BuildProfile::new("Nightly", Platform::Android);
        let contents = toml::to_string_pretty(&profile).unwrap();
        std::fs::write(dir.path().join("renamed-on-disk.toml"), contents).unwrap();

        assert!(store.find_by_name("Nightly").is_ok());
        assert!(matches!(
            store.find_by_name("renamed-on-disk"),
            Err(ProfileError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_all_sorted_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());

        store.save(&BuildProfile::new("Zeta", Platform::Ios)).unwrap();
        store.save(&BuildProfile::new("Alpha", Platform::Ios)).unwrap();
        std::fs::write(dir.path().join("README.md"), "not a profile").unwrap();

        let names: Vec<_> = store
            .load_all()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }

    #[test]
    fn test_malformed_profile_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        std::fs::write(dir.path().join("broken.toml"), "name = ").unwrap();

        assert!(matches!(
            store.load_all(),
            Err(ProfileError::ProfileReadError { .. })
        ));
    }

    #[test]
    fn test_create_from_host() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());

        let mut host = MemoryHost::new(Platform::WebGl, "/tmp/project");
        host.settings.product_name = "Web Demo".to_string();

        let profile = store.create_from_host("Web", &host).unwrap();
        assert_eq!(profile.platform, Platform::WebGl);
        assert_eq!(store.find_by_name("Web").unwrap().product_name, "Web Demo");
    }
}
