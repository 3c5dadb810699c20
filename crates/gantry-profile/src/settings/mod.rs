//! Per-platform sub-settings variants
//!
//! A profile persists one sub-settings bag per supported platform; exactly
//! one is active at a time, selected by the profile's target platform tag.
//! Every variant implements the same capability set: snapshot from host
//! state, apply back to host state, and (where the platform has a native
//! build-number slot) contribute the composite version code.

pub mod android;
pub mod ios;
pub mod webgl;

pub use android::{
    AndroidArchitecture, AndroidBuildMode, AndroidKeystoreSettings, AndroidSettings,
    AndroidSymbolsZipSettings, AndroidTargetSettings, ArchitectureSet, ScriptingBackend,
};
pub use ios::{
    IosEntitlementsSettings, IosExportOptionsSettings, IosFrameworksSettings,
    IosLanguagesSettings, IosServicesSettings, IosSettings, IosSigningSettings,
};
pub use webgl::WebGlSettings;

use crate::error::ProfileResult;
use crate::host::PlayerSettings;
use crate::platform::Platform;

/// Operation set shared by every platform sub-settings variant.
pub trait TargetSettings {
    /// Platform this variant belongs to
    fn platform(&self) -> Platform;

    /// One-way snapshot from current host state
    fn read_from_host(&mut self, settings: &PlayerSettings);

    /// Push this variant's fields into host state; `composite_version_code`
    /// is written to the platform's native build-number slot where one exists.
    fn apply_to_host(
        &self,
        settings: &mut PlayerSettings,
        composite_version_code: &str,
    ) -> ProfileResult<()>;
}
