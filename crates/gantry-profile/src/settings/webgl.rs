//! WebGL build settings
//!
//! WebGL has no host-side fields beyond the shared player settings; the
//! variant exists so the platform participates in the same dispatch as the
//! others and stays extensible.

use serde::{Deserialize, Serialize};

use crate::error::ProfileResult;
use crate::host::PlayerSettings;
use crate::platform::Platform;
use crate::settings::TargetSettings;

/// WebGL sub-settings variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebGlSettings {}

impl TargetSettings for WebGlSettings {
    fn platform(&self) -> Platform {
        Platform::WebGl
    }

    fn read_from_host(&mut self, _settings: &PlayerSettings) {}

    fn apply_to_host(
        &self,
        _settings: &mut PlayerSettings,
        _composite_version_code: &str,
    ) -> ProfileResult<()> {
        Ok(())
    }
}
