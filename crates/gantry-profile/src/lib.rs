//! Build profile resolution core
//!
//! Provides the configuration engine behind the gantry build pipeline:
//! - Build profiles (one persisted TOML document per target) with identity,
//!   versioning, output templates, scenes, and per-platform sub-settings
//! - Token resolution for output paths and file names
//! - Composite version code formatting for platform packaging systems
//! - Define-symbol resolution against the previously applied symbol set
//! - The [`HostContext`] abstraction over the hosting editor runtime
//!
//! Everything in this crate is deterministic given its inputs: the current
//! date/time is injected where tokens need it, and all host state goes
//! through [`HostContext`] so it can be faked in tests.

pub mod error;
pub mod host;
pub mod overrides;
pub mod platform;
pub mod profile;
pub mod settings;
pub mod store;
pub mod symbols;
pub mod tokens;
pub mod version;

pub use error::{ProfileError, ProfileResult};
pub use host::{HostContext, HostError, HostResult, MemoryHost, PlayerBuildJob, PlayerSettings};
pub use platform::Platform;
pub use profile::{BuildProfile, BundleCompression, SceneSetting};
pub use settings::{AndroidSettings, IosSettings, TargetSettings, WebGlSettings};
pub use store::ProfileStore;
pub use symbols::SymbolResolution;
pub use tokens::TokenContext;
