//! Build orchestration
//!
//! Drives a complete build from a resolved profile: symbol resolution,
//! optional recompile handoff, settings application, content-bundle and
//! player builds, directory exclusion around the player build, and
//! post-processor dispatch. Command-line argument handling for headless
//! invocations lives here too, so embedders and the CLI share one parser.

pub mod args;
pub mod error;
pub mod exclude;
pub mod orchestrator;
pub mod postprocess;

pub use args::ExecuteArgs;
pub use error::{PipelineError, PipelineResult};
pub use exclude::ExclusionGuard;
pub use orchestrator::{
    select_profile, BuildOutcome, BuildPhase, BuildReport, BuildRequest, Orchestrator,
};
pub use postprocess::{PostProcessor, PostProcessorRegistry};
