/// Orchestration error types
use thiserror::Error;

use gantry_profile::{HostError, ProfileError};

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("You need to specify the builder as follows: '-builder <builder name>'")]
    MissingBuilderName,

    #[error("A build is already pending; resume or cancel it first")]
    BuildInProgress,

    #[error("No pending build to resume")]
    NoPendingBuild,

    #[error("Script recompilation failed; build aborted")]
    RecompileFailed,

    #[error("Application build is disabled for profile '{0}'")]
    ApplicationBuildDisabled(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
