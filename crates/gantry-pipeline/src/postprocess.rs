//! Build post-processors
//!
//! After a successful player build, registered post-processors run in
//! registration order against the built artifact. A processor declares the
//! platform it handles; processors for other platforms are skipped. The
//! first failing processor aborts the chain.

use std::path::Path;

use gantry_profile::{BuildProfile, Platform};

use crate::error::PipelineResult;

/// One step run against a finished build artifact.
pub trait PostProcessor {
    /// Human-readable step name, for progress output
    fn name(&self) -> &str;

    /// Platform this processor applies to
    fn platform(&self) -> Platform;

    fn run(&self, profile: &BuildProfile, output_path: &Path) -> PipelineResult<()>;
}

/// Ordered collection of post-processors.
#[derive(Default)]
pub struct PostProcessorRegistry {
    processors: Vec<Box<dyn PostProcessor>>,
}

impl PostProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, processor: Box<dyn PostProcessor>) {
        self.processors.push(processor);
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run every processor registered for `platform`, in order. Returns the
    /// names of the processors that ran.
    pub fn run_for(
        &self,
        platform: Platform,
        profile: &BuildProfile,
        output_path: &Path,
    ) -> PipelineResult<Vec<String>> {
        let mut ran = Vec::new();
        for processor in &self.processors {
            if processor.platform() != platform {
                continue;
            }
            processor.run(profile, output_path)?;
            ran.push(processor.name().to_string());
        }
        Ok(ran)
    }
}

impl std::fmt::Debug for PostProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostProcessorRegistry")
            .field("processors", &self.processors.len())
            .finish()
    }
}
