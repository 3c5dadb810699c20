//! Headless build entry point
//!
//! Runs one build in the current project directory:
//! `gantry -builder <name> [-appendSymbols A;B] [-override {...}]
//! [-devBuildNumber 42]`. Exits 0 on a completed build and 1 on any
//! failure, so CI systems can gate on the status alone.

mod host;

use std::process::ExitCode;

use colored::Colorize;

use gantry_pipeline::{
    select_profile, BuildOutcome, BuildReport, BuildRequest, ExclusionGuard, ExecuteArgs,
    Orchestrator,
};
use gantry_profile::ProfileStore;

use crate::host::ProjectHost;

fn main() -> ExitCode {
    let args = ExecuteArgs::from_env();
    match run(&args) {
        Ok(report) => {
            let target = report
                .output_path
                .or(report.bundle_output_path)
                .map(|path| path.display().to_string())
                .unwrap_or_default();
            println!(
                "{} {} {}",
                "Build succeeded:".green().bold(),
                report.profile_name,
                target
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e:#}", "Build failed:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &ExecuteArgs) -> anyhow::Result<BuildReport> {
    let root = std::env::current_dir()?;
    // A crashed earlier run may have left excluded directories aside.
    ExclusionGuard::restore_orphaned(&root)?;

    let host = ProjectHost::load(&root)?;
    let store = ProfileStore::new(root.join(&host.config().builders_dir));
    let profile = select_profile(&store, args, &host)?;
    let request = BuildRequest::from_args(profile, args);

    let mut orchestrator = Orchestrator::new(host).with_verbose(true);
    let outcome = match orchestrator.start(request)? {
        // The file-backed host has no compiler to wait on; the new symbol
        // set is already persisted, so resume immediately.
        BuildOutcome::AwaitingRecompile => orchestrator.resume(true)?,
        done => done,
    };

    match outcome {
        BuildOutcome::Completed(report) => Ok(report),
        BuildOutcome::AwaitingRecompile => {
            anyhow::bail!("build did not complete after recompilation")
        }
    }
}
