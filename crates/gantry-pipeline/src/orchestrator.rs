//! Build orchestration state machine
//!
//! A build runs in phases: resolve define symbols, hand off for a recompile
//! when the set changed, apply the profile to host settings, then run the
//! bundle and player builds. The recompile handoff is explicit because the
//! host invalidates compiled scripts when symbols change; the caller resumes
//! the pending build once compilation has settled. There is no timeout on
//! that wait, the pending request stays queued until resumed or dropped.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use gantry_profile::{BuildProfile, HostContext, PlayerBuildJob, ProfileError, ProfileStore};

use crate::args::ExecuteArgs;
use crate::error::{PipelineError, PipelineResult};
use crate::exclude::ExclusionGuard;
use crate::postprocess::PostProcessorRegistry;

/// Everything needed to run one build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub profile: BuildProfile,
    /// Launch the player after a successful build
    pub run_after_build: bool,
    /// Build content bundles and stop before the player build
    pub bundles_only: bool,
    pub append_symbols: Option<String>,
    pub dev_build_number: Option<String>,
}

impl BuildRequest {
    pub fn new(profile: BuildProfile) -> Self {
        Self {
            profile,
            run_after_build: false,
            bundles_only: false,
            append_symbols: None,
            dev_build_number: None,
        }
    }

    /// Build a request from a resolved profile plus invocation flags.
    pub fn from_args(profile: BuildProfile, args: &ExecuteArgs) -> Self {
        Self::new(profile)
            .with_append_symbols(args.append_symbols().map(str::to_string))
            .with_dev_build_number(args.dev_build_number().map(str::to_string))
    }

    pub fn with_run_after_build(mut self, run: bool) -> Self {
        self.run_after_build = run;
        self
    }

    pub fn with_bundles_only(mut self, bundles_only: bool) -> Self {
        self.bundles_only = bundles_only;
        self
    }

    pub fn with_append_symbols(mut self, symbols: Option<String>) -> Self {
        self.append_symbols = symbols;
        self
    }

    pub fn with_dev_build_number(mut self, number: Option<String>) -> Self {
        self.dev_build_number = number;
        self
    }
}

/// Where the orchestrator currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildPhase {
    #[default]
    Idle,
    SymbolsResolving,
    AwaitingRecompile,
    ApplyingSettings,
    BuildingBundles,
    BuildingPlayer,
    Done,
    Failed,
}

/// Result of a successful `start` or `resume`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Symbols changed; the build is queued until [`Orchestrator::resume`]
    AwaitingRecompile,
    Completed(BuildReport),
}

/// What a completed build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub profile_name: String,
    /// Define symbols in effect for the build
    pub symbols: String,
    pub symbols_changed: bool,
    /// Player artifact path, absent for bundles-only runs
    pub output_path: Option<PathBuf>,
    pub bundle_output_path: Option<PathBuf>,
    pub post_processors_run: Vec<String>,
}

/// Drives builds against one host.
pub struct Orchestrator<H: HostContext> {
    host: H,
    post_processors: PostProcessorRegistry,
    pending: Option<(BuildRequest, bool)>,
    phase: BuildPhase,
    verbose: bool,
    timestamp: Option<NaiveDateTime>,
}

impl<H: HostContext> Orchestrator<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            post_processors: PostProcessorRegistry::new(),
            pending: None,
            phase: BuildPhase::Idle,
            verbose: false,
            timestamp: None,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_post_processors(mut self, registry: PostProcessorRegistry) -> Self {
        self.post_processors = registry;
        self
    }

    /// Pin the timestamp used for token expansion; defaults to now.
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Begin a build. When the define-symbol set changes the request is
    /// queued and [`BuildOutcome::AwaitingRecompile`] is returned; the
    /// caller resumes after the host has recompiled.
    pub fn start(&mut self, request: BuildRequest) -> PipelineResult<BuildOutcome> {
        if self.pending.is_some() {
            return Err(PipelineError::BuildInProgress);
        }

        self.phase = BuildPhase::SymbolsResolving;
        self.log(&format!("Resolving symbols for '{}'", request.profile.name));
        let resolution = request
            .profile
            .resolve_symbols(&mut self.host, request.append_symbols.as_deref());

        if resolution.changed {
            self.log("Symbol set changed, waiting for recompile");
            self.pending = Some((request, true));
            self.phase = BuildPhase::AwaitingRecompile;
            return Ok(BuildOutcome::AwaitingRecompile);
        }

        self.run_to_completion(request, false)
    }

    /// Resume the queued build once the host reports compilation finished.
    pub fn resume(&mut self, compile_ok: bool) -> PipelineResult<BuildOutcome> {
        let (request, symbols_changed) =
            self.pending.take().ok_or(PipelineError::NoPendingBuild)?;
        if !compile_ok {
            self.phase = BuildPhase::Failed;
            return Err(PipelineError::RecompileFailed);
        }

        self.run_to_completion(request, symbols_changed)
    }

    fn run_to_completion(
        &mut self,
        request: BuildRequest,
        symbols_changed: bool,
    ) -> PipelineResult<BuildOutcome> {
        let outcome = self.execute(request, symbols_changed);
        if outcome.is_err() {
            self.phase = BuildPhase::Failed;
        }
        outcome
    }

    fn execute(
        &mut self,
        request: BuildRequest,
        symbols_changed: bool,
    ) -> PipelineResult<BuildOutcome> {
        let profile = &request.profile;
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| chrono::Local::now().naive_local());

        self.phase = BuildPhase::ApplyingSettings;
        self.log(&format!("Applying profile '{}'", profile.name));
        profile.apply(&mut self.host, request.dev_build_number.as_deref())?;

        let mut report = BuildReport {
            profile_name: profile.name.clone(),
            symbols: self.host.player_settings().define_symbols.clone(),
            symbols_changed,
            output_path: None,
            bundle_output_path: None,
            post_processors_run: Vec::new(),
        };

        if profile.build_asset_bundles || request.bundles_only {
            self.phase = BuildPhase::BuildingBundles;
            let bundle_output = profile.resolve_bundle_output_path(&self.host);
            self.log(&format!("Building bundles into {}", bundle_output.display()));
            self.host.build_bundles(
                &bundle_output,
                profile.bundle_compression,
                profile.copy_to_streaming_assets,
            )?;
            report.bundle_output_path = Some(bundle_output);
        }

        if request.bundles_only {
            self.phase = BuildPhase::Done;
            return Ok(BuildOutcome::Completed(report));
        }

        if !profile.build_application {
            return Err(PipelineError::ApplicationBuildDisabled(profile.name.clone()));
        }

        self.phase = BuildPhase::BuildingPlayer;
        let output_path = self.absolute_output_path(profile, timestamp);
        remove_stale_artifact(&output_path)?;

        let job = PlayerBuildJob {
            platform: profile.actual_platform(&self.host),
            scenes: self
                .host
                .player_settings()
                .scenes
                .iter()
                .filter(|scene| scene.enabled)
                .map(|scene| scene.path.clone())
                .collect(),
            output_path: output_path.clone(),
            development: profile.development_build,
            auto_run: request.run_after_build,
        };

        self.log(&format!("Building player at {}", output_path.display()));
        let guard =
            ExclusionGuard::exclude(self.host.project_dir(), &profile.exclude_directories)?;
        let build_result = self.host.build_player(&job);
        let restore_result = guard.restore();
        // A build failure is the error worth reporting; restore problems
        // only surface when the build itself succeeded.
        build_result?;
        restore_result?;

        report.post_processors_run =
            self.post_processors
                .run_for(job.platform, profile, &output_path)?;
        report.output_path = Some(output_path);

        self.phase = BuildPhase::Done;
        Ok(BuildOutcome::Completed(report))
    }

    fn absolute_output_path(&self, profile: &BuildProfile, timestamp: NaiveDateTime) -> PathBuf {
        let resolved = profile.resolve_output_path(&self.host, timestamp);
        if resolved.is_absolute() {
            resolved
        } else {
            self.host.project_dir().join(resolved)
        }
    }

    fn log(&self, message: &str) {
        if self.verbose {
            println!("[gantry] {message}");
        }
    }
}

fn remove_stale_artifact(path: &std::path::Path) -> std::io::Result<()> {
    match path.metadata() {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Resolve the profile a headless invocation asked for, with any JSON
/// override already applied.
pub fn select_profile(
    store: &ProfileStore,
    args: &ExecuteArgs,
    host: &dyn HostContext,
) -> PipelineResult<BuildProfile> {
    let name = args.builder_name().ok_or(PipelineError::MissingBuilderName)?;
    let mut profile = store.find_by_name(&name)?;

    if profile.build_application && profile.platform != host.active_platform() {
        return Err(PipelineError::Profile(ProfileError::PlatformMismatch {
            name: profile.name,
            profile_platform: profile.platform,
            active_platform: host.active_platform(),
        }));
    }

    if let Some(json) = args.override_json() {
        gantry_profile::overrides::apply_json_override(&mut profile, json)?;
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_profile::host::SceneEntry;
    use gantry_profile::{MemoryHost, Platform};
    use pretty_assertions::assert_eq;

    fn project_host(platform: Platform) -> (tempfile::TempDir, MemoryHost) {
        let dir = tempfile::tempdir().unwrap();
        let host = MemoryHost::new(platform, dir.path());
        (dir, host)
    }

    fn profile(platform: Platform) -> BuildProfile {
        let mut profile = BuildProfile::new("Demo", platform);
        profile.application_identifier = "com.example.demo".to_string();
        profile
    }

    #[test]
    fn test_straight_through_build() {
        let (dir, host) = project_host(Platform::Linux64);
        let mut orchestrator = Orchestrator::new(host);

        let outcome = orchestrator
            .start(BuildRequest::new(profile(Platform::Linux64)))
            .unwrap();

        let BuildOutcome::Completed(report) = outcome else {
            panic!("expected completed build");
        };
        assert!(!report.symbols_changed);
        assert_eq!(
            report.output_path,
            Some(
                dir.path()
                    .join("Build/Linux/com.example.demo_1.0.0_1000001.x86_64")
            )
        );
        assert_eq!(orchestrator.phase(), BuildPhase::Done);
        assert_eq!(orchestrator.host().player_builds.len(), 1);
        assert!(dir.path().join("BUILD_VERSION").exists());
    }

    #[test]
    fn test_symbol_change_queues_until_resume() {
        let (_dir, host) = project_host(Platform::Linux64);
        let mut orchestrator = Orchestrator::new(host);

        let mut p = profile(Platform::Linux64);
        p.define_symbols = "DEMO".to_string();

        let outcome = orchestrator.start(BuildRequest::new(p)).unwrap();
        assert_eq!(outcome, BuildOutcome::AwaitingRecompile);
        assert_eq!(orchestrator.phase(), BuildPhase::AwaitingRecompile);
        assert!(orchestrator.host().player_builds.is_empty());

        let resumed = orchestrator.resume(true).unwrap();
        let BuildOutcome::Completed(report) = resumed else {
            panic!("expected completed build");
        };
        assert!(report.symbols_changed);
        assert_eq!(report.symbols, "DEMO");
        assert_eq!(orchestrator.host().player_builds.len(), 1);
    }

    #[test]
    fn test_start_while_pending_is_rejected() {
        let (_dir, host) = project_host(Platform::Linux64);
        let mut orchestrator = Orchestrator::new(host);

        let mut p = profile(Platform::Linux64);
        p.define_symbols = "DEMO".to_string();
        orchestrator.start(BuildRequest::new(p.clone())).unwrap();

        assert!(matches!(
            orchestrator.start(BuildRequest::new(p)),
            Err(PipelineError::BuildInProgress)
        ));
    }

    #[test]
    fn test_resume_without_pending() {
        let (_dir, host) = project_host(Platform::Linux64);
        let mut orchestrator = Orchestrator::new(host);
        assert!(matches!(
            orchestrator.resume(true),
            Err(PipelineError::NoPendingBuild)
        ));
    }

    #[test]
    fn test_failed_recompile_aborts() {
        let (_dir, host) = project_host(Platform::Linux64);
        let mut orchestrator = Orchestrator::new(host);

        let mut p = profile(Platform::Linux64);
        p.define_symbols = "DEMO".to_string();
        orchestrator.start(BuildRequest::new(p)).unwrap();

        assert!(matches!(
            orchestrator.resume(false),
            Err(PipelineError::RecompileFailed)
        ));
        assert_eq!(orchestrator.phase(), BuildPhase::Failed);
        assert!(orchestrator.host().player_builds.is_empty());
    }

    #[test]
    fn test_bundles_only_skips_player_build() {
        let (_dir, host) = project_host(Platform::Android);
        let mut orchestrator = Orchestrator::new(host);

        let request =
            BuildRequest::new(profile(Platform::Android)).with_bundles_only(true);
        let BuildOutcome::Completed(report) = orchestrator.start(request).unwrap() else {
            panic!("expected completed build");
        };

        assert_eq!(
            report.bundle_output_path,
            Some(PathBuf::from("AssetBundles/Android"))
        );
        assert_eq!(report.output_path, None);
        assert!(orchestrator.host().player_builds.is_empty());
        assert_eq!(orchestrator.host().bundle_builds.len(), 1);
    }

    #[test]
    fn test_bundle_failure_short_circuits_player_build() {
        let dir = tempfile::tempdir().unwrap();
        let host =
            MemoryHost::new(Platform::Linux64, dir.path()).with_bundle_failure("disk full");
        let mut orchestrator = Orchestrator::new(host);

        let mut p = profile(Platform::Linux64);
        p.build_asset_bundles = true;

        assert!(matches!(
            orchestrator.start(BuildRequest::new(p)),
            Err(PipelineError::Host(_))
        ));
        assert_eq!(orchestrator.phase(), BuildPhase::Failed);
        assert!(orchestrator.host().player_builds.is_empty());
    }

    #[test]
    fn test_application_build_disabled_is_an_error() {
        let (_dir, host) = project_host(Platform::Linux64);
        let mut orchestrator = Orchestrator::new(host);

        let mut p = profile(Platform::Linux64);
        p.build_application = false;

        assert!(matches!(
            orchestrator.start(BuildRequest::new(p)),
            Err(PipelineError::ApplicationBuildDisabled(_))
        ));
        assert_eq!(orchestrator.phase(), BuildPhase::Failed);
    }

    #[test]
    fn test_player_build_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let host =
            MemoryHost::new(Platform::Linux64, dir.path()).with_player_failure("link error");
        let mut orchestrator = Orchestrator::new(host);

        assert!(matches!(
            orchestrator.start(BuildRequest::new(profile(Platform::Linux64))),
            Err(PipelineError::Host(_))
        ));
        assert_eq!(orchestrator.phase(), BuildPhase::Failed);
    }

    #[test]
    fn test_excluded_directories_restored_after_failed_build() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Assets/Sandbox")).unwrap();
        std::fs::write(dir.path().join("Assets/Sandbox/scratch.txt"), "x").unwrap();

        let host = MemoryHost::new(Platform::Linux64, dir.path()).with_player_failure("boom");
        let mut orchestrator = Orchestrator::new(host);

        let mut p = profile(Platform::Linux64);
        p.exclude_directories = vec!["Sandbox".to_string()];

        assert!(orchestrator.start(BuildRequest::new(p)).is_err());
        assert!(dir.path().join("Assets/Sandbox/scratch.txt").exists());
    }

    #[test]
    fn test_only_enabled_scenes_are_built() {
        let (_dir, mut host) = project_host(Platform::Linux64);
        host.settings.scenes = vec![
            SceneEntry {
                path: "Assets/Title.scene".to_string(),
                enabled: true,
            },
            SceneEntry {
                path: "Assets/Debug.scene".to_string(),
                enabled: false,
            },
        ];
        let mut orchestrator = Orchestrator::new(host);

        orchestrator
            .start(BuildRequest::new(profile(Platform::Linux64)))
            .unwrap();
        let job = &orchestrator.host().player_builds[0];
        assert_eq!(job.scenes, vec!["Assets/Title.scene".to_string()]);
    }

    #[test]
    fn test_stale_artifact_is_removed_before_build() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir
            .path()
            .join("Build/Linux/com.example.demo_1.0.0_1000001.x86_64");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "old build").unwrap();

        let host = MemoryHost::new(Platform::Linux64, dir.path());
        let mut orchestrator = Orchestrator::new(host);
        orchestrator
            .start(BuildRequest::new(profile(Platform::Linux64)))
            .unwrap();

        assert!(!stale.exists());
    }

    mod select_profile {
        use super::*;
        use pretty_assertions::assert_eq;

        fn store_with(profiles: &[BuildProfile]) -> (tempfile::TempDir, ProfileStore) {
            let dir = tempfile::tempdir().unwrap();
            let store = ProfileStore::new(dir.path());
            for profile in profiles {
                store.save(profile).unwrap();
            }
            (dir, store)
        }

        #[test]
        fn test_missing_builder_flag() {
            let (_dir, store) = store_with(&[]);
            let host = MemoryHost::new(Platform::Linux64, "/tmp/project");
            let args = ExecuteArgs::parse(Vec::<String>::new());
            assert!(matches!(
                select_profile(&store, &args, &host),
                Err(PipelineError::MissingBuilderName)
            ));
        }

        #[test]
        fn test_unknown_builder() {
            let (_dir, store) = store_with(&[]);
            let host = MemoryHost::new(Platform::Linux64, "/tmp/project");
            let args = ExecuteArgs::parse(["-builder", "Ghost"]);
            assert!(matches!(
                select_profile(&store, &args, &host),
                Err(PipelineError::Profile(ProfileError::NotFound(_)))
            ));
        }

        #[test]
        fn test_platform_mismatch() {
            let (_dir, store) = store_with(&[profile(Platform::Android)]);
            let host = MemoryHost::new(Platform::Linux64, "/tmp/project");
            let args = ExecuteArgs::parse(["-builder", "Demo"]);
            assert!(matches!(
                select_profile(&store, &args, &host),
                Err(PipelineError::Profile(ProfileError::PlatformMismatch { .. }))
            ));
        }

        #[test]
        fn test_override_applies() {
            let (_dir, store) = store_with(&[profile(Platform::Linux64)]);
            let host = MemoryHost::new(Platform::Linux64, "/tmp/project");
            let args = ExecuteArgs::parse([
                "-builder",
                "Demo",
                "-override",
                r#"{"application_identifier": "com.example.patched"}"#,
            ]);

            let selected = select_profile(&store, &args, &host).unwrap();
            assert_eq!(selected.application_identifier, "com.example.patched");
        }

        #[test]
        fn test_cloud_builder_name_decodes_dashes() {
            let mut named = profile(Platform::Linux64);
            named.name = "Nightly QA".to_string();
            let (_dir, store) = store_with(&[named]);
            let host = MemoryHost::new(Platform::Linux64, "/tmp/project");
            let args = ExecuteArgs::parse(["-bvrbuildtarget", "Nightly-QA"]);

            assert_eq!(
                select_profile(&store, &args, &host).unwrap().name,
                "Nightly QA"
            );
        }
    }
}
