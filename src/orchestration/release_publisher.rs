//! Release Publisher - runs the release steps for a planned release
//!
//! Executes, strictly in order:
//! 1. Build the distributions
//! 2. Create the hosting release for tag `v{version}`
//! 3. Upload the distributions to the registry
//! 4. Deploy the documentation (only when the plan asks for it)
//!
//! The first failing step aborts the run. Completed steps are not rolled back.

use super::plan::{DocsPlan, ReleasePlan, StepKind};
use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, Result};
use crate::security::{CommandError, CommandRunner, ExternalCommand};
use crate::ui;
use crate::validation::PackageInfo;
use crate::version::{TAG_PREFIX, Version};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One step the publisher ran, or would have run in a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: StepKind,
    pub command: ExternalCommand,
    pub executed: bool,
}

/// Publishing report returned after a publish operation
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub package: String,
    pub version: Version,
    pub plan: ReleasePlan,
    pub steps: Vec<StepRecord>,
    pub skipped: Vec<StepKind>,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PublishReport {
    /// Commands in the order they were (or would have been) run
    pub fn commands(&self) -> Vec<&ExternalCommand> {
        self.steps.iter().map(|record| &record.command).collect()
    }
}

/// Release tag for a version, e.g. `v1.2.0`
pub fn release_tag(version: &Version) -> String {
    format!("{}{}", TAG_PREFIX, version)
}

fn from_template<I, S>(step: StepKind, template: &[String], extra: I) -> Result<ExternalCommand>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ExternalCommand::from_template(template, extra)
        .ok_or_else(|| ReleaseError::Config(format!("no command configured for {}", step)))
}

pub fn build_command(template: &[String]) -> Result<ExternalCommand> {
    from_template(StepKind::Build, template, Vec::<String>::new())
}

/// `gh release create v{version} --generate-notes [--prerelease] <files...> <license>`
pub fn host_release_command(
    template: &[String],
    version: &Version,
    dist_files: &[String],
    license_file: &str,
) -> Result<ExternalCommand> {
    let mut args = vec![release_tag(version), "--generate-notes".to_string()];
    if version.is_prerelease() {
        args.push("--prerelease".to_string());
    }
    args.extend(dist_files.iter().cloned());
    args.push(license_file.to_string());

    from_template(StepKind::HostRelease, template, args)
}

/// `twine upload <files...>`
pub fn registry_publish_command(template: &[String], dist_files: &[String]) -> Result<ExternalCommand> {
    from_template(StepKind::RegistryPublish, template, dist_files.iter().cloned())
}

/// `mike deploy --push --title {version} [--update-aliases] {title} [alias]`
pub fn docs_deploy_command(
    template: &[String],
    version: &Version,
    alias: Option<&str>,
) -> Result<ExternalCommand> {
    let mut args = vec![
        "--push".to_string(),
        "--title".to_string(),
        version.to_string(),
    ];
    if alias.is_some() {
        args.push("--update-aliases".to_string());
    }
    args.push(version.title());
    if let Some(alias) = alias {
        args.push(alias.to_string());
    }

    from_template(StepKind::DocsDeploy, template, args)
}

/// Main release orchestrator
pub struct ReleasePublisher<'a> {
    project_path: PathBuf,
    config: &'a ReleaseConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> ReleasePublisher<'a> {
    /// Create a new ReleasePublisher
    ///
    /// # Arguments
    ///
    /// * `project_path` - Path to the project directory
    /// * `config` - Effective configuration
    /// * `runner` - Executes the external commands of a real run
    pub fn new<P: AsRef<Path>>(
        project_path: P,
        config: &'a ReleaseConfig,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            config,
            runner,
        }
    }

    /// Publish a package according to `plan`.
    ///
    /// With `dry_run`, every command is printed, checked against the runner's
    /// policy and recorded but never run; the recorded sequence and the
    /// outcome are the ones a real run produces.
    pub fn publish(
        &self,
        package: &PackageInfo,
        plan: &ReleasePlan,
        dry_run: bool,
    ) -> Result<PublishReport> {
        let started_at = Utc::now();
        let version = &package.version;
        let mut steps = Vec::new();
        let mut skipped = Vec::new();

        info!(
            "publishing {} {} (dry run: {})",
            package.name, version, dry_run
        );

        // 1. Build
        if self.is_enabled(StepKind::Build, &mut skipped) {
            let command = build_command(&self.config.build_command())?;
            self.execute(StepKind::Build, command, dry_run, &mut steps)?;
        }

        let dist_files = self.dist_files()?;
        debug!("distribution files: {:?}", dist_files);

        // 2. Hosting release
        if self.is_enabled(StepKind::HostRelease, &mut skipped) {
            let command = host_release_command(
                &self.config.release_command(),
                version,
                &dist_files,
                self.config.license_file(),
            )?;
            self.execute(StepKind::HostRelease, command, dry_run, &mut steps)?;
        }

        // 3. Registry upload
        if self.is_enabled(StepKind::RegistryPublish, &mut skipped) {
            let command = registry_publish_command(&self.config.publish_command(), &dist_files)?;
            self.execute(StepKind::RegistryPublish, command, dry_run, &mut steps)?;
        }

        // 4. Documentation
        match &plan.docs {
            DocsPlan::Disabled => {
                ui::display_skipped(StepKind::DocsDeploy, "documentation disabled for this release");
                skipped.push(StepKind::DocsDeploy);
            }
            DocsPlan::Deploy { alias } => {
                if self.is_enabled(StepKind::DocsDeploy, &mut skipped) {
                    let command =
                        docs_deploy_command(&self.config.docs_command(), version, alias.as_deref())?;
                    self.execute(StepKind::DocsDeploy, command, dry_run, &mut steps)?;
                }
            }
        }

        Ok(PublishReport {
            package: package.name.clone(),
            version: *version,
            plan: plan.clone(),
            steps,
            skipped,
            dry_run,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn is_enabled(&self, step: StepKind, skipped: &mut Vec<StepKind>) -> bool {
        if self.config.is_skipped(step) {
            ui::display_skipped(step, "disabled in configuration");
            skipped.push(step);
            return false;
        }
        true
    }

    fn execute(
        &self,
        step: StepKind,
        command: ExternalCommand,
        dry_run: bool,
        steps: &mut Vec<StepRecord>,
    ) -> Result<()> {
        let step_failure = |e: CommandError| ReleaseError::ExternalStepFailure {
            step: step.to_string(),
            message: e.to_string(),
        };

        ui::display_step(step, &command, dry_run);
        self.runner.check(&command).map_err(step_failure)?;

        if !dry_run {
            self.runner.run(&command).map_err(step_failure)?;
            info!("{} finished", step);
        }

        steps.push(StepRecord {
            step,
            command,
            executed: !dry_run,
        });
        Ok(())
    }

    /// Files in the dist directory, relative to the project, sorted by name
    fn dist_files(&self) -> Result<Vec<String>> {
        let dist_dir = self.config.dist_dir();
        let absolute = self.project_path.join(dist_dir);
        if !absolute.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&absolute)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ReleaseError::ExternalStepFailure {
                step: "dist-discovery".to_string(),
                message: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                files.push(
                    Path::new(dist_dir)
                        .join(entry.file_name())
                        .to_string_lossy()
                        .into_owned(),
                );
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CommandsConfig;
    use crate::security::SafeCommandExecutor;
    use crate::version::parse;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records every command and optionally fails on one program
    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<ExternalCommand>>,
        fail_on: Option<&'static str>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command: &ExternalCommand) -> std::result::Result<(), CommandError> {
            self.calls.borrow_mut().push(command.clone());
            if self.fail_on == Some(command.program.as_str()) {
                return Err(CommandError::NonZeroExit {
                    command: command.to_string(),
                    status: "exit status: 1".to_string(),
                });
            }
            Ok(())
        }
    }

    fn package(raw: &str) -> PackageInfo {
        PackageInfo {
            name: "configman".to_string(),
            version: parse(raw).unwrap(),
        }
    }

    fn project_with_dist() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let dist = temp_dir.path().join("dist");
        std::fs::create_dir(&dist).unwrap();
        std::fs::write(dist.join("configman-1.2.0.tar.gz"), b"sdist").unwrap();
        std::fs::write(dist.join("configman-1.2.0-py3-none-any.whl"), b"wheel").unwrap();
        std::fs::create_dir(dist.join("nested")).unwrap();
        temp_dir
    }

    fn argv(command: &ExternalCommand) -> Vec<String> {
        let mut words = vec![command.program.clone()];
        words.extend(command.args.iter().cloned());
        words
    }

    #[test]
    fn test_host_release_command_final() {
        let command = host_release_command(
            &ReleaseConfig::default().release_command(),
            &parse("1.2.0").unwrap(),
            &["dist/a.whl".to_string()],
            "LICENSE",
        )
        .unwrap();

        assert_eq!(
            argv(&command),
            ["gh", "release", "create", "v1.2.0", "--generate-notes", "dist/a.whl", "LICENSE"]
        );
    }

    #[test]
    fn test_host_release_command_prerelease() {
        let command = host_release_command(
            &ReleaseConfig::default().release_command(),
            &parse("2.0.0rc1").unwrap(),
            &[],
            "LICENSE",
        )
        .unwrap();

        assert!(command.args.contains(&"--prerelease".to_string()));
        assert!(command.args.contains(&"v2.0.0rc1".to_string()));
    }

    #[test]
    fn test_docs_deploy_command_with_alias() {
        let command = docs_deploy_command(
            &ReleaseConfig::default().docs_command(),
            &parse("1.4.0").unwrap(),
            Some("latest"),
        )
        .unwrap();

        assert_eq!(
            argv(&command),
            ["mike", "deploy", "--push", "--title", "1.4.0", "--update-aliases", "1.X", "latest"]
        );
    }

    #[test]
    fn test_docs_deploy_command_without_alias() {
        let command = docs_deploy_command(
            &ReleaseConfig::default().docs_command(),
            &parse("0.3.0").unwrap(),
            None,
        )
        .unwrap();

        assert_eq!(
            argv(&command),
            ["mike", "deploy", "--push", "--title", "0.3.0", "0.3.0"]
        );
    }

    #[test]
    fn test_publish_runs_steps_in_order() {
        let project = project_with_dist();
        let config = ReleaseConfig::default();
        let runner = RecordingRunner::default();
        let publisher = ReleasePublisher::new(project.path(), &config, &runner);
        let plan = ReleasePlan {
            docs: DocsPlan::Deploy {
                alias: Some("latest".to_string()),
            },
        };

        let report = publisher.publish(&package("1.2.0"), &plan, false).unwrap();

        let programs: Vec<String> = runner
            .calls
            .borrow()
            .iter()
            .map(|c| c.program.clone())
            .collect();
        assert_eq!(programs, ["python", "gh", "twine", "mike"]);
        assert!(report.steps.iter().all(|s| s.executed));
        assert!(report.skipped.is_empty());

        let upload = &runner.calls.borrow()[2];
        assert_eq!(
            upload.args,
            [
                "upload",
                "dist/configman-1.2.0-py3-none-any.whl",
                "dist/configman-1.2.0.tar.gz"
            ]
        );
    }

    #[test]
    fn test_disabled_docs_skip_the_last_step() {
        let project = project_with_dist();
        let config = ReleaseConfig::default();
        let runner = RecordingRunner::default();
        let publisher = ReleasePublisher::new(project.path(), &config, &runner);
        let plan = ReleasePlan {
            docs: DocsPlan::Disabled,
        };

        let report = publisher.publish(&package("1.2.0b1"), &plan, false).unwrap();

        assert_eq!(runner.calls.borrow().len(), 3);
        assert_eq!(report.skipped, [StepKind::DocsDeploy]);
    }

    #[test]
    fn test_configured_skip() {
        let project = project_with_dist();
        let config = ReleaseConfig {
            commands: Some(CommandsConfig {
                skip: Some(vec![StepKind::HostRelease]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let runner = RecordingRunner::default();
        let publisher = ReleasePublisher::new(project.path(), &config, &runner);
        let plan = ReleasePlan {
            docs: DocsPlan::Deploy { alias: None },
        };

        let report = publisher.publish(&package("1.2.0"), &plan, false).unwrap();

        let steps: Vec<StepKind> = report.steps.iter().map(|s| s.step).collect();
        assert_eq!(
            steps,
            [StepKind::Build, StepKind::RegistryPublish, StepKind::DocsDeploy]
        );
        assert_eq!(report.skipped, [StepKind::HostRelease]);
    }

    #[test]
    fn test_failure_aborts_remaining_steps() {
        let project = project_with_dist();
        let config = ReleaseConfig::default();
        let runner = RecordingRunner {
            fail_on: Some("twine"),
            ..Default::default()
        };
        let publisher = ReleasePublisher::new(project.path(), &config, &runner);
        let plan = ReleasePlan {
            docs: DocsPlan::Deploy { alias: None },
        };

        let err = publisher.publish(&package("1.2.0"), &plan, false).unwrap_err();

        match err {
            ReleaseError::ExternalStepFailure { step, .. } => {
                assert_eq!(step, "registry-publish")
            }
            other => panic!("unexpected error: {other}"),
        }
        let programs: Vec<String> = runner
            .calls
            .borrow()
            .iter()
            .map(|c| c.program.clone())
            .collect();
        assert_eq!(programs, ["python", "gh", "twine"]);
    }

    #[test]
    fn test_dry_run_matches_real_run() {
        let project = project_with_dist();
        let config = ReleaseConfig::default();
        let plan = ReleasePlan {
            docs: DocsPlan::Deploy {
                alias: Some("latest".to_string()),
            },
        };

        let real_runner = RecordingRunner::default();
        let real = ReleasePublisher::new(project.path(), &config, &real_runner)
            .publish(&package("1.2.0"), &plan, false)
            .unwrap();

        let dry_runner = RecordingRunner::default();
        let dry = ReleasePublisher::new(project.path(), &config, &dry_runner)
            .publish(&package("1.2.0"), &plan, true)
            .unwrap();

        assert!(dry_runner.calls.borrow().is_empty());
        assert!(dry.steps.iter().all(|s| !s.executed));
        assert_eq!(dry.commands(), real.commands());
        let executed: Vec<ExternalCommand> = real.commands().into_iter().cloned().collect();
        assert_eq!(*real_runner.calls.borrow(), executed);
    }

    #[test]
    fn test_disallowed_program_fails_in_both_modes() {
        let project = project_with_dist();
        let config = ReleaseConfig {
            commands: Some(CommandsConfig {
                build: Some(vec!["make".to_string(), "dist".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let executor = SafeCommandExecutor::new(project.path()).unwrap();
        let publisher = ReleasePublisher::new(project.path(), &config, &executor);
        let plan = ReleasePlan {
            docs: DocsPlan::Disabled,
        };

        for dry_run in [true, false] {
            let err = publisher
                .publish(&package("1.2.0"), &plan, dry_run)
                .unwrap_err();
            match err {
                ReleaseError::ExternalStepFailure { step, message } => {
                    assert_eq!(step, "build");
                    assert!(message.contains("make"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_missing_dist_dir_yields_no_files() {
        let project = TempDir::new().unwrap();
        let config = ReleaseConfig::default();
        let runner = RecordingRunner::default();
        let publisher = ReleasePublisher::new(project.path(), &config, &runner);

        assert!(publisher.dist_files().unwrap().is_empty());
    }

    #[test]
    fn test_empty_command_template_is_config_error() {
        let project = project_with_dist();
        let config = ReleaseConfig {
            commands: Some(CommandsConfig {
                build: Some(vec![]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let runner = RecordingRunner::default();
        let publisher = ReleasePublisher::new(project.path(), &config, &runner);
        let plan = ReleasePlan {
            docs: DocsPlan::Disabled,
        };

        let err = publisher.publish(&package("1.2.0"), &plan, true).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
