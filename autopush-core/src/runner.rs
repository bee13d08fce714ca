use crate::config::RunnerConfig;
use crate::error::{Error, Result};
use crate::git::{GitBackend, SystemGit};
use crate::message::CommitMessage;
use crate::models::{RunReport, Step, StepReport};
use tracing::{info, warn};

/// Stages everything, commits it with a timestamped message and pushes.
///
/// Steps always run in the order stage, commit, push. The first failing step
/// ends the run: it is reported through the callback and returned as the
/// matching [`Error`] variant.
pub struct Runner<G = SystemGit> {
    config: RunnerConfig,
    git: G,
}

impl Runner<SystemGit> {
    pub fn new(config: RunnerConfig) -> Self {
        let git = SystemGit::new(config.git_program.clone());
        Self { config, git }
    }
}

impl<G: GitBackend> Runner<G> {
    pub fn with_backend(config: RunnerConfig, git: G) -> Self {
        Self { config, git }
    }

    /// Run the whole sequence. `on_step` sees every step report as soon as
    /// the step ends, failed ones included.
    pub fn run<F>(&self, mut on_step: F) -> Result<RunReport>
    where
        F: FnMut(&StepReport),
    {
        self.config.validate()?;

        let message =
            CommitMessage::now(&self.config.message_prefix, &self.config.timestamp_format);
        let mut report = RunReport::new(message.to_string());

        info!(
            "Running in {} (push target: {})",
            self.config.repository_path.display(),
            self.config.push_target()
        );

        record(Step::Stage, &mut report, &mut on_step, || self.stage())?;
        record(Step::Commit, &mut report, &mut on_step, || self.commit(&message))?;
        record(Step::Push, &mut report, &mut on_step, || self.push())?;

        Ok(report)
    }

    pub fn stage(&self) -> Result<StepReport> {
        let output = self.git.run(&self.config.repository_path, &["add", "--all"])?;
        if !output.success() {
            return Err(Error::StageFailed(output.combined()));
        }

        info!("Staged all changes");
        Ok(StepReport::succeeded(Step::Stage, "All changes staged"))
    }

    pub fn commit(&self, message: &CommitMessage) -> Result<StepReport> {
        let dir = &self.config.repository_path;

        if !self.git.has_staged_changes(dir)? {
            if self.config.require_changes {
                return Err(Error::NothingToCommit);
            }
            info!("Nothing to commit");
            return Ok(StepReport::skipped(Step::Commit, "Nothing to commit"));
        }

        let output = self.git.run(dir, &["commit", "--quiet", "-m", message.as_str()])?;
        if !output.success() {
            return Err(Error::CommitFailed(output.combined()));
        }

        info!("Created commit \"{}\"", message);
        Ok(StepReport::succeeded(
            Step::Commit,
            format!("Commit created: {}", message),
        ))
    }

    pub fn push(&self) -> Result<StepReport> {
        let dir = &self.config.repository_path;

        let mut args = vec!["push"];
        if let Some(remote) = &self.config.remote_name {
            args.push(remote.as_str());
            if let Some(branch) = &self.config.branch_name {
                args.push(branch.as_str());
            }
        }

        let output = self.git.run(dir, &args)?;
        if !output.success() {
            return Err(Error::PushFailed(output.combined()));
        }

        let target = self.describe_push_target();
        info!("Pushed to {}", target);
        Ok(StepReport::succeeded(
            Step::Push,
            format!("Push completed ({})", target),
        ))
    }

    /// Push destination, filling in what git chose when nothing was
    /// configured.
    fn describe_push_target(&self) -> String {
        if self.config.remote_name.is_some() {
            return self.config.push_target();
        }

        let dir = &self.config.repository_path;
        let branch = match self.git.current_branch(dir) {
            Ok(Some(branch)) => branch,
            _ => return self.config.push_target(),
        };

        match self.git.upstream_remote(dir, &branch) {
            Ok(Some(remote)) => format!("{}/{}", remote, branch),
            _ => self.config.push_target(),
        }
    }
}

/// Run one step and hand its report to the caller, failed or not.
fn record<F, A>(step: Step, report: &mut RunReport, on_step: &mut F, action: A) -> Result<()>
where
    F: FnMut(&StepReport),
    A: FnOnce() -> Result<StepReport>,
{
    match action() {
        Ok(step_report) => {
            on_step(&step_report);
            report.record(step_report);
            Ok(())
        }
        Err(e) => {
            warn!("{} step failed: {}", step, e);
            let step_report = StepReport::failed(step, e.to_string());
            on_step(&step_report);
            report.record(step_report);
            Err(e)
        }
    }
}
