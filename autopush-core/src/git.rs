//! Process boundary to the system `git` binary.
//!
//! The runner only talks to git through [`GitBackend`], so tests can swap in
//! a scripted backend. [`SystemGit`] is the real one: it spawns `git` with
//! the repository as its working directory and captures both output streams.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

/// Captured result of one git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best text to show a user when the command failed.
    pub fn combined(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("git exited with status {}", code),
            None => "git was terminated by a signal".to_string(),
        }
    }
}

pub trait GitBackend {
    /// Run `git <args>` inside `dir` and wait for it to finish.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput>;

    /// Name of the checked-out branch, `None` on a detached HEAD.
    fn current_branch(&self, dir: &Path) -> Result<Option<String>> {
        let output = self.run(dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
        if !output.success() {
            return Ok(None);
        }
        let branch = output.stdout.trim();
        if branch.is_empty() || branch == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(branch.to_string()))
        }
    }

    /// Remote that `branch` tracks, if any.
    fn upstream_remote(&self, dir: &Path, branch: &str) -> Result<Option<String>> {
        let key = format!("branch.{}.remote", branch);
        let output = self.run(dir, &["config", "--get", &key])?;
        let remote = output.stdout.trim();
        if output.success() && !remote.is_empty() {
            Ok(Some(remote.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Whether the index differs from HEAD.
    ///
    /// `git diff --cached --quiet` exits 0 when clean and 1 when there are
    /// staged changes; anything else is a real failure.
    fn has_staged_changes(&self, dir: &Path) -> Result<bool> {
        let output = self.run(dir, &["diff", "--cached", "--quiet"])?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::CommitFailed(output.combined())),
        }
    }
}

/// Spawns the `git` executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl SystemGit {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitBackend for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        debug!("git {} (in {})", args.join(" "), dir.display());

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                Error::GitUnavailable(format!("{}: {}", self.program.display(), e))
            })?;

        let result = GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        trace!(
            code = ?result.code,
            stdout = %result.stdout.trim(),
            stderr = %result.stderr.trim(),
            "git finished"
        );

        Ok(result)
    }
}
