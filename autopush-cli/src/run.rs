use crate::display;
use anyhow::{Context, Result};
use autopush_core::{Error, FileConfig, RunReport, Runner, RunnerConfig, Step};
use std::path::PathBuf;
use tracing::debug;

/// Command-line overrides. Anything left unset falls back to the config
/// file, then to built-in defaults.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub repo: Option<PathBuf>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub prefix: Option<String>,
    pub config: Option<PathBuf>,
    pub pause: bool,
    pub require_changes: bool,
}

/// Result of one invocation plus whether to hold the terminal open.
pub struct Invocation {
    pub pause: bool,
    pub result: Result<RunReport>,
}

pub fn build_config(options: &RunOptions) -> Result<RunnerConfig> {
    let repo = match &options.repo {
        Some(path) => path.clone(),
        None => RunnerConfig::default_repository_path()
            .context("Could not locate the directory of this executable")?,
    };
    let repo = std::fs::canonicalize(&repo).map_err(|_| Error::InvalidRepository(repo))?;

    let file = match &options.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?,
        None => FileConfig::discover(&repo)?,
    };

    let mut config = RunnerConfig::new(repo);
    config.apply(file);

    if let Some(remote) = &options.remote {
        config = config.with_remote(remote.clone());
    }
    if let Some(branch) = &options.branch {
        config = config.with_branch(branch.clone());
    }
    if let Some(prefix) = &options.prefix {
        config = config.with_prefix(prefix.clone());
    }
    if options.pause {
        config.pause_on_exit = true;
    }
    if options.require_changes {
        config.require_changes = true;
    }

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

pub fn run(options: RunOptions) -> Invocation {
    let config = match build_config(&options) {
        Ok(config) => config,
        // No config was resolved, so only the --pause flag can ask to wait.
        Err(e) => {
            return Invocation {
                pause: options.pause,
                result: Err(e),
            }
        }
    };

    let pause = config.pause_on_exit;
    display::header(&config);

    let runner = Runner::new(config);
    Invocation {
        pause,
        result: execute(&runner),
    }
}

fn execute(runner: &Runner) -> Result<RunReport> {
    let progress = display::spinner(Step::Stage);

    let result = runner.run(|report| {
        progress.suspend(|| display::step(report));
        if let Some(next) = report.step.next() {
            progress.set_message(display::step_label(next));
        }
    });

    progress.finish_and_clear();

    let report = result?;
    display::summary(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("autopush.toml"),
            "remote = \"backup\"\nmessage_prefix = \"From file \"\npause_on_exit = true\n",
        )
        .unwrap();

        let options = RunOptions {
            repo: Some(dir.path().to_path_buf()),
            remote: Some("origin".to_string()),
            ..Default::default()
        };
        let config = build_config(&options).unwrap();

        assert_eq!(config.remote_name.as_deref(), Some("origin"));
        assert_eq!(config.message_prefix, "From file ");
        assert!(config.pause_on_exit);
        assert_eq!(config.repository_path, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "require_changes = true\n").unwrap();

        let options = RunOptions {
            repo: Some(dir.path().to_path_buf()),
            config: Some(config_path),
            ..Default::default()
        };
        let config = build_config(&options).unwrap();

        assert!(config.require_changes);
    }

    #[test]
    fn test_pause_flag_sets_pause_on_exit() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions {
            repo: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(!build_config(&options).unwrap().pause_on_exit);

        let options = RunOptions {
            pause: true,
            ..options
        };
        assert!(build_config(&options).unwrap().pause_on_exit);
    }

    #[test]
    fn test_failed_config_still_honours_pause_flag() {
        let invocation = run(RunOptions {
            repo: Some(PathBuf::from("/definitely/not/a/repo")),
            pause: true,
            ..Default::default()
        });

        assert!(invocation.pause);
        assert!(invocation.result.is_err());

        let invocation = run(RunOptions {
            repo: Some(PathBuf::from("/definitely/not/a/repo")),
            ..Default::default()
        });
        assert!(!invocation.pause);
    }

    #[test]
    fn test_missing_repository_maps_to_core_error() {
        let options = RunOptions {
            repo: Some(PathBuf::from("/definitely/not/a/repo")),
            ..Default::default()
        };
        let err = build_config(&options).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidRepository(_))
        ));
    }
}
