use crate::error::{Error, Result};
use crate::message::{DEFAULT_PREFIX, DEFAULT_TIMESTAMP_FORMAT};
use chrono::format::{Fixed, Item, Numeric, StrftimeItems};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "autopush.toml";

/// Everything the runner needs to know. Nothing is read from ambient state
/// once this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub repository_path: PathBuf,
    pub remote_name: Option<String>,
    pub branch_name: Option<String>,
    pub message_prefix: String,
    pub timestamp_format: String,
    pub pause_on_exit: bool,
    pub require_changes: bool,
    pub git_program: PathBuf,
}

impl RunnerConfig {
    pub fn new(repository_path: PathBuf) -> Self {
        Self {
            repository_path,
            remote_name: None,
            branch_name: None,
            message_prefix: DEFAULT_PREFIX.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            pause_on_exit: false,
            require_changes: false,
            git_program: PathBuf::from("git"),
        }
    }

    /// Directory holding the running executable, or the current directory
    /// when that cannot be determined.
    pub fn default_repository_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        match exe.parent() {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Ok(std::env::current_dir()?),
        }
    }

    pub fn with_remote(mut self, remote: String) -> Self {
        self.remote_name = Some(remote);
        self
    }

    pub fn with_branch(mut self, branch: String) -> Self {
        self.branch_name = Some(branch);
        self
    }

    pub fn with_prefix(mut self, prefix: String) -> Self {
        self.message_prefix = prefix;
        self
    }

    /// Overlay values from a config file. Fields the file leaves out keep
    /// their current value.
    pub fn apply(&mut self, file: FileConfig) {
        if let Some(remote) = file.remote {
            self.remote_name = Some(remote);
        }
        if let Some(branch) = file.branch {
            self.branch_name = Some(branch);
        }
        if let Some(prefix) = file.message_prefix {
            self.message_prefix = prefix;
        }
        if let Some(format) = file.timestamp_format {
            self.timestamp_format = format;
        }
        if let Some(pause) = file.pause_on_exit {
            self.pause_on_exit = pause;
        }
        if let Some(require) = file.require_changes {
            self.require_changes = require;
        }
        if let Some(program) = file.git_program {
            self.git_program = program;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.repository_path.is_dir() {
            return Err(Error::InvalidRepository(self.repository_path.clone()));
        }

        if self.branch_name.is_some() && self.remote_name.is_none() {
            return Err(Error::Config(
                "a branch was given without a remote to push it to".to_string(),
            ));
        }

        if self.timestamp_format.trim().is_empty() {
            return Err(Error::Config("timestamp format is empty".to_string()));
        }

        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "invalid timestamp format \"{}\"",
                self.timestamp_format
            )));
        }

        if !shows_seconds(&self.timestamp_format) {
            warn!(
                "Timestamp format \"{}\" has no seconds; runs within the same period get identical messages",
                self.timestamp_format
            );
        }

        Ok(())
    }

    /// Human-readable push destination, e.g. `origin/main` or `upstream`.
    pub fn push_target(&self) -> String {
        match (&self.remote_name, &self.branch_name) {
            (Some(remote), Some(branch)) => format!("{}/{}", remote, branch),
            (Some(remote), None) => format!("{} (current branch)", remote),
            _ => "upstream".to_string(),
        }
    }
}

/// Whether `format` renders a value that changes at least once per second.
/// Composite specifiers such as `%T` or `%c` are expanded by chrono.
fn shows_seconds(format: &str) -> bool {
    StrftimeItems::new(format).any(|item| {
        matches!(
            item,
            Item::Numeric(Numeric::Second | Numeric::Timestamp, _)
                | Item::Fixed(Fixed::RFC2822 | Fixed::RFC3339)
        )
    })
}

/// Contents of `autopush.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub message_prefix: Option<String>,
    pub timestamp_format: Option<String>,
    pub pause_on_exit: Option<bool>,
    pub require_changes: Option<bool>,
    pub git_program: Option<PathBuf>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load `autopush.toml` from the repository root if there is one.
    pub fn discover<P: AsRef<Path>>(repository_path: P) -> Result<Self> {
        let path = repository_path.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            debug!("Loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::new(PathBuf::from("/repo"));

        assert_eq!(config.message_prefix, DEFAULT_PREFIX);
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(config.remote_name.is_none());
        assert!(config.branch_name.is_none());
        assert!(!config.pause_on_exit);
        assert_eq!(config.push_target(), "upstream");
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file = FileConfig::parse(
            r#"
            remote = "backup"
            branch = "main"
            message_prefix = "Snapshot "
            pause_on_exit = true
            "#,
        )
        .unwrap();

        let mut config = RunnerConfig::new(PathBuf::from("/repo"));
        config.apply(file);

        assert_eq!(config.remote_name.as_deref(), Some("backup"));
        assert_eq!(config.branch_name.as_deref(), Some("main"));
        assert_eq!(config.message_prefix, "Snapshot ");
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(config.pause_on_exit);
        assert_eq!(config.push_target(), "backup/main");
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let err = FileConfig::parse("remtoe = \"origin\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_discover_without_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = FileConfig::discover(dir.path()).unwrap();
        assert_eq!(file, FileConfig::default());
    }

    #[test]
    fn test_discover_reads_repo_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "remote = \"origin\"\n").unwrap();

        let file = FileConfig::discover(dir.path()).unwrap();
        assert_eq!(file.remote.as_deref(), Some("origin"));
    }

    #[test]
    fn test_validate_missing_directory() {
        let config = RunnerConfig::new(PathBuf::from("/definitely/not/here"));
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidRepository(_))
        ));
    }

    #[test]
    fn test_validate_branch_requires_remote() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::new(dir.path().to_path_buf()).with_branch("main".to_string());

        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = config.with_remote("origin".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unparseable_timestamp_format() {
        let dir = tempfile::tempdir().unwrap();
        let file = FileConfig::parse("timestamp_format = \"%Q\"").unwrap();
        let mut config = RunnerConfig::new(dir.path().to_path_buf());
        config.apply(file);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("%Q")));
        assert_eq!(err.exit_code(), 1);

        config.timestamp_format = "%Y-%m-%d %H:%M:%".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_accepts_default_and_composite_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunnerConfig::new(dir.path().to_path_buf());
        assert!(config.validate().is_ok());

        config.timestamp_format = "%d/%m/%Y %T".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_seconds_detection() {
        assert!(shows_seconds(DEFAULT_TIMESTAMP_FORMAT));
        assert!(shows_seconds("%T"));
        assert!(shows_seconds("%s"));
        assert!(shows_seconds("%+"));
        assert!(!shows_seconds("%Y-%m-%d"));
        assert!(!shows_seconds("%H:%M"));
    }

    #[test]
    fn test_pause_on_exit_from_file() {
        let file = FileConfig::parse("pause_on_exit = true").unwrap();
        let mut config = RunnerConfig::new(PathBuf::from("/repo"));
        assert!(!config.pause_on_exit);

        config.apply(file);
        assert!(config.pause_on_exit);
    }

    #[test]
    fn test_default_repository_path_is_a_directory() {
        let path = RunnerConfig::default_repository_path().unwrap();
        assert!(path.is_dir());
    }
}
