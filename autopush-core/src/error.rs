use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Not a usable repository directory: {}", .0.display())]
    InvalidRepository(PathBuf),

    #[error("Could not run git: {0}")]
    GitUnavailable(String),

    #[error("Staging failed: {0}")]
    StageFailed(String),

    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("Commit failed: {0}")]
    CommitFailed(String),

    #[error("Push failed: {0}")]
    PushFailed(String),
}

impl Error {
    /// Process exit code for this failure. Each runner step gets its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::StageFailed(_) => 2,
            Error::CommitFailed(_) | Error::NothingToCommit => 3,
            Error::PushFailed(_) => 4,
            _ => 1,
        }
    }
}
