use thiserror::Error;

/// Errors from reading the repository. All fatal for the invocation —
/// nothing below the orchestrator retries these.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not a git repository: {0}")]
    NotARepository(String),

    #[error("commit not found in history: {0}")]
    CommitNotFound(String),

    #[error("repository has no commits")]
    EmptyHistory,

    #[error("git command failed: {0}")]
    Git(String),

    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),
}
