//! Error taxonomy for a mining run.
//!
//! Every failure maps onto one class with its own process exit code, so
//! a calling orchestrator can tell a bad repository path from a full disk
//! without parsing messages.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MineError {
    #[error("cannot read repository {path}: {message}")]
    RepositoryAccess { path: PathBuf, message: String },

    #[error("cannot resolve ref {reference:?} in {path}: {message}")]
    RefNotFound {
        path: PathBuf,
        reference: String,
        message: String,
    },

    #[error("corrupt history at {commit}: {message}")]
    HistoryIntegrity { commit: String, message: String },

    #[error("computation error: {0}")]
    Computation(String),

    #[error("cannot write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl MineError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            MineError::Config(_) => 2,
            MineError::RepositoryAccess { .. } => 3,
            MineError::RefNotFound { .. } => 4,
            MineError::HistoryIntegrity { .. } => 5,
            MineError::Computation(_) => 6,
            MineError::OutputWrite { .. } => 7,
        }
    }

    /// Unreadable store or unresolvable ref: fix the input and retry.
    pub fn is_repository_access(&self) -> bool {
        matches!(
            self,
            MineError::RepositoryAccess { .. } | MineError::RefNotFound { .. }
        )
    }

    pub(crate) fn integrity(commit: impl ToString, err: git2::Error) -> Self {
        MineError::HistoryIntegrity {
            commit: commit.to_string(),
            message: err.message().to_string(),
        }
    }
}

pub type MineResult<T> = Result<T, MineError>;
