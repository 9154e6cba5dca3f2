// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use hgm_domain_types::InvalidNodeId;
use thiserror::Error;

/// Result alias for repository access operations.
pub type VcsResult<T> = std::result::Result<T, VcsError>;

/// Errors raised while reading repository state.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("No Mercurial repository found at or above {0}")]
    RepositoryNotFound(String),

    #[error("Cannot resolve location {location:?}: {reason}")]
    ResolutionFailed { location: String, reason: String },

    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Remote rejected {operation}: {reason}")]
    ProtocolFailed { operation: String, reason: String },

    /// The repository reported something it cannot back up, such as a head
    /// without a changeset.
    #[error("Inconsistent repository state: {0}")]
    InconsistentState(String),

    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    #[error(transparent)]
    InvalidNodeId(#[from] InvalidNodeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse hg output: {0}")]
    Json(#[from] serde_json::Error),
}

impl VcsError {
    pub fn resolution(location: impl Into<String>, reason: impl Into<String>) -> Self {
        VcsError::ResolutionFailed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn connection(url: impl Into<String>, reason: impl Into<String>) -> Self {
        VcsError::ConnectionFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn protocol(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        VcsError::ProtocolFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
