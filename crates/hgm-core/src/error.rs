// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use hgm_repo::VcsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a marker listing.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested output file is already present.
    #[error("File \"{}\" already exists.", .0.display())]
    OutputExists(PathBuf),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot serialize markers: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutputExists,
    ResolutionFailed,
    ConnectionFailed,
    ProtocolFailed,
    InconsistentState,
    /// Local repository could not be opened or read
    Repository,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutputExists(_) => ErrorKind::OutputExists,
            Error::Vcs(err) => match err {
                VcsError::ResolutionFailed { .. } => ErrorKind::ResolutionFailed,
                VcsError::ConnectionFailed { .. } | VcsError::Timeout { .. } => {
                    ErrorKind::ConnectionFailed
                }
                VcsError::ProtocolFailed { .. } => ErrorKind::ProtocolFailed,
                VcsError::InconsistentState(_) => ErrorKind::InconsistentState,
                VcsError::Io(_) => ErrorKind::Io,
                _ => ErrorKind::Repository,
            },
            Error::Io(_) | Error::Json(_) => ErrorKind::Io,
        }
    }
}
