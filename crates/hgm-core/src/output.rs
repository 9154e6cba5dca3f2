// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Marker listing output

use hgm_domain_types::Marker;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::Error;

/// Render markers as a JSON array: sorted keys, two-space indentation,
/// trailing newline.
pub fn render_markers(markers: &[Marker]) -> crate::Result<String> {
    let mut rendered = serde_json::to_string_pretty(markers)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Where a marker listing goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerOutput {
    Stdout,
    /// A new file; an existing file is never overwritten
    File(PathBuf),
}

impl MarkerOutput {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => MarkerOutput::File(path),
            None => MarkerOutput::Stdout,
        }
    }

    /// Fail early when the destination file already exists, before any
    /// enumeration work is done.
    pub fn ensure_writable(&self) -> crate::Result<()> {
        match self {
            MarkerOutput::File(path) if path_taken(path) => Err(Error::OutputExists(path.clone())),
            _ => Ok(()),
        }
    }

    pub fn write(&self, markers: &[Marker]) -> crate::Result<()> {
        let rendered = render_markers(markers)?;
        match self {
            MarkerOutput::Stdout => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(rendered.as_bytes())?;
                handle.flush()?;
            }
            MarkerOutput::File(path) => {
                let mut file = OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(path)
                    .map_err(|e| match e.kind() {
                        io::ErrorKind::AlreadyExists => Error::OutputExists(path.clone()),
                        _ => Error::Io(e),
                    })?;
                file.write_all(rendered.as_bytes())?;
                file.flush()?;
            }
        }
        Ok(())
    }
}

fn path_taken(path: &Path) -> bool {
    // symlink_metadata also catches dangling symlinks, which create_new refuses.
    path.symlink_metadata().is_ok()
}
