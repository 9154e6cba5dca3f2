// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Invocation of the `hg` command-line client

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::{VcsError, VcsResult};

/// How to run `hg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HgCommand {
    binary: PathBuf,
    plain: bool,
}

impl Default for HgCommand {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("hg"),
            plain: true,
        }
    }
}

impl HgCommand {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }

    /// Whether to set `HGPLAIN=1` (disables user aliases, localization and
    /// other output customization).
    pub fn with_plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Check whether the configured binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    pub(crate) fn std_command(&self, cwd: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(cwd).stdin(Stdio::null());
        if self.plain {
            cmd.env("HGPLAIN", "1");
        }
        cmd
    }

    pub(crate) fn tokio_command(&self, cwd: &Path) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.binary);
        cmd.current_dir(cwd).stdin(Stdio::null()).kill_on_drop(true);
        if self.plain {
            cmd.env("HGPLAIN", "1");
        }
        cmd
    }

    /// Run `hg` and return its raw output, whatever the exit status.
    pub fn output<I, S>(&self, cwd: &Path, args: I) -> VcsResult<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.std_command(cwd).args(args).output()?;
        Ok(output)
    }

    /// Run `hg` and return stdout, failing on a non-zero exit status.
    pub fn run<I, S>(&self, cwd: &Path, args: I) -> VcsResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let output = self.output(cwd, &args)?;
        if !output.status.success() {
            return Err(command_failed(&args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub(crate) fn command_failed<S: AsRef<OsStr>>(args: &[S], output: &Output) -> VcsError {
    VcsError::CommandFailed {
        command: describe(args),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Render an argument list as `hg arg1 arg2` for error messages.
pub(crate) fn describe<S: AsRef<OsStr>>(args: &[S]) -> String {
    let mut rendered = String::from("hg");
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.as_ref().to_string_lossy());
    }
    rendered
}
