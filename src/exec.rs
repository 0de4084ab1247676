//! Process execution for external commands.
//!
//! Runs a program with arguments in a chosen working directory and captures
//! its exit status, stdout and stderr. Nothing here streams output or looks at
//! process IDs; callers get a [`CommandOutput`] once the process has exited.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with a zero status
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout with surrounding newlines removed.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim_matches(|c| c == '\n' || c == '\r')
    }

    /// Converts a failed run into `Error::GitCommand`, keeping the output of a
    /// successful one.
    pub fn into_result(self, command: &str, dir: &Path) -> Result<CommandOutput> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::GitCommand {
                command: command.to_string(),
                dir: dir.to_path_buf(),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Render a program and its arguments for log lines and error messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Run `program` with `args`, in `dir` when given, and wait for it to exit.
///
/// Only a failure to start the process is an error here; a non-zero exit is
/// reported through [`CommandOutput::success`].
pub fn run(dir: Option<&Path>, program: &str, args: &[&str]) -> Result<CommandOutput> {
    let rendered = display_command(program, args);
    let cwd: PathBuf = dir.map(Path::to_path_buf).unwrap_or_default();
    debug!("running `{}` in {}", rendered, cwd.display());

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|e| Error::Spawn {
        command: rendered.clone(),
        message: e.to_string(),
    })?;

    let result = CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.success {
        debug!("`{}` failed: {}", rendered, result.stderr.trim());
    }
    Ok(result)
}
