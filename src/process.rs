//! The SwiftPM process boundary.
//!
//! Everything that spawns a process goes through [`BuildTool`], so the
//! executor can be driven by a recording fake in tests and by [`DryRun`]
//! when nothing should actually run. Echoing the command line is the
//! caller's job.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{HelperError, Result};

/// Extra variables layered over the inherited environment of one child
pub type EnvOverlay = BTreeMap<String, OsString>;

/// One fully resolved SwiftPM command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: EnvOverlay,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>, env: EnvOverlay) -> Self {
        Self {
            program: program.into(),
            args,
            env,
        }
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        // Only the child sees the overlay.
        cmd.envs(&self.env);
        cmd
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

pub trait BuildTool {
    /// Run to completion with inherited stdio; non-zero exit is an error.
    fn run(&mut self, command: &ToolCommand) -> Result<()>;

    /// Run and return trimmed stdout as a path; non-zero exit is an error.
    fn query(&mut self, command: &ToolCommand) -> Result<PathBuf>;

    /// True when nothing may be spawned or deleted on this tool's behalf.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Real SwiftPM, spawned synchronously
#[derive(Debug, Default)]
pub struct SwiftPm;

impl BuildTool for SwiftPm {
    fn run(&mut self, command: &ToolCommand) -> Result<()> {
        debug!(env = ?command.env, "spawning build tool");

        let status = command
            .to_command()
            .status()
            .map_err(|source| spawn_error(command, source))?;

        if !status.success() {
            return Err(HelperError::ToolFailed {
                command: command.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn query(&mut self, command: &ToolCommand) -> Result<PathBuf> {
        debug!(env = ?command.env, "querying build tool");

        let output = command
            .to_command()
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| spawn_error(command, source))?;

        if !output.status.success() {
            return Err(HelperError::ToolFailed {
                command: command.to_string(),
                code: output.status.code(),
            });
        }

        let answer = output.stdout.trim_ascii();
        if answer.is_empty() {
            return Err(HelperError::EmptyBinPath {
                command: command.to_string(),
            });
        }
        Ok(path_from_bytes(answer))
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Spawns nothing.
///
/// `query` answers with `<build-path>/<configuration>`, where SwiftPM puts
/// products by default.
#[derive(Debug, Default)]
pub struct DryRun;

impl BuildTool for DryRun {
    fn run(&mut self, _command: &ToolCommand) -> Result<()> {
        Ok(())
    }

    fn query(&mut self, command: &ToolCommand) -> Result<PathBuf> {
        let build_path = flag_value(&command.args, "--build-path");
        let configuration = flag_value(&command.args, "--configuration");
        match (build_path, configuration) {
            (Some(build_path), Some(configuration)) => {
                Ok(Path::new(build_path).join(configuration))
            }
            _ => Err(HelperError::EmptyBinPath {
                command: command.to_string(),
            }),
        }
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

fn flag_value<'a>(args: &'a [OsString], flag: &str) -> Option<&'a OsStr> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(OsString::as_os_str)
}

fn spawn_error(command: &ToolCommand, source: std::io::Error) -> HelperError {
    HelperError::Spawn {
        program: command.program.display().to_string(),
        source,
    }
}
