//! The helper's error type and its mapping to process exit codes.

use std::io;
use std::path::PathBuf;

pub type Result<T, E = HelperError> = std::result::Result<T, E>;

/// Error type for every stage of a helper run
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    /// `--sanitize` and `--sanitize-all` were both requested
    #[error("cannot combine --sanitize with --sanitize-all")]
    ConflictingSanitizers,

    /// Removing a build directory failed for a reason other than it being absent
    #[error("failed to clean {}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SwiftPM could not be launched at all
    #[error("failed to launch `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// SwiftPM ran and reported failure
    #[error("command failed ({}): {command}", describe_code(.code))]
    ToolFailed { command: String, code: Option<i32> },

    /// `--show-bin-path` answered with nothing usable
    #[error("`{command}` did not print a binary path")]
    EmptyBinPath { command: String },
}

impl HelperError {
    /// Process exit code the helper should terminate with.
    ///
    /// Mirrors SwiftPM's own exit code when it failed, `2` for bad flag
    /// combinations (as clap does for usage errors), `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            HelperError::ConflictingSanitizers => 2,
            HelperError::ToolFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
