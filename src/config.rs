//! Invocation requests.
//!
//! An [`InvocationRequest`] is the fully resolved parameter set for one
//! SwiftPM run. `main` builds one from the command line; the sanitizer matrix
//! derives one more per sanitizer with [`InvocationRequest::with_sanitizer`].

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{HelperError, Result};

/// What SwiftPM is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Build,
    Test,
}

impl Action {
    /// SwiftPM subcommand
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Build => "build",
            Action::Test => "test",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Runtime instrumentation modes understood by `swift build --sanitize`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Sanitizer {
    Address,
    Thread,
    Undefined,
}

impl Sanitizer {
    /// Order of the `--sanitize-all` matrix
    pub const MATRIX: [Sanitizer; 3] = [Sanitizer::Address, Sanitizer::Thread, Sanitizer::Undefined];

    /// Value passed as `--sanitize=<name>`
    pub fn name(&self) -> &'static str {
        match self {
            Sanitizer::Address => "address",
            Sanitizer::Thread => "thread",
            Sanitizer::Undefined => "undefined",
        }
    }

    /// Abbreviation used for matrix build directories and banners
    pub fn short_name(&self) -> &'static str {
        match self {
            Sanitizer::Address => "asan",
            Sanitizer::Thread => "tsan",
            Sanitizer::Undefined => "ubsan",
        }
    }
}

impl fmt::Display for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub action: Action,
    pub package_path: PathBuf,
    pub build_path: PathBuf,
    pub toolchain_path: PathBuf,
    /// Passed through to SwiftPM untouched (`debug`, `release`, ...)
    pub configuration: String,
    sanitizers: Vec<Sanitizer>,
    pub sanitize_all: bool,
    pub ninja_bin: Option<PathBuf>,
    pub verbose: bool,
}

impl InvocationRequest {
    /// Request with SwiftPM's defaults: debug configuration, no sanitizers.
    pub fn new(
        action: Action,
        package_path: impl Into<PathBuf>,
        build_path: impl Into<PathBuf>,
        toolchain_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            action,
            package_path: package_path.into(),
            build_path: build_path.into(),
            toolchain_path: toolchain_path.into(),
            configuration: "debug".to_string(),
            sanitizers: Vec::new(),
            sanitize_all: false,
            ninja_bin: None,
            verbose: false,
        }
    }

    pub fn configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = configuration.into();
        self
    }

    /// Replace the sanitizer set. Repeats are dropped, first occurrence wins.
    pub fn sanitizers(mut self, sanitizers: impl IntoIterator<Item = Sanitizer>) -> Self {
        self.sanitizers.clear();
        for sanitizer in sanitizers {
            if !self.sanitizers.contains(&sanitizer) {
                self.sanitizers.push(sanitizer);
            }
        }
        self
    }

    pub fn sanitize_all(mut self, sanitize_all: bool) -> Self {
        self.sanitize_all = sanitize_all;
        self
    }

    pub fn ninja_bin(mut self, ninja_bin: Option<PathBuf>) -> Self {
        self.ninja_bin = ninja_bin;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sanitizers in the order the caller gave them
    pub fn sanitizer_list(&self) -> &[Sanitizer] {
        &self.sanitizers
    }

    pub fn has_sanitizer(&self, sanitizer: Sanitizer) -> bool {
        self.sanitizers.contains(&sanitizer)
    }

    /// Reject flag combinations that must never reach SwiftPM.
    pub fn validate(&self) -> Result<()> {
        if self.sanitize_all && !self.sanitizers.is_empty() {
            return Err(HelperError::ConflictingSanitizers);
        }
        Ok(())
    }

    /// Matrix pass: same request, one sanitizer, its own build directory.
    pub fn with_sanitizer(&self, sanitizer: Sanitizer, build_path: &Path) -> Self {
        Self {
            build_path: build_path.to_path_buf(),
            sanitizers: vec![sanitizer],
            sanitize_all: false,
            ..self.clone()
        }
    }
}
