//! Swift toolchain layout.
//!
//! The helper never searches `PATH`: everything is derived from the
//! `--toolchain` directory the build-script hands over.

use std::path::{Path, PathBuf};

/// Name of the SwiftPM driver inside `<toolchain>/bin`
pub const BUILD_TOOL_NAME: &str = "swift";

/// An installed toolchain, rooted at its `usr`-style prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    root: PathBuf,
}

impl Toolchain {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Executable every invocation goes through
    pub fn build_tool(&self) -> PathBuf {
        self.root.join("bin").join(BUILD_TOOL_NAME)
    }

    /// Header directories for Dispatch and `<Block.h>`, in that order
    pub fn search_paths(&self) -> [PathBuf; 2] {
        let swift_lib = self.root.join("lib").join("swift");
        let block = swift_lib.join("Block");
        [swift_lib, block]
    }
}
