//! # isdb-build-helper - SwiftPM driver for the Swift build-script
//!
//! Builds or tests indexstore-db with SwiftPM on behalf of the Swift
//! build-script, normalizing toolchain flags across platforms and running the
//! same action under every sanitizer when asked.
//!
//! ## Features
//!
//! - **Forced clean builds**: the build directory is reset before every SwiftPM call
//! - **Sanitizers**: `--sanitize address|thread|undefined` with matching runtime options
//! - **Sanitizer matrix**: `--sanitize-all` repeats the action once per sanitizer
//! - **Cross-platform**: Dispatch and Block header paths outside Darwin
//!
//! ## Quick Start
//!
//! ```bash
//! build-script-helper test --toolchain /path/to/usr --sanitize-all
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Invocation requests, actions and sanitizers
//! - [`build`] - Option translation, cleanup, single runs and the sanitizer matrix
//! - [`process`] - The SwiftPM process boundary
//! - [`platform`] - Host platform capability queries
//! - [`toolchain`] - Toolchain layout

/// SwiftPM invocation pipeline.
pub mod build;

/// Invocation requests (`build`/`test`, paths, sanitizers).
pub mod config;

/// Error type shared by the whole pipeline.
pub mod error;

/// Host platform queries.
pub mod platform;

/// Spawning SwiftPM.
pub mod process;

/// Toolchain directory layout.
pub mod toolchain;

pub use error::{HelperError, Result};
