use colored::*;
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

use super::clean::remove_dir_if_exists;
use super::matrix;
use super::options::translate;
use crate::config::{Action, InvocationRequest};
use crate::error::Result;
use crate::platform::Platform;
use crate::process::{BuildTool, DryRun, ToolCommand};
use crate::toolchain::Toolchain;

/// Test products live here; stale ones survive SwiftPM's incremental builds.
const TEST_PRODUCTS_DIR: &str = "isdb-tests";

/// Everything needed to drive SwiftPM for one helper run
pub struct Session<T> {
    pub tool: T,
    pub toolchain: Toolchain,
    pub platform: Platform,
}

impl Session<DryRun> {
    /// Echo every command and cleanup step without touching anything.
    pub fn dry_run(toolchain: Toolchain, platform: Platform) -> Self {
        Session::new(DryRun, toolchain, platform)
    }
}

impl<T: BuildTool> Session<T> {
    pub fn new(tool: T, toolchain: Toolchain, platform: Platform) -> Self {
        Self {
            tool,
            toolchain,
            platform,
        }
    }

    /// Run the base request and, with `--sanitize-all`, the sanitizer matrix.
    ///
    /// Stops at the first failing pass.
    pub fn run_all(&mut self, request: &InvocationRequest) -> Result<()> {
        request.validate()?;

        let passes = matrix::plan(request, self.platform);
        debug!(count = passes.len(), "planned passes");

        for pass in &passes {
            if let Some(banner) = &pass.banner {
                println!("{}", banner.cyan().bold());
            }
            self.run_one(&pass.request)?;
        }
        Ok(())
    }

    /// One clean build or test pass.
    pub fn run_one(&mut self, request: &InvocationRequest) -> Result<()> {
        let invocation = translate(request, &self.toolchain, self.platform);
        let program = self.toolchain.build_tool();

        self.clean(&request.build_path)?;

        let mut args = vec![OsString::from(request.action.verb())];
        args.extend(invocation.args.iter().cloned());

        if request.action == Action::Test {
            let mut query_args: Vec<OsString> = vec!["build".into(), "--show-bin-path".into()];
            query_args.extend(invocation.args.iter().cloned());
            let query = ToolCommand::new(&program, query_args, invocation.env.clone());

            println!("{query}");
            let bin_path = self.tool.query(&query)?;
            self.clean(&bin_path.join(TEST_PRODUCTS_DIR))?;

            args.push("--parallel".into());
        }

        let command = ToolCommand::new(program, args, invocation.env);
        println!("{command}");
        self.tool.run(&command)
    }

    fn clean(&self, path: &Path) -> Result<()> {
        if self.tool.is_dry_run() {
            println!("{} {}", "Would clean".yellow(), path.display());
            return Ok(());
        }
        remove_dir_if_exists(path)
    }
}
