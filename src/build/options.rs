//! Request to SwiftPM flags and environment.

use std::ffi::OsString;

use crate::config::{InvocationRequest, Sanitizer};
use crate::platform::Platform;
use crate::process::EnvOverlay;
use crate::toolchain::Toolchain;

/// Read by the test suite to find the toolchain at runtime.
pub const TOOLCHAIN_BIN_PATH_VAR: &str = "INDEXSTOREDB_TOOLCHAIN_BIN_PATH";
pub const NINJA_BIN_VAR: &str = "NINJA_BIN";
pub const ASAN_OPTIONS_VAR: &str = "ASAN_OPTIONS";
pub const UBSAN_OPTIONS_VAR: &str = "UBSAN_OPTIONS";
/// Lets tests skip cases known to trip TSan.
pub const THREAD_SANITIZER_VAR: &str = "INDEXSTOREDB_ENABLED_THREAD_SANITIZER";

/// Flags and environment for a single SwiftPM run, without the verb.
///
/// Paths are kept as `OsString` so they reach SwiftPM byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub args: Vec<OsString>,
    pub env: EnvOverlay,
}

/// Pure: touches neither the filesystem nor the process environment.
pub fn translate(
    request: &InvocationRequest,
    toolchain: &Toolchain,
    platform: Platform,
) -> ToolInvocation {
    let mut args: Vec<OsString> = vec![
        "--package-path".into(),
        request.package_path.clone().into_os_string(),
        "--build-path".into(),
        request.build_path.clone().into_os_string(),
        "--configuration".into(),
        request.configuration.clone().into(),
    ];

    if request.verbose {
        args.push("--verbose".into());
    }

    for sanitizer in request.sanitizer_list() {
        args.push(format!("--sanitize={}", sanitizer.name()).into());
    }

    if !platform.is_apple_like() {
        for path in toolchain.search_paths() {
            args.extend([
                "-Xcxx".into(),
                "-I".into(),
                "-Xcxx".into(),
                path.into_os_string(),
            ]);
        }
    }

    ToolInvocation {
        args,
        env: environment(request, toolchain),
    }
}

fn environment(request: &InvocationRequest, toolchain: &Toolchain) -> EnvOverlay {
    let mut env = EnvOverlay::new();
    env.insert(
        TOOLCHAIN_BIN_PATH_VAR.to_string(),
        toolchain.root().as_os_str().to_owned(),
    );

    if let Some(ninja) = &request.ninja_bin {
        env.insert(NINJA_BIN_VAR.to_string(), ninja.as_os_str().to_owned());
    }

    // Foundation leaks trip LeakSanitizer (SR-12551).
    if request.has_sanitizer(Sanitizer::Address) {
        env.insert(ASAN_OPTIONS_VAR.to_string(), "detect_leaks=false".into());
    }
    if request.has_sanitizer(Sanitizer::Undefined) {
        let suppressions = request
            .package_path
            .join("Utilities")
            .join("ubsan_supressions.supp");
        let mut options = OsString::from("halt_on_error=true,suppressions=");
        options.push(suppressions);
        env.insert(UBSAN_OPTIONS_VAR.to_string(), options);
    }
    if request.has_sanitizer(Sanitizer::Thread) {
        env.insert(THREAD_SANITIZER_VAR.to_string(), "1".into());
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Action;
    use std::path::Path;

    fn request() -> InvocationRequest {
        InvocationRequest::new(Action::Build, "/src/isdb", "/src/isdb/.build", "/tc/usr")
    }

    fn toolchain() -> Toolchain {
        Toolchain::new("/tc/usr")
    }

    fn strs(args: &[OsString]) -> Vec<&str> {
        args.iter().map(|a| a.to_str().unwrap()).collect()
    }

    fn sanitize_flags(inv: &ToolInvocation) -> Vec<&str> {
        strs(&inv.args)
            .into_iter()
            .filter(|a| a.starts_with("--sanitize"))
            .collect()
    }

    fn env<'a>(inv: &'a ToolInvocation, name: &str) -> &'a str {
        inv.env.get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn test_base_flags_on_darwin() {
        let inv = translate(&request(), &toolchain(), Platform::Darwin);
        assert_eq!(
            strs(&inv.args),
            [
                "--package-path",
                "/src/isdb",
                "--build-path",
                "/src/isdb/.build",
                "--configuration",
                "debug",
            ]
        );
        assert!(!inv.args.iter().any(|a| a == "-Xcxx"));
    }

    #[test]
    fn test_search_paths_appended_off_darwin() {
        for platform in [Platform::Linux, Platform::Windows, Platform::Other] {
            for sanitizers in [vec![], vec![Sanitizer::Address], vec![Sanitizer::Undefined]] {
                let req = request().verbose(true).sanitizers(sanitizers);
                let inv = translate(&req, &toolchain(), platform);
                let [dispatch, block] = toolchain().search_paths();
                let tail = &inv.args[inv.args.len() - 8..];
                assert_eq!(
                    tail,
                    [
                        OsString::from("-Xcxx"),
                        "-I".into(),
                        "-Xcxx".into(),
                        dispatch.into_os_string(),
                        "-Xcxx".into(),
                        "-I".into(),
                        "-Xcxx".into(),
                        block.into_os_string(),
                    ]
                );
            }
        }
    }

    #[test]
    fn test_verbose_and_sanitizers_in_caller_order() {
        let req = request()
            .verbose(true)
            .sanitizers([Sanitizer::Undefined, Sanitizer::Address]);
        let inv = translate(&req, &toolchain(), Platform::Darwin);
        assert_eq!(
            strs(&inv.args[6..]),
            ["--verbose", "--sanitize=undefined", "--sanitize=address"]
        );
    }

    #[test]
    fn test_address_environment() {
        let req = request().sanitizers([Sanitizer::Address]);
        let inv = translate(&req, &toolchain(), Platform::Linux);
        assert_eq!(sanitize_flags(&inv), ["--sanitize=address"]);
        assert_eq!(env(&inv, ASAN_OPTIONS_VAR), "detect_leaks=false");
        assert!(!inv.env.contains_key(UBSAN_OPTIONS_VAR));
        assert!(!inv.env.contains_key(THREAD_SANITIZER_VAR));
    }

    #[test]
    fn test_undefined_environment() {
        let req = request().sanitizers([Sanitizer::Undefined]);
        let inv = translate(&req, &toolchain(), Platform::Linux);
        assert_eq!(sanitize_flags(&inv), ["--sanitize=undefined"]);
        let ubsan = env(&inv, UBSAN_OPTIONS_VAR);
        assert!(ubsan.starts_with("halt_on_error=true,suppressions="));
        let supp = Path::new("/src/isdb")
            .join("Utilities")
            .join("ubsan_supressions.supp");
        assert!(ubsan.ends_with(supp.to_str().unwrap()));
        assert!(!inv.env.contains_key(ASAN_OPTIONS_VAR));
        assert!(!inv.env.contains_key(THREAD_SANITIZER_VAR));
    }

    #[test]
    fn test_thread_environment() {
        let req = request().sanitizers([Sanitizer::Thread]);
        let inv = translate(&req, &toolchain(), Platform::Linux);
        assert_eq!(sanitize_flags(&inv), ["--sanitize=thread"]);
        assert_eq!(env(&inv, THREAD_SANITIZER_VAR), "1");
        assert!(!inv.env.contains_key(ASAN_OPTIONS_VAR));
        assert!(!inv.env.contains_key(UBSAN_OPTIONS_VAR));
    }

    #[test]
    fn test_toolchain_and_ninja_variables() {
        let inv = translate(&request(), &toolchain(), Platform::Darwin);
        assert_eq!(env(&inv, TOOLCHAIN_BIN_PATH_VAR), "/tc/usr");
        assert!(!inv.env.contains_key(NINJA_BIN_VAR));
        assert_eq!(inv.env.len(), 1);

        let req = request().ninja_bin(Some("/usr/bin/ninja".into()));
        let inv = translate(&req, &toolchain(), Platform::Darwin);
        assert_eq!(env(&inv, NINJA_BIN_VAR), "/usr/bin/ninja");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_pass_through_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        use std::path::PathBuf;

        let package = PathBuf::from(OsStr::from_bytes(b"/src/pkg\xfe"));
        let build = PathBuf::from(OsStr::from_bytes(b"/tmp/b\xffx"));
        let root = PathBuf::from(OsStr::from_bytes(b"/tc\xff/usr"));
        let req = InvocationRequest::new(Action::Build, &package, &build, &root)
            .sanitizers([Sanitizer::Undefined]);
        let tc = Toolchain::new(&root);
        let inv = translate(&req, &tc, Platform::Linux);

        assert_eq!(inv.args[1], package.as_os_str());
        assert_eq!(inv.args[3], build.as_os_str());
        let [dispatch, block] = tc.search_paths();
        let tail = &inv.args[inv.args.len() - 5..];
        assert_eq!(tail[0], dispatch.as_os_str());
        assert_eq!(tail[4], block.as_os_str());
        assert_eq!(inv.env[TOOLCHAIN_BIN_PATH_VAR], root.as_os_str());

        let ubsan = inv.env[UBSAN_OPTIONS_VAR].as_bytes();
        let supp = package.join("Utilities").join("ubsan_supressions.supp");
        assert!(ubsan.ends_with(supp.as_os_str().as_bytes()));
    }
}
