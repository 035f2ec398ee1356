//! Host platform capability queries.
//!
//! Flag translation and the sanitizer matrix branch on the platform, so the
//! platform is a plain value handed to them rather than read from a global.
//! Tests construct whichever platform they need.

/// Operating system family the helper is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Darwin,
    Linux,
    Windows,
    Other,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => Platform::Darwin,
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    /// Dispatch and `<Block.h>` are found by default only here.
    pub fn is_apple_like(&self) -> bool {
        matches!(self, Platform::Darwin)
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, Platform::Linux)
    }
}
