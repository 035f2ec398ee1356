//! The `--sanitize-all` matrix.
//!
//! A run is a short ordered list of passes: the caller's request first, then
//! one derived request per sanitizer. The executor consumes the list and
//! knows nothing about sanitizers.

use crate::config::{InvocationRequest, Sanitizer};
use crate::platform::Platform;

/// Product name shown in matrix banners
const PRODUCT: &str = "indexstore-db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    pub request: InvocationRequest,
    /// Printed before the pass; the base pass has none.
    pub banner: Option<String>,
}

/// Expand a request into the passes to run, in order.
pub fn plan(request: &InvocationRequest, platform: Platform) -> Vec<Pass> {
    let mut passes = vec![Pass {
        request: request.clone(),
        banner: None,
    }];

    if !request.sanitize_all {
        return passes;
    }

    for sanitizer in Sanitizer::MATRIX {
        // UBSan is unreliable on Linux (SR-12550).
        if sanitizer == Sanitizer::Undefined && platform.is_linux() {
            continue;
        }

        let build_path = request
            .build_path
            .join(format!("test-{}", sanitizer.short_name()));
        passes.push(Pass {
            request: request.with_sanitizer(sanitizer, &build_path),
            banner: Some(format!(
                "=== {} {} with {} ===",
                request.action,
                PRODUCT,
                sanitizer.short_name()
            )),
        });
    }

    passes
}
