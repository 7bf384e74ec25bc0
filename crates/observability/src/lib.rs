//! Logging setup shared by the storefront binaries.

/// Tracing configuration (filters, formatters).
pub mod tracing;

/// Initialize process-wide logging with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Like [`init`], but with a caller-chosen fallback filter when `RUST_LOG` is unset.
pub fn init_with_default(filter: &str) {
    tracing::init(filter);
}
