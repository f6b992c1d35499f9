//! Process-wide logging setup shared by the binaries.

/// Initialize logging from `LOG_FORMAT` and `RUST_LOG`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

pub mod tracing;

pub use tracing::{LogFormat, UnknownLogFormat};
