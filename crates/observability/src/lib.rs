//! Tracing and logging (shared setup).

/// Initialize process-wide observability.
///
/// Safe to call multiple times: only the first call installs a subscriber and
/// returns `true`.
pub fn init(settings: &tracing::LogSettings) -> bool {
    tracing::init(settings)
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};
