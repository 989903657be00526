//! Output sink trait
//!
//! This module defines the interface the preload engine writes its
//! human-readable status lines through.

/// Destination for console status lines
///
/// Implementations must be safe to share between workers: every worker in
/// the pool emits through the same sink concurrently.
pub trait StatusSink: Send + Sync {
    /// Emits a single status line (without trailing newline)
    fn emit(&self, line: &str);
}
