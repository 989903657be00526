//! Output module for console status lines and the final summary
//!
//! This module handles:
//! - The sink abstraction every status line flows through
//! - Stdout and in-memory sink implementations
//! - The final success/total tally

mod console;
pub mod summary;
mod traits;

pub use console::{MemorySink, StdoutSink};
pub use summary::{print_summary, PreloadSummary};
pub use traits::StatusSink;
