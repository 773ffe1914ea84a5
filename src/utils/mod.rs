//! Utility implementations of the collaborator seams

pub mod line_filter;
pub mod memory_updater;
pub mod sinks;

pub use line_filter::{read_detail_lines, LineFilter, SkipBlankLines};
pub use memory_updater::MemoryUpdater;
pub use sinks::{FileSink, MemorySink};
