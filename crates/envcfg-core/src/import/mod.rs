//! Import orchestration and reporting.

pub mod pipeline;
pub mod report;

pub use pipeline::ImportPipeline;
pub use report::{FileReport, LineLevel, MemoryReporter, Reporter, RunReport};
