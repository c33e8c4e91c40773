//! Pipeline orchestration module.
//!
//! Contains the [`Pipeline`] that threads one owned table through the
//! cleaning stages, and the progress reporting types it emits.

mod builder;
mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
