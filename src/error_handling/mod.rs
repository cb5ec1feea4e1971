//! Error handling.
//!
//! Typed errors are raised by the stages (`PipelineError`) and by startup
//! (`InitializationError`). The orchestration layer adds context with `anyhow`.
//!
//! Failures fall into three classes:
//! - **Fatal**: any `PipelineError` aborts the run
//! - **Skip**: unknown feed types, excluded names and empty rows are ignored, no error
//! - **Overwrite**: archive objects, staged files and the merged file replace existing ones

mod types;

// Re-export public API
pub use types::{ErrorStage, InitializationError, PipelineError};
