//! Seams for callers that want to observe long-running operations.

pub mod progress;
