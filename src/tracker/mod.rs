pub mod controller;
pub mod deadline;
pub mod filter;
pub mod models;
pub mod render;
pub mod repository;

#[cfg(test)]
pub mod fake;

// Re-export commonly used types
pub use controller::SyncController;
pub use filter::StatusFilter;
pub use models::{Job, JobId, JobStatus};
