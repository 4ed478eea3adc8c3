//! Service Module
//!
//! Business logic layer for the orchestrator.
//! The job service drives the repository and owns the execution policy;
//! the executor is injected so real task execution can replace the
//! simulated one without touching lifecycle code.

pub mod execution;
pub mod job;

// Re-export for convenience
pub use execution::{ExecutionError, JobExecutor, SimulatedExecutor};
pub use job::{JobService, RetryOutcome};
