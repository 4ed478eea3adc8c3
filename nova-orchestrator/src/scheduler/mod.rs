//! Scheduler layer
//!
//! Background processing that runs independently of request handling.

pub mod poller;

pub use poller::{Poller, PollerError};
