//! Core domain types
//!
//! This module contains the core domain structures used across Nova.
//! The orchestrator persists them; the HTTP layer serializes them.

pub mod job;
pub mod log;
