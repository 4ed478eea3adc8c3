//! Nova Orchestrator
//!
//! A durable single-node job queue. Jobs are stored in SQLite, claimed one at
//! a time by a background poller (or a manual tick), and every transition is
//! recorded in an append-only per-job log.
//!
//! Architecture:
//! - Repository: the job store, owner of all state transitions
//! - Service: the job engine and the pluggable executor
//! - Scheduler: the background poller
//! - API: the HTTP surface

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod scheduler;
pub mod service;
