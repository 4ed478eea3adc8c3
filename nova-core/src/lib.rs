//! Nova Core
//!
//! Core types and abstractions for the Nova job queue.
//!
//! This crate contains:
//! - Domain types: Jobs, their status machine and audit log entries
//! - DTOs: Request and response shapes exchanged over HTTP

pub mod domain;
pub mod dto;
