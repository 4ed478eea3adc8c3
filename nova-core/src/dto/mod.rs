//! Data Transfer Objects
//!
//! Request and response shapes for the HTTP surface. Domain types are
//! serialized directly where their shape already matches the wire format.

pub mod job;
pub mod log;
pub mod system;
