//! Integration test utilities for the CRM pipeline
//!
//! Provides in-memory repository fakes (substituting for Postgres) and
//! fixtures so the end-to-end service scenarios run without a database.

pub mod fixtures;
pub mod memory;

pub use fixtures::*;
pub use memory::*;
