//! Custmap Store - Customer directory and submission adapters
//!
//! This crate provides in-memory implementations of the customer ports
//! defined in `custmap-core`.

pub mod memory;

pub use memory::{LoggingSubmissionSink, MemoryCustomerDirectory};
