//! Custmap Core - Domain models, ports, and configuration
//!
//! This crate contains the customer and address domain types, the error
//! taxonomy, and the port traits for every external collaborator (geocoding,
//! positioning, camera, map surface, submission).

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{CustmapError, Result};
