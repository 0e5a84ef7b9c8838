//! # reloj-core
//!
//! Configuration and error handling shared by the Reloj catalog tooling.

pub mod config;
pub mod error;
