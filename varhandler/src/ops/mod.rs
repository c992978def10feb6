//! Core operations.
//!
//! This module contains the business logic for varhandler commands,
//! separated from CLI argument parsing and output rendering.

pub mod generate;

pub use generate::generate;
