//! Core utilities for the varhandler code generator.
//!
//! This crate provides the file-system plumbing shared by the generator
//! and the command line front-end.

mod file;
mod paths;

// File operations
pub use file::{File, WriteResult};
// Source discovery
pub use paths::{is_directory, is_file, module_name, rust_sources_in};
