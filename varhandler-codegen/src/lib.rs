//! Signature analysis and HTTP handler synthesis for varhandler.
//!
//! Given a package of Rust source files and the names of some of its
//! functions, this crate produces one generated module holding an HTTP
//! handler per function plus the routines those handlers share.
//!
//! # Module Organization
//!
//! - [`package`] - Loading, parsing and checking the source package
//! - [`locate`] - Finding target declarations
//! - [`analyze`] - Turning a signature into a [`FunctionDescriptor`]
//! - [`imports`] - Import table and namespace imports of the generated file
//! - [`synth`] - Handler template and the shared utility routines
//! - [`generator`] - Driving a whole run
//! - [`builder`] - Code generation building blocks (CodeBuilder, Indent)

pub mod analyze;
pub mod builder;
pub mod config;
pub mod descriptor;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod generator;
pub mod imports;
pub mod locate;
pub mod naming;
pub mod package;
pub mod synth;

pub use config::{DEFAULT_OUTPUT, GenerateConfig, SourceSet};
pub use descriptor::{FunctionDescriptor, ParameterDescriptor};
pub use diagnostic::{Diagnostic, Phase, Severity};
pub use error::{AnalysisError, Error, Result};
pub use generator::{Generated, Generator, generate};
pub use package::Package;
