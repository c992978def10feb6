//! Calling-convention descriptors produced by the analyzer.

/// How a target function reports its outcome.
///
/// The error channel is always present and is never stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    /// Name of the target function.
    pub name: String,
    /// The target returns a status code.
    pub returns_status: bool,
    /// The target returns a response value.
    pub returns_response: bool,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
}

impl FunctionDescriptor {
    /// Create a descriptor with no outputs besides the error.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            returns_status: false,
            returns_response: false,
            parameters: Vec::new(),
        }
    }
}

/// How one parameter is obtained from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Name the parameter has in the target's declaration (`_` for patterns).
    pub local_name: String,
    /// Extractor function producing the value.
    pub extractor: String,
    /// Module the type (and therefore the extractor) lives in, if foreign.
    pub namespace: Option<String>,
}

impl ParameterDescriptor {
    /// Path used to call the extractor from the generated module.
    pub fn extractor_path(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}::{}", ns, self.extractor),
            None => self.extractor.clone(),
        }
    }
}
