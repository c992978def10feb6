//! Naming contract between generated handlers and the code they call.
//!
//! The analyzer derives every symbol it references from these rules only;
//! nothing checks that the symbols exist. A mismatch surfaces when the
//! generated file is compiled.

/// Symbol naming rules used by the generator.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Prefix of extractor functions (`HTTP` + `User` -> `HTTPUser`)
    pub extractor_prefix: &'static str,
    /// Suffix appended to the target name to name its handler
    pub handler_suffix: &'static str,
    /// Prefix of the positional bindings holding extracted parameters
    pub binding_prefix: &'static str,
}

impl NamingConvention {
    /// Name of the extractor expected to produce a value of type `type_ident`.
    pub fn extractor_name(&self, type_ident: &str) -> String {
        format!("{}{}", self.extractor_prefix, type_ident)
    }

    /// Name of the handler generated for `function`.
    pub fn handler_name(&self, function: &str) -> String {
        format!("{}{}", function, self.handler_suffix)
    }

    /// Binding holding the parameter at `index`.
    pub fn binding(&self, index: usize) -> String {
        format!("{}{}", self.binding_prefix, index)
    }
}

/// The conventions generated code follows.
pub const VARHANDLER_NAMING: NamingConvention = NamingConvention {
    extractor_prefix: "HTTP",
    handler_suffix: "Handler",
    binding_prefix: "param",
};

/// Primitive type a target returns when it reports a status code.
pub const STATUS_TYPE: &str = "u16";
