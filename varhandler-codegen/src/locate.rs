//! Finding target function declarations in a package.

use syn::{Item, ItemFn};

use crate::{
    error::AnalysisError,
    package::{Package, SourceFile},
};

/// A top-level function declaration and the file it was found in.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub file: &'a SourceFile,
    pub item: &'a ItemFn,
}

/// Find the first top-level `fn` named `name`, scanning files in load order.
///
/// A declaration without parameters counts as an error, not as "not found":
/// a handler needs at least one extracted value.
pub fn locate<'a>(package: &'a Package, name: &str) -> Result<Located<'a>, AnalysisError> {
    for file in package.files() {
        for item in &file.ast().items {
            let Item::Fn(item) = item else { continue };
            if item.sig.ident != name {
                continue;
            }
            if item.sig.inputs.is_empty() {
                return Err(AnalysisError::NoParameters {
                    name: name.to_string(),
                });
            }
            return Ok(Located { file, item });
        }
    }

    Err(AnalysisError::NotFound {
        name: name.to_string(),
    })
}
