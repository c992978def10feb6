//! Deriving a [`FunctionDescriptor`] from a function signature.
//!
//! # Result shapes
//!
//! The error channel is the `Err` side of a `Result` return type. Counting it
//! as one value, the arity of a signature decides what the handler does with
//! the `Ok` side:
//!
//! | results | `Ok` type      | status | response |
//! |---------|----------------|--------|----------|
//! | 1       | `()`           | no     | no       |
//! | 2       | `u16`          | yes    | no       |
//! | 2       | anything else  | no     | yes      |
//! | 3       | `(R, S)`       | yes    | yes      |
//!
//! Zero results (no `Result` return) and more than three are rejected.
//!
//! # Parameter shapes
//!
//! `T`, `&T`, `&mut T`, `*const T` and `*mut T` call `HTTPT`; `ns::T` calls
//! `ns::HTTPT`. Anything else is rejected.

use quote::ToTokens;
use syn::{FnArg, GenericArgument, Pat, PathArguments, ReturnType, Signature, Type, TypePath};

use crate::{
    descriptor::{FunctionDescriptor, ParameterDescriptor},
    error::AnalysisError,
    naming::{NamingConvention, STATUS_TYPE},
};

/// Turns signatures into descriptors.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    naming: NamingConvention,
}

impl Analyzer {
    pub fn new(naming: NamingConvention) -> Self {
        Self { naming }
    }

    /// Describe the calling convention of `sig`.
    pub fn analyze(&self, sig: &Signature) -> Result<FunctionDescriptor, AnalysisError> {
        let mut fd = FunctionDescriptor::new(sig.ident.to_string());
        if sig.asyncness.is_some() {
            return Err(AnalysisError::AsyncFunction { name: fd.name });
        }
        self.parse_results(&mut fd, &sig.output)?;
        self.parse_arguments(&mut fd, sig.inputs.iter())?;
        Ok(fd)
    }

    fn parse_results(
        &self,
        fd: &mut FunctionDescriptor,
        output: &ReturnType,
    ) -> Result<(), AnalysisError> {
        let results = result_values(output);
        match results.len() {
            0 => Err(AnalysisError::MissingErrorResult {
                name: fd.name.clone(),
            }),
            1 => Ok(()),
            2 => {
                if is_status_type(results[0]) {
                    fd.returns_status = true;
                } else {
                    fd.returns_response = true;
                }
                Ok(())
            }
            3 => {
                fd.returns_response = true;
                fd.returns_status = true;
                Ok(())
            }
            count => Err(AnalysisError::TooManyResults {
                name: fd.name.clone(),
                count,
            }),
        }
    }

    fn parse_arguments<'a>(
        &self,
        fd: &mut FunctionDescriptor,
        arguments: impl Iterator<Item = &'a FnArg>,
    ) -> Result<(), AnalysisError> {
        for argument in arguments {
            let FnArg::Typed(arg) = argument else {
                return Err(AnalysisError::UnexpectedParameterType {
                    name: fd.name.clone(),
                    ty: "self".to_string(),
                });
            };
            let local_name = match &*arg.pat {
                Pat::Ident(pat) => pat.ident.to_string(),
                _ => "_".to_string(),
            };

            let (ident, namespace) = match classify(&arg.ty) {
                Shape::Plain(ident) => (ident, None),
                Shape::Qualified { namespace, ident } => (ident, Some(namespace)),
                Shape::Pointer(Some(ident)) => (ident, None),
                Shape::Pointer(None) => {
                    return Err(AnalysisError::UnsupportedReference {
                        name: fd.name.clone(),
                        ty: type_text(&arg.ty),
                    });
                }
                Shape::Other => {
                    return Err(AnalysisError::UnexpectedParameterType {
                        name: fd.name.clone(),
                        ty: type_text(&arg.ty),
                    });
                }
            };
            let param = ParameterDescriptor {
                local_name,
                extractor: self.naming.extractor_name(&ident),
                namespace,
            };
            fd.parameters.push(param);
        }
        Ok(())
    }
}

/// Parameter type shapes the generator knows how to extract.
enum Shape {
    /// `X`
    Plain(String),
    /// `ns::X`
    Qualified { namespace: String, ident: String },
    /// `&X`, `&mut X`, `*const X`, `*mut X`; `None` when the pointee is not plain
    Pointer(Option<String>),
    Other,
}

fn classify(ty: &Type) -> Shape {
    match ty {
        Type::Path(path) => {
            if let Some(ident) = plain_ident(path) {
                Shape::Plain(ident)
            } else if let Some((namespace, ident)) = qualified(path) {
                Shape::Qualified { namespace, ident }
            } else {
                Shape::Other
            }
        }
        Type::Reference(r) => Shape::Pointer(as_plain(&r.elem)),
        Type::Ptr(p) => Shape::Pointer(as_plain(&p.elem)),
        _ => Shape::Other,
    }
}

/// Types of the values a function returns, error last.
///
/// Empty when the return type is not a `Result`.
fn result_values(output: &ReturnType) -> Vec<&Type> {
    let ReturnType::Type(_, ty) = output else {
        return Vec::new();
    };
    let Some((ok, err)) = result_parts(ty) else {
        return Vec::new();
    };

    let mut values: Vec<&Type> = match ok.map(unparen) {
        None => Vec::new(),
        Some(Type::Tuple(tuple)) => tuple.elems.iter().collect(),
        Some(other) => vec![other],
    };
    values.push(err);
    values
}

/// `Ok` type (if spelled out) and the full type standing for the error side.
fn result_parts(ty: &Type) -> Option<(Option<&Type>, &Type)> {
    let Type::Path(path) = unparen(ty) else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let ok = match &last.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    };
    Some((ok, ty))
}

fn unparen(ty: &Type) -> &Type {
    match ty {
        Type::Paren(inner) => unparen(&inner.elem),
        Type::Group(inner) => unparen(&inner.elem),
        other => other,
    }
}

fn is_status_type(ty: &Type) -> bool {
    as_plain(ty).is_some_and(|ident| ident == STATUS_TYPE)
}

fn as_plain(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => plain_ident(path),
        _ => None,
    }
}

/// `X`: one segment, no generic arguments.
fn plain_ident(path: &TypePath) -> Option<String> {
    if path.qself.is_some() || path.path.leading_colon.is_some() {
        return None;
    }
    let segments = &path.path.segments;
    if segments.len() != 1 {
        return None;
    }
    let segment = segments.first()?;
    segment
        .arguments
        .is_none()
        .then(|| segment.ident.to_string())
}

/// `ns::X`: two or more segments, no generic arguments anywhere.
fn qualified(path: &TypePath) -> Option<(String, String)> {
    if path.qself.is_some() {
        return None;
    }
    let segments = &path.path.segments;
    if segments.len() < 2 || segments.iter().any(|s| !s.arguments.is_none()) {
        return None;
    }
    let idents: Vec<String> = segments.iter().map(|s| s.ident.to_string()).collect();
    let (ident, namespace) = idents.split_last()?;
    let mut namespace = namespace.join("::");
    if path.path.leading_colon.is_some() {
        namespace.insert_str(0, "::");
    }
    Some((namespace, ident.clone()))
}

fn type_text(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}
