use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for process-level failures (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Failures that abort a whole generation run.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("cannot process directory '{path}'")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{dir}: no buildable Rust files")]
    #[diagnostic(help("pass a module directory or a list of .rs files"))]
    NoSources { dir: PathBuf },

    #[error("parsing package: {message}")]
    #[diagnostic(code(varhandler::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("checking imports: alias '{alias}' resolves to both '{first}' and '{second}'")]
    #[diagnostic(
        code(varhandler::conflicting_import),
        help("a file can bind an alias once; rename one of them with `as`")
    )]
    ConflictingImport {
        alias: String,
        first: String,
        second: String,
    },

    #[error("writing output '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Create a parse error from a syn error, locating its span in `src`.
    pub fn parse(source: syn::Error, src: &str, filename: &str) -> Box<Self> {
        let start = source.span().start();
        let span = offset_of(src, start.line, start.column).map(SourceSpan::from);
        Box::new(Error::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            message: source.to_string(),
        })
    }
}

/// Byte offset of a 1-based line and 0-based character column.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let rest = src.get(line_start..)?;
    let within = rest
        .char_indices()
        .nth(column)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    Some(line_start + within)
}

/// Reasons a single requested function gets no handler.
///
/// None of these stop the run; the driver records them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("func not found: {name}")]
    NotFound { name: String },

    #[error("{name} should take at least one parameter, found 0 instead")]
    NoParameters { name: String },

    #[error("{name} should at least return an error")]
    MissingErrorResult { name: String },

    #[error("too many results for {name}: found {count}, at most 3 are supported")]
    TooManyResults { name: String, count: usize },

    #[error("{name} is async; generated handlers call their target synchronously")]
    AsyncFunction { name: String },

    #[error("{name}: reference parameter must point to a plain type, found `{ty}`")]
    UnsupportedReference { name: String, ty: String },

    #[error("{name}: could not guess var full name, type not expected: `{ty}`")]
    UnexpectedParameterType { name: String, ty: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        let src = "fn a() {}\nfn b( {}\n";
        assert_eq!(offset_of(src, 1, 0), Some(0));
        assert_eq!(offset_of(src, 2, 0), Some(10));
        assert_eq!(offset_of(src, 2, 5), Some(15));
        assert_eq!(offset_of(src, 0, 0), None);
    }

    #[test]
    fn test_parse_error_has_span() {
        let src = "fn broken( {}\n";
        let err = syn::parse_file(src).unwrap_err();
        let err = Error::parse(err, src, "broken.rs");
        match *err {
            Error::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_analysis_error_message() {
        let err = AnalysisError::TooManyResults {
            name: "Example".into(),
            count: 4,
        };
        assert_eq!(
            err.to_string(),
            "too many results for Example: found 4, at most 3 are supported"
        );
    }
}
