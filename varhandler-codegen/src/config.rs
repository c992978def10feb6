//! Run configuration, assembled once by the front-end.

use std::path::{Path, PathBuf};

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT: &str = "generated_varhandlers.rs";

/// Where the package's sources come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSet {
    /// Every `.rs` file directly inside a directory.
    Directory(PathBuf),
    /// An explicit list of files belonging to one module directory.
    Files(Vec<PathBuf>),
}

impl SourceSet {
    /// Directory the package lives in.
    pub fn dir(&self) -> PathBuf {
        match self {
            SourceSet::Directory(dir) => dir.clone(),
            SourceSet::Files(files) => files
                .first()
                .and_then(|f| f.parent())
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Everything one generation run needs.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Target functions, in the order handlers are emitted.
    pub functions: Vec<String>,
    /// Package sources.
    pub sources: SourceSet,
    /// Output path; defaults to [`DEFAULT_OUTPUT`] inside the source directory.
    pub output: Option<PathBuf>,
    /// Arguments echoed in the generated banner.
    pub invocation: String,
    /// Print instead of writing.
    pub dry_run: bool,
}

impl GenerateConfig {
    /// Create a configuration for `functions` found in `sources`.
    pub fn new(functions: impl IntoIterator<Item = impl Into<String>>, sources: SourceSet) -> Self {
        Self {
            functions: functions
                .into_iter()
                .map(Into::into)
                .map(|f: String| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            sources,
            output: None,
            invocation: String::new(),
            dry_run: false,
        }
    }

    /// Set the output path.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the banner invocation text.
    pub fn invocation(mut self, invocation: impl Into<String>) -> Self {
        self.invocation = invocation.into();
        self
    }

    /// Enable or disable dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolved output path.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.sources.dir().join(DEFAULT_OUTPUT))
    }
}
