//! Generate command report data structures.

use std::path::PathBuf;

use varhandler_codegen::naming::VARHANDLER_NAMING;
use varhandler_core::WriteResult;

use super::output::{Output, Report};

/// Report data from one generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Functions a handler was generated for.
    pub defined: Vec<String>,
    /// Functions that got no handler.
    pub skipped: Vec<SkippedFunction>,
    /// Namespace imports emitted.
    pub imports: Vec<String>,
    /// Namespaces no import was found for.
    pub unresolved: Vec<String>,
    /// Warnings not tied to one function.
    pub warnings: Vec<String>,
    /// Generation result (file written or preview).
    pub result: GenerationResult,
}

/// A requested function and why it was skipped.
#[derive(Debug)]
pub struct SkippedFunction {
    pub name: String,
    pub reason: String,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// The file was written (or already up to date).
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when the output went to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Output path.
    pub path: PathBuf,
    /// Whether the file changed.
    pub outcome: WriteResult,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Path the file would be written to.
    pub path: PathBuf,
    /// File content.
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        out.section(&format!("Handlers ({})", self.defined.len()));
        for name in &self.defined {
            out.added_item(&VARHANDLER_NAMING.handler_name(name));
        }

        if !self.skipped.is_empty() {
            out.newline();
            out.section("Skipped");
            for skipped in &self.skipped {
                out.removed_item(&format!("{}: {}", skipped.name, skipped.reason));
            }
        }

        self.render_imports(out);

        out.newline();
        let label = match written.outcome {
            WriteResult::Written => "Generated",
            WriteResult::Unchanged => "Unchanged",
        };
        out.key_value(label, &written.path.display().to_string());
    }

    fn render_imports(&self, out: &mut dyn Output) {
        if !self.imports.is_empty() {
            out.newline();
            out.section("Imports");
            for import in &self.imports {
                out.list_item(import);
            }
        }

        if !self.unresolved.is_empty() {
            out.newline();
            out.section("Unresolved namespaces");
            for alias in &self.unresolved {
                out.list_item(alias);
            }
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        out.divider(&preview.path.display().to_string());
        out.preformatted(&preview.content);

        out.divider("Summary");
        out.preformatted(&format!(
            "{} handlers would be generated, {} skipped",
            self.defined.len(),
            self.skipped.len()
        ));
        for skipped in &self.skipped {
            out.removed_item(&format!("{}: {}", skipped.name, skipped.reason));
        }
    }
}
