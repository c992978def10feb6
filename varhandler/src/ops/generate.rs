//! Generate operation - handler file from a package.

use varhandler_codegen::{GenerateConfig, Result, Severity};

use crate::reports::{GenerateReport, GenerationResult, PreviewResult, SkippedFunction, WrittenResult};

/// Execute the generate operation.
///
/// Renders the handler file for the configured functions and writes it,
/// or keeps it for preview when the configuration asks for a dry run.
pub fn generate(config: &GenerateConfig) -> Result<GenerateReport> {
    let generated = varhandler_codegen::generate(config)?;

    let skipped = generated
        .skipped()
        .map(|d| SkippedFunction {
            name: d.location.clone().unwrap_or_default(),
            reason: d.message.clone(),
        })
        .collect();

    // Skipped functions are reported on their own.
    let warnings = generated
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .filter(|d| d.location.is_none())
        .map(|d| d.message.clone())
        .collect();

    let result = if config.dry_run {
        GenerationResult::Preview(PreviewResult {
            path: generated.path.clone(),
            content: generated.source.clone(),
        })
    } else {
        GenerationResult::Written(WrittenResult {
            path: generated.path.clone(),
            outcome: generated.write()?,
        })
    };

    Ok(GenerateReport {
        defined: generated.defined.clone(),
        skipped,
        imports: generated.imports.iter().map(|i| i.render()).collect(),
        unresolved: generated.unresolved.clone(),
        warnings,
        result,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use varhandler_codegen::{DEFAULT_OUTPUT, SourceSet};
    use varhandler_core::WriteResult;

    use super::*;

    const PACKAGE: &str = "\
use crate::models;

pub fn Ping(x: X) -> Result<String, E> {
    todo!()
}

pub fn Lookup(id: models::Id) -> Result<(), E> {
    todo!()
}

pub fn Broken(x: X) -> String {
    todo!()
}
";

    fn config(dir: &std::path::Path) -> GenerateConfig {
        GenerateConfig::new(["Ping", "Broken", "Lookup"], SourceSet::Directory(dir.to_path_buf()))
    }

    #[test]
    fn test_generate_writes_output() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("mod.rs"), PACKAGE).unwrap();

        let report = generate(&config(temp.path())).unwrap();

        assert_eq!(report.defined, vec!["Ping", "Lookup"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "Broken");
        assert_eq!(report.imports, vec!["use crate::models;"]);
        assert!(report.warnings.is_empty());
        match report.result {
            GenerationResult::Written(written) => {
                assert_eq!(written.path, temp.path().join(DEFAULT_OUTPUT));
                assert_eq!(written.outcome, WriteResult::Written);
            }
            GenerationResult::Preview(_) => panic!("expected a written result"),
        }
        assert!(temp.path().join(DEFAULT_OUTPUT).exists());

        let again = generate(&config(temp.path())).unwrap();
        assert!(matches!(
            again.result,
            GenerationResult::Written(WrittenResult {
                outcome: WriteResult::Unchanged,
                ..
            })
        ));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("mod.rs"), PACKAGE).unwrap();

        let report = generate(&config(temp.path()).dry_run(true)).unwrap();

        match report.result {
            GenerationResult::Preview(preview) => {
                assert!(preview.content.contains("pub fn PingHandler"));
            }
            GenerationResult::Written(_) => panic!("expected a preview"),
        }
        assert!(!temp.path().join(DEFAULT_OUTPUT).exists());
    }
}
