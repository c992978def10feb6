//! Generation driver: from a package and a list of names to one handler file.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use varhandler_core::{File, WriteResult};

use crate::{
    analyze::Analyzer,
    config::GenerateConfig,
    descriptor::FunctionDescriptor,
    diagnostic::{Diagnostic, Phase},
    error::{AnalysisError, Error, Result},
    format::format_source,
    imports::{ImportCollector, NamespaceImport, Required, normalize},
    locate::locate,
    naming::{NamingConvention, VARHANDLER_NAMING},
    package::{Package, SourceFile},
    synth::{FILE_ATTRIBUTES, FIXED_IMPORT, HandlerTemplate, UTILITY_ROUTINES, banner},
};

/// The outcome of one generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Where the file belongs.
    pub path: PathBuf,
    /// Complete file contents, banner included.
    pub source: String,
    /// Functions a handler was generated for, in output order.
    pub defined: Vec<String>,
    /// Namespace imports emitted.
    pub imports: Vec<NamespaceImport>,
    /// Namespace aliases no import could be found for.
    pub unresolved: Vec<String>,
    /// Whether the source went through the formatter.
    pub formatted: bool,
    /// Everything skipped or degraded along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl Generated {
    /// Diagnostics for functions that got no handler.
    pub fn skipped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_warning() && matches!(d.phase, Phase::Locate | Phase::Analyze))
    }

    /// Write the file, leaving it untouched when the contents are the same.
    pub fn write(&self) -> Result<WriteResult> {
        File::new(&self.path, self.source.as_str())
            .write()
            .map_err(|e| {
                Box::new(Error::Write {
                    path: self.path.clone(),
                    source: e.into(),
                })
            })
    }
}

/// Drives one generation run.
#[derive(Debug, Clone)]
pub struct Generator {
    naming: NamingConvention,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            naming: VARHANDLER_NAMING,
        }
    }

    /// Use a different naming convention.
    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Load the configured package and render its handler file.
    ///
    /// Only package-level problems fail the run. Functions that cannot be
    /// found or analyzed are skipped and reported in [`Generated::diagnostics`].
    pub fn run(&self, config: &GenerateConfig) -> Result<Generated> {
        let package = Package::load(&config.sources)?;
        debug!(
            dir = %package.dir().display(),
            files = package.files().len(),
            "loaded package"
        );
        Ok(self.render(
            &package,
            &config.functions,
            &config.invocation,
            config.output_path(),
        ))
    }

    /// Render the handler file for `functions` found in `package`.
    pub fn render(
        &self,
        package: &Package,
        functions: &[String],
        invocation: &str,
        path: impl AsRef<Path>,
    ) -> Generated {
        let analyzer = Analyzer::new(self.naming);
        let template = HandlerTemplate::new(self.naming);
        let mut collector = ImportCollector::new();
        let mut diagnostics = Vec::new();
        let mut defined = Vec::new();
        let mut handlers = Vec::new();

        for name in functions {
            let (file, mut fd) = match describe(package, &analyzer, name) {
                Ok(found) => found,
                Err(err) => {
                    warn!("{}", err);
                    let phase = match &err {
                        AnalysisError::NotFound { .. } | AnalysisError::NoParameters { .. } => {
                            Phase::Locate
                        }
                        _ => Phase::Analyze,
                    };
                    diagnostics.push(Diagnostic::warning(phase, err.to_string()).at(name.as_str()));
                    continue;
                }
            };

            info!("Defining: {}", fd.name);
            for param in &mut fd.parameters {
                let Some(namespace) = param.namespace.clone() else {
                    continue;
                };
                if let Some(relative) = relative_namespace(&namespace, file.module()) {
                    param.namespace = Some(relative);
                    continue;
                }
                let Some(alias) = import_alias(&namespace) else {
                    continue;
                };
                match collector.require(alias, file.imports()) {
                    Required::Imported => {}
                    Required::Unresolved => {
                        debug!(alias, function = %fd.name, "no import found for namespace");
                    }
                    Required::Clash { path } => {
                        let spelled = format!("{}{}", path, &namespace[alias.len()..]);
                        debug!(alias, path = %spelled, function = %fd.name, "alias already imported");
                        diagnostics.push(
                            Diagnostic::info(
                                Phase::Imports,
                                format!(
                                    "namespace '{}' is imported elsewhere, calling '{}' by full path",
                                    alias, spelled
                                ),
                            )
                            .at(fd.name.as_str()),
                        );
                        param.namespace = Some(spelled);
                    }
                }
            }
            handlers.push(template.render(&fd));
            defined.push(fd.name);
        }

        for alias in collector.unresolved() {
            diagnostics.push(Diagnostic::info(
                Phase::Imports,
                format!("no import found for namespace '{}'", alias),
            ));
        }

        let body = assemble(package, &collector, &handlers);
        let (formatted, body) = match format_source(&body) {
            Ok(formatted) => (true, formatted),
            Err(err) => {
                warn!("could not format generated code: {}", err);
                diagnostics.push(Diagnostic::warning(
                    Phase::Format,
                    format!("output left unformatted: {}", err),
                ));
                (false, body)
            }
        };

        Generated {
            path: path.as_ref().to_path_buf(),
            source: format!("{}\n\n{}", banner(invocation), body),
            defined,
            imports: collector.iter().cloned().collect(),
            unresolved: collector.unresolved().map(str::to_string).collect(),
            formatted,
            diagnostics,
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the configured package and render its handler file.
pub fn generate(config: &GenerateConfig) -> Result<Generated> {
    Generator::new().run(config)
}

fn describe<'a>(
    package: &'a Package,
    analyzer: &Analyzer,
    name: &str,
) -> std::result::Result<(&'a SourceFile, FunctionDescriptor), AnalysisError> {
    let located = locate(package, name)?;
    debug!(function = name, file = %located.file.path().display(), "found declaration");
    Ok((located.file, analyzer.analyze(&located.item.sig)?))
}

/// `self::`/`super::` namespaces rewritten to resolve from the generated module.
fn relative_namespace(namespace: &str, module: Option<&str>) -> Option<String> {
    let segments: Vec<String> = namespace.split("::").map(str::to_string).collect();
    match segments.first().map(String::as_str) {
        Some("self" | "super") => Some(normalize(&segments, module).join("::")),
        _ => None,
    }
}

/// Alias a namespace must be imported under, if any.
///
/// `crate::` and `::` paths already resolve from anywhere.
fn import_alias(namespace: &str) -> Option<&str> {
    if namespace.starts_with("::") {
        return None;
    }
    match namespace.split("::").next()? {
        "crate" | "self" | "super" => None,
        alias => Some(alias),
    }
}

/// Unformatted file body, without the banner.
fn assemble(package: &Package, collector: &ImportCollector, handlers: &[String]) -> String {
    let mut body = String::new();
    body.push_str(FILE_ATTRIBUTES);
    body.push_str("\n\n");
    body.push_str("use super::*;\n");
    for module in package.modules() {
        body.push_str(&format!("use super::{}::*;\n", module));
    }
    body.push_str(FIXED_IMPORT);
    body.push('\n');
    for import in collector.iter() {
        body.push_str(&import.render());
        body.push('\n');
    }
    for handler in handlers {
        body.push('\n');
        body.push_str(handler);
    }
    body.push_str(UTILITY_ROUTINES);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(files: &[(&str, &str)]) -> Package {
        Package::from_sources(
            "pkg",
            files
                .iter()
                .map(|(name, text)| (PathBuf::from(name), text.to_string())),
        )
        .unwrap()
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_import_alias() {
        assert_eq!(import_alias("models"), Some("models"));
        assert_eq!(import_alias("models::user"), Some("models"));
        assert_eq!(import_alias("crate::models"), None);
        assert_eq!(import_alias("::models"), None);
        assert_eq!(import_alias("self::models"), None);
        assert_eq!(import_alias("super"), None);
    }

    #[test]
    fn test_relative_namespace() {
        assert_eq!(relative_namespace("models", None), None);
        assert_eq!(relative_namespace("crate::models", Some("users")), None);
        assert_eq!(
            relative_namespace("self::models", None).as_deref(),
            Some("super::models")
        );
        assert_eq!(
            relative_namespace("self::inner", Some("users")).as_deref(),
            Some("super::users::inner")
        );
        assert_eq!(
            relative_namespace("super::shared", None).as_deref(),
            Some("super::super::shared")
        );
        assert_eq!(relative_namespace("super::shared", Some("users")).as_deref(), Some("super::shared"));
    }

    #[test]
    fn test_render_layout() {
        let pkg = package(&[
            ("pkg/mod.rs", "mod users;\nuse crate::models;\n"),
            (
                "pkg/users.rs",
                "pub fn GetUser(id: models::UserId) -> Result<String, E> { todo!() }\n",
            ),
        ]);

        let out = Generator::new().render(&pkg, &names(&["GetUser"]), "-f GetUser", "pkg/out.rs");

        assert!(out.formatted);
        assert!(
            out.source
                .starts_with("// Code generated by \"varhandler -f GetUser\"; DO NOT EDIT.\n")
        );
        assert_eq!(out.defined, vec!["GetUser"]);
        assert_eq!(out.path, PathBuf::from("pkg/out.rs"));

        let glob_root = out.source.find("use super::*;").unwrap();
        let glob_users = out.source.find("use super::users::*;").unwrap();
        let http = out.source.find("use http::").unwrap();
        let models = out.source.find("use crate::models;").unwrap();
        let handler = out.source.find("pub fn GetUserHandler").unwrap();
        let utilities = out.source.find("pub trait HttpError").unwrap();
        assert!(glob_root < glob_users);
        assert!(glob_users < http && http < models);
        assert!(models < handler && handler < utilities);
    }

    #[test]
    fn test_failures_are_skipped() {
        let pkg = package(&[(
            "pkg/lib.rs",
            "pub fn Good(x: X) -> Result<(), E> { Ok(()) }\n\
             pub fn TooMany(x: X) -> Result<(u16, u16, u16), E> { todo!() }\n",
        )]);

        let out = Generator::new().render(
            &pkg,
            &names(&["Missing", "TooMany", "Good"]),
            "",
            "out.rs",
        );

        assert_eq!(out.defined, vec!["Good"]);
        let skipped: Vec<_> = out.skipped().collect();
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].phase, Phase::Locate);
        assert_eq!(skipped[0].location.as_deref(), Some("Missing"));
        assert_eq!(skipped[1].phase, Phase::Analyze);
        assert!(!out.source.contains("TooManyHandler"));
    }

    #[test]
    fn test_unresolved_namespace_emits_no_import() {
        let pkg = package(&[(
            "pkg/lib.rs",
            "pub fn F(x: somewhere::X) -> Result<(), E> { Ok(()) }\n",
        )]);

        let out = Generator::new().render(&pkg, &names(&["F"]), "", "out.rs");

        assert_eq!(out.defined, vec!["F"]);
        assert!(out.imports.is_empty());
        assert_eq!(out.unresolved, vec!["somewhere"]);
        assert!(out.source.contains("somewhere::HTTPX(r)"));
        assert!(out.skipped().next().is_none());
        assert!(
            out.diagnostics
                .iter()
                .any(|d| d.phase == Phase::Imports && !d.severity.is_warning())
        );
    }

    #[test]
    fn test_shared_namespace_imported_once() {
        let pkg = package(&[(
            "pkg/lib.rs",
            "use crate::models;\n\
             pub fn A(x: models::X) -> Result<(), E> { Ok(()) }\n\
             pub fn B(y: models::Y, x: models::X) -> Result<(), E> { Ok(()) }\n",
        )]);

        let out = Generator::new().render(&pkg, &names(&["A", "B"]), "", "out.rs");

        assert_eq!(out.imports.len(), 1);
        assert_eq!(out.source.matches("use crate::models;").count(), 1);
    }

    #[test]
    fn test_no_functions_still_emits_utilities() {
        let pkg = package(&[("pkg/lib.rs", "pub fn F(x: X) -> Result<(), E> { Ok(()) }\n")]);

        let out = Generator::new().render(&pkg, &[], "", "out.rs");

        assert!(out.defined.is_empty());
        assert!(out.source.contains("pub fn HandleHttpErrorWithDefaultStatus"));
        assert!(out.source.contains("pub fn HandleHttpResponse"));
    }

    #[test]
    fn test_same_alias_in_sibling_files_resolves_per_file() {
        let pkg = package(&[
            (
                "pkg/one.rs",
                "use crate::one::model;\n\
                 pub fn A(x: model::X) -> Result<(), E> { Ok(()) }\n",
            ),
            (
                "pkg/two.rs",
                "use crate::two::model;\n\
                 pub fn B(x: model::X) -> Result<(), E> { Ok(()) }\n",
            ),
        ]);

        let out = Generator::new().render(&pkg, &names(&["A", "B"]), "", "out.rs");

        assert_eq!(out.defined, vec!["A", "B"]);
        assert_eq!(out.imports.len(), 1);
        assert!(out.source.contains("use crate::one::model;"));
        assert!(!out.source.contains("use crate::two::model;"));
        assert!(out.source.contains("let param0 = match model::HTTPX(r)"));
        assert!(out.source.contains("let param0 = match crate::two::model::HTTPX(r)"));
        assert!(
            out.diagnostics
                .iter()
                .any(|d| d.phase == Phase::Imports && d.location.as_deref() == Some("B"))
        );
        syn::parse_file(&out.source).unwrap();
    }

    #[test]
    fn test_relative_namespaces_are_rewritten() {
        let pkg = package(&[
            (
                "pkg/mod.rs",
                "mod users;\n\
                 pub fn Root(x: self::models::X, y: super::shared::Y) -> Result<(), E> { Ok(()) }\n",
            ),
            (
                "pkg/users.rs",
                "pub fn Child(z: self::inner::Z, m: super::models::M) -> Result<(), E> { Ok(()) }\n",
            ),
        ]);

        let out = Generator::new().render(&pkg, &names(&["Root", "Child"]), "", "out.rs");

        assert!(out.source.contains("match super::models::HTTPX(r)"));
        assert!(out.source.contains("match super::super::shared::HTTPY(r)"));
        assert!(out.source.contains("match super::users::inner::HTTPZ(r)"));
        assert!(out.source.contains("match super::models::HTTPM(r)"));
        assert!(!out.source.contains("self::"));
        assert!(out.imports.is_empty());
        assert!(out.unresolved.is_empty());
    }

    #[test]
    fn test_unformattable_output_is_kept_raw() {
        let pkg = package(&[("pkg/lib.rs", "pub fn F(x: X) -> Result<(), E> { Ok(()) }\n")]);
        // `F-Handler` is not an identifier, so the output cannot be parsed back.
        let naming = NamingConvention {
            handler_suffix: "-Handler",
            ..VARHANDLER_NAMING
        };

        let out = Generator::new()
            .naming(naming)
            .render(&pkg, &names(&["F"]), "-f F", "out.rs");

        assert!(!out.formatted);
        assert_eq!(out.defined, vec!["F"]);
        assert!(out.source.contains(
            "pub fn F-Handler(w: &mut Response<Vec<u8>>, r: &Request<Vec<u8>>) {\n    let param0 = match HTTPX(r) {\n"
        ));
        assert!(out.source.contains(FILE_ATTRIBUTES));
        assert!(out.source.contains(UTILITY_ROUTINES));
        assert!(
            out.diagnostics
                .iter()
                .any(|d| d.phase == Phase::Format && d.severity.is_warning())
        );
        assert!(out.skipped().next().is_none());
    }
}
