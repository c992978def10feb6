//! Loading, parsing and checking the package handlers are generated for.

use std::path::{Path, PathBuf};

use tracing::debug;
use varhandler_core::{module_name, rust_sources_in};

use crate::{
    config::SourceSet,
    error::{Error, Result},
    imports::ImportTable,
    synth::BANNER_PREFIX,
};

/// A single parsed source file and the imports it declares.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    module: Option<String>,
    ast: syn::File,
    imports: ImportTable,
}

impl SourceFile {
    /// Path the file was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Module the file defines below the package root (`None` for the root).
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Parsed syntax tree.
    pub fn ast(&self) -> &syn::File {
        &self.ast
    }

    /// Aliases this file's `use` and `extern crate` items bind.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }
}

/// A syntactically valid package.
#[derive(Debug, Clone)]
pub struct Package {
    dir: PathBuf,
    files: Vec<SourceFile>,
}

impl Package {
    /// Read, parse and check the package described by `sources`.
    pub fn load(sources: &SourceSet) -> Result<Self> {
        let dir = sources.dir();
        let names = match sources {
            SourceSet::Directory(dir) => rust_sources_in(dir).map_err(|source| {
                Box::new(Error::Directory {
                    path: dir.clone(),
                    source,
                })
            })?,
            SourceSet::Files(files) => files
                .iter()
                .filter(|f| f.extension().is_some_and(|ext| ext == "rs"))
                .cloned()
                .collect(),
        };

        let mut texts = Vec::with_capacity(names.len());
        for name in names {
            let text = std::fs::read_to_string(&name).map_err(|source| {
                Box::new(Error::Io {
                    path: name.clone(),
                    source,
                })
            })?;
            texts.push((name, text));
        }

        Self::from_sources(dir, texts)
    }

    /// Parse in-memory sources as if they were read from `dir`.
    ///
    /// Files carrying the generated banner are left out. Each file keeps its
    /// own import table, so sibling files may bind one alias differently.
    pub fn from_sources(
        dir: impl Into<PathBuf>,
        sources: impl IntoIterator<Item = (PathBuf, String)>,
    ) -> Result<Self> {
        let dir = dir.into();
        let mut files = Vec::new();
        for (path, text) in sources {
            if text.starts_with(BANNER_PREFIX) {
                debug!(path = %path.display(), "skipping generated file");
                continue;
            }
            let filename = path.display().to_string();
            let ast = syn::parse_file(&text).map_err(|e| Error::parse(e, &text, &filename))?;
            let module = module_name(&path);
            let mut imports = ImportTable::new();
            imports.collect_file(&ast, module.as_deref())?;
            debug!(path = %path.display(), bindings = imports.len(), "parsed source file");
            files.push(SourceFile {
                path,
                module,
                ast,
                imports,
            });
        }

        if files.is_empty() {
            return Err(Box::new(Error::NoSources { dir }));
        }

        Ok(Package { dir, files })
    }

    /// Directory the package lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Parsed files in load order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Names of the child modules the package's files define.
    pub fn modules(&self) -> Vec<&str> {
        let mut modules: Vec<&str> = Vec::new();
        for module in self.files.iter().filter_map(SourceFile::module) {
            if !modules.contains(&module) {
                modules.push(module);
            }
        }
        modules
    }
}
