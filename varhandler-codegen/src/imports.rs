//! Import tables of source files and the imports a generated file needs.

use indexmap::{IndexMap, IndexSet};
use syn::{Item, UseTree};

use crate::error::{Error, Result};

/// Alias -> full path for every `use` and `extern crate` in one source file.
///
/// Paths are normalized so they resolve from the generated module, which
/// sits one level below the package root.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    entries: IndexMap<String, String>,
}

impl ImportTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every import of one file.
    ///
    /// `module` is the file's module name below the package root, `None` for
    /// the root file itself.
    pub fn collect_file(&mut self, ast: &syn::File, module: Option<&str>) -> Result<()> {
        for item in &ast.items {
            match item {
                Item::Use(u) => {
                    let mut prefix = Vec::new();
                    if u.leading_colon.is_some() {
                        prefix.push(String::new());
                    }
                    let mut found = Vec::new();
                    collect_use_tree(&u.tree, &mut prefix, &mut found);
                    for (alias, segments) in found {
                        self.insert(alias, normalize(&segments, module).join("::"))?;
                    }
                }
                Item::ExternCrate(krate) => {
                    let alias = match &krate.rename {
                        Some((_, rename)) => rename.to_string(),
                        None => krate.ident.to_string(),
                    };
                    if alias != "_" {
                        self.insert(alias, krate.ident.to_string())?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Bind `alias` to `path`, failing if the file already binds it elsewhere.
    pub fn insert(&mut self, alias: impl Into<String>, path: impl Into<String>) -> Result<()> {
        let alias = alias.into();
        let path = path.into();
        if let Some(existing) = self.entries.get(&alias) {
            if *existing != path {
                return Err(Box::new(Error::ConflictingImport {
                    alias,
                    first: existing.clone(),
                    second: path,
                }));
            }
            return Ok(());
        }
        self.entries.insert(alias, path);
        Ok(())
    }

    /// Full path bound to `alias`.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn collect_use_tree(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Vec<(String, Vec<String>)>) {
    match tree {
        UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            collect_use_tree(&p.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            if ident == "self" {
                if let Some(last) = prefix.last() {
                    out.push((last.clone(), prefix.clone()));
                }
            } else {
                let mut full = prefix.clone();
                full.push(ident.clone());
                out.push((ident, full));
            }
        }
        UseTree::Rename(rename) => {
            let alias = rename.rename.to_string();
            if alias == "_" {
                return;
            }
            let mut full = prefix.clone();
            if rename.ident != "self" {
                full.push(rename.ident.to_string());
            }
            out.push((alias, full));
        }
        UseTree::Group(group) => {
            for item in &group.items {
                collect_use_tree(item, prefix, out);
            }
        }
        UseTree::Glob(_) => {}
    }
}

/// Rewrite `self`/`super` prefixes so the path works from the generated module.
///
/// `module` is the declaring file's module, `None` for the package root.
pub(crate) fn normalize(segments: &[String], module: Option<&str>) -> Vec<String> {
    let supers = segments.iter().take_while(|s| *s == "super").count();
    let mut out = Vec::with_capacity(segments.len() + 1);
    if supers > 0 {
        // The root file is one level above the generated module; child files are siblings.
        let depth = if module.is_none() { supers + 1 } else { supers };
        out.extend(std::iter::repeat_n("super".to_string(), depth));
        out.extend(segments[supers..].iter().cloned());
    } else if segments.first().is_some_and(|s| s == "self") {
        out.push("super".to_string());
        if let Some(m) = module {
            out.push(m.to_string());
        }
        out.extend(segments[1..].iter().cloned());
    } else {
        out.extend(segments.iter().cloned());
    }
    out
}

/// One `use` line the generated file needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceImport {
    pub alias: String,
    pub path: String,
}

impl NamespaceImport {
    /// Render as a Rust `use` item.
    pub fn render(&self) -> String {
        let last = self.path.rsplit("::").next().unwrap_or(&self.path);
        if last == self.alias {
            format!("use {};", self.path)
        } else {
            format!("use {} as {};", self.path, self.alias)
        }
    }
}

/// What [`ImportCollector::require`] made of an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Required {
    /// The alias is imported with the path its file gives it.
    Imported,
    /// The alias is already imported with a different path.
    Clash { path: String },
    /// The file has no import for the alias.
    Unresolved,
}

/// Deduplicates namespace imports, keeping first-seen order.
///
/// Every alias is imported at most once; a later file binding it to another
/// path gets [`Required::Clash`] and must spell the path out instead.
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    imports: IndexMap<String, NamespaceImport>,
    unresolved: IndexSet<String>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the import for `alias` as the declaring file's `table` binds it.
    pub fn require(&mut self, alias: &str, table: &ImportTable) -> Required {
        let Some(path) = table.resolve(alias) else {
            self.unresolved.insert(alias.to_string());
            return Required::Unresolved;
        };
        match self.imports.get(alias) {
            Some(existing) if existing.path != path => Required::Clash {
                path: path.to_string(),
            },
            Some(_) => Required::Imported,
            None => {
                self.imports.insert(
                    alias.to_string(),
                    NamespaceImport {
                        alias: alias.to_string(),
                        path: path.to_string(),
                    },
                );
                Required::Imported
            }
        }
    }

    /// Iterate over collected imports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NamespaceImport> {
        self.imports.values()
    }

    /// Aliases that could not be resolved.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().map(String::as_str)
    }
}
