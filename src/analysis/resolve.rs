//! Symbol resolution across source units.
//!
//! Follows local declarations, import bindings and barrel re-exports to the
//! file that declares a type. Packages in the dependency store are not
//! parsed; a symbol imported from one resolves to the package directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::analysis::{
    normalize_path, AnalysisSession, DeclarationKind, ImportedName, SourceUnit, TypeExpr,
};

/// Upper bound on chained re-exports followed for one symbol.
pub const MAX_EXPORT_HOPS: usize = 8;

/// `(module, exported name)` pairs already searched during one lookup.
type Visited = HashSet<(PathBuf, String)>;

/// Where a module specifier points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleTarget {
    /// A TypeScript source file in the workspace.
    Source(PathBuf),
    /// A package directory inside the dependency store.
    Package(PathBuf),
}

/// The declaration site of a type symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDeclaration {
    pub path: PathBuf,
    pub name: String,
    /// `None` when the symbol lives in an unparsed package.
    pub kind: Option<DeclarationKind>,
}

impl AnalysisSession {
    /// Resolve a module specifier as written in `from`.
    ///
    /// Returns `None` when a relative or rooted specifier names no file.
    pub fn resolve_module(&self, from: &Path, specifier: &str) -> Option<ModuleTarget> {
        if specifier.starts_with("./")
            || specifier.starts_with("../")
            || specifier == "."
            || specifier == ".."
        {
            let dir = from.parent()?;
            return self.probe_source(&dir.join(specifier));
        }

        if Path::new(specifier).is_absolute() {
            return self.probe_source(Path::new(specifier));
        }

        for root in self.module_roots() {
            if let Some(found) = self.probe_source(&root.join(specifier)) {
                return Some(found);
            }
        }

        Some(ModuleTarget::Package(self.locate_package(from, specifier)))
    }

    fn probe_source(&self, base: &Path) -> Option<ModuleTarget> {
        let base = normalize_path(base);
        let text = base.to_string_lossy();
        let mut candidates = Vec::new();

        if let Some(stem) = text.strip_suffix(".js") {
            candidates.push(PathBuf::from(format!("{}.ts", stem)));
            candidates.push(PathBuf::from(format!("{}.tsx", stem)));
        } else if matches!(
            base.extension().and_then(|e| e.to_str()),
            Some("ts" | "tsx" | "mts" | "cts")
        ) {
            candidates.push(base.clone());
        }
        for ext in ["ts", "tsx", "d.ts"] {
            candidates.push(PathBuf::from(format!("{}.{}", text, ext)));
        }
        for index in ["index.ts", "index.tsx", "index.d.ts"] {
            candidates.push(base.join(index));
        }

        candidates
            .into_iter()
            .find(|c| self.source_exists(c))
            .map(ModuleTarget::Source)
    }

    fn locate_package(&self, from: &Path, specifier: &str) -> PathBuf {
        let mut parts = specifier.split('/');
        let package = match (parts.next(), parts.next()) {
            (Some(scope), Some(name)) if scope.starts_with('@') => format!("{}/{}", scope, name),
            (Some(name), _) => name.to_string(),
            _ => specifier.to_string(),
        };

        let start = from.parent().unwrap_or(from);
        for dir in start.ancestors() {
            let candidate = dir.join(self.dependency_store()).join(&package);
            if candidate.exists() {
                return candidate;
            }
        }
        start.join(self.dependency_store()).join(package)
    }

    /// Resolve a named type reference used in `unit`.
    ///
    /// Keyword types, literals, unions and inline object types have no
    /// declaration and yield `None`.
    pub fn resolve_type(&self, unit: &SourceUnit, ty: &TypeExpr) -> Option<SymbolDeclaration> {
        match ty {
            TypeExpr::Reference { name, .. } => self.resolve_name(unit, name),
            _ => None,
        }
    }

    /// Resolve a (possibly namespace-qualified) type name used in `unit`.
    pub fn resolve_name(&self, unit: &SourceUnit, name: &str) -> Option<SymbolDeclaration> {
        if let Some((namespace, member)) = name.split_once('.') {
            let (import, binding) = unit.facts.import_binding(namespace)?;
            if binding.imported != ImportedName::Namespace {
                return None;
            }
            return match self.resolve_module(&unit.path, &import.source)? {
                ModuleTarget::Source(path) => self.resolve_export(&path, member, 0),
                ModuleTarget::Package(path) => Some(SymbolDeclaration {
                    path,
                    name: member.to_string(),
                    kind: None,
                }),
            };
        }

        if let Some(decl) = unit.facts.find_declaration(name) {
            return Some(SymbolDeclaration {
                path: unit.path.clone(),
                name: decl.name.clone(),
                kind: Some(decl.kind),
            });
        }

        let found = self.resolve_imported(unit, name, 0, &mut Visited::new());
        if found.is_none() {
            debug!(name, path = %unit.path.display(), "no declaration for type");
        }
        found
    }

    /// Follow the import that binds `local` in `unit`.
    fn resolve_imported(
        &self,
        unit: &SourceUnit,
        local: &str,
        hops: usize,
        visited: &mut Visited,
    ) -> Option<SymbolDeclaration> {
        let (import, binding) = unit.facts.import_binding(local)?;
        let exported = match &binding.imported {
            ImportedName::Named(name) => name.as_str(),
            ImportedName::Default => "default",
            ImportedName::Namespace => return None,
        };

        match self.resolve_module(&unit.path, &import.source)? {
            ModuleTarget::Source(path) => self.resolve_export_in(&path, exported, hops, visited),
            ModuleTarget::Package(path) => Some(SymbolDeclaration {
                path,
                name: exported.to_string(),
                kind: None,
            }),
        }
    }

    /// Find the declaration behind an export of `module`.
    pub fn resolve_export(
        &self,
        module: &Path,
        name: &str,
        hops: usize,
    ) -> Option<SymbolDeclaration> {
        self.resolve_export_in(module, name, hops, &mut Visited::new())
    }

    /// Each `(module, name)` pair is searched at most once per lookup, so
    /// `export *` cycles between barrels stay linear.
    fn resolve_export_in(
        &self,
        module: &Path,
        name: &str,
        hops: usize,
        visited: &mut Visited,
    ) -> Option<SymbolDeclaration> {
        if hops > MAX_EXPORT_HOPS {
            warn!(name, path = %module.display(), "re-export chain too long");
            return None;
        }
        if !visited.insert((normalize_path(module), name.to_string())) {
            return None;
        }

        let unit = match self.load(module) {
            Ok(unit) => unit,
            Err(e) => {
                debug!(error = %e, "cannot follow export");
                return None;
            }
        };
        let facts = &unit.facts;

        let local = if name == "default" {
            facts.default_export_name().map(str::to_string)
        } else {
            facts.local_export_target(name).map(str::to_string).or_else(|| {
                facts
                    .find_declaration(name)
                    .filter(|d| d.exported)
                    .map(|d| d.name.clone())
            })
        };

        if let Some(local) = local {
            if let Some(decl) = facts.find_declaration(&local) {
                return Some(SymbolDeclaration {
                    path: unit.path.clone(),
                    name: decl.name.clone(),
                    kind: Some(decl.kind),
                });
            }
            return self.resolve_imported(&unit, &local, hops + 1, visited);
        }

        for re_export in &facts.re_exports {
            match &re_export.names {
                Some(specs) => {
                    let Some(spec) = specs.iter().find(|s| s.exported_name() == name) else {
                        continue;
                    };
                    return match self.resolve_module(&unit.path, &re_export.source)? {
                        ModuleTarget::Source(path) => {
                            self.resolve_export_in(&path, &spec.name, hops + 1, visited)
                        }
                        ModuleTarget::Package(path) => Some(SymbolDeclaration {
                            path,
                            name: spec.name.clone(),
                            kind: None,
                        }),
                    };
                }
                // `export *` never forwards the default export.
                None if name != "default" => {
                    if let Some(ModuleTarget::Source(path)) =
                        self.resolve_module(&unit.path, &re_export.source)
                    {
                        if let Some(found) = self.resolve_export_in(&path, name, hops + 1, visited)
                        {
                            return Some(found);
                        }
                    }
                }
                None => {}
            }
        }

        None
    }
}
