//! Type-resolution facade over TypeScript sources.
//!
//! A session loads files (or unsaved buffers) through the tree-sitter
//! analyzers into `FileFacts`: top-level type declarations, decorated class
//! members, imports and exports. Resolution walks those facts across files to
//! find where a type is declared.
//!
//! ```text
//! disk / buffers -> analyzer (ts, tsx) -> FileFacts -> SourceUnit (session)
//!                                                          |
//!                         imports, re-exports  <-----------+
//! ```

mod facts;
mod languages;
mod resolve;
mod session;
mod traits;

pub use facts::{
    Argument, ClassDecl, Declaration, DeclarationKind, Decorated, Decorator, ExportSpecifier,
    FileFacts, Import, ImportBinding, ImportedName, MethodDecl, ParameterDecl, PropertyDecl,
    ReExport, Span, TypeExpr,
};
pub use languages::{get_analyzer, get_analyzer_for_path, register_analyzers, TypeScriptAnalyzer};
pub use resolve::{ModuleTarget, SymbolDeclaration, MAX_EXPORT_HOPS};
pub use session::{normalize_path, AnalysisSession, SourceUnit, UnitOrigin};
pub use traits::{LanguageAnalyzer, ParsedFile};
