//! The analyzer seam between tree-sitter grammars and extracted facts.

use std::path::Path;

use super::FileFacts;
use crate::error::AnalysisError;

/// A syntax tree together with the bytes it was built from.
///
/// Dropped once facts are extracted; only `FileFacts` outlive a load.
pub struct ParsedFile {
    pub tree: tree_sitter::Tree,
    pub source: Vec<u8>,
    /// Path as given to the analyzer, used in fact records.
    pub path: String,
}

impl ParsedFile {
    /// Text covered by a node, empty on invalid UTF-8.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Turns source text of one grammar into `FileFacts`.
///
/// Implementations are shared through statics, so they build a fresh
/// `tree_sitter::Parser` per call.
pub trait LanguageAnalyzer: Send + Sync {
    /// Short identifier recorded in `FileFacts::language`.
    fn language_id(&self) -> &'static str;

    /// Extensions served, without the dot.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Syntax errors do not fail the parse; the tree carries ERROR nodes.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile, AnalysisError>;

    fn extract_facts(&self, parsed: &ParsedFile) -> Result<FileFacts, AnalysisError>;

    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
