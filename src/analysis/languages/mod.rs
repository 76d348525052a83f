//! TypeScript analyzers, shared as process-wide statics.

mod typescript;

pub use typescript::TypeScriptAnalyzer;

use super::LanguageAnalyzer;
use once_cell::sync::OnceCell;
use std::path::Path;

/// `.ts`, `.mts`, `.cts` and `.d.ts`.
static TYPESCRIPT_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

static TSX_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

/// Build both analyzers up front. Idempotent; lookups also build lazily.
pub fn register_analyzers() {
    TYPESCRIPT_ANALYZER.get_or_init(TypeScriptAnalyzer::new);
    TSX_ANALYZER.get_or_init(TypeScriptAnalyzer::tsx);
}

/// Analyzer serving `ext` (no dot).
pub fn get_analyzer(ext: &str) -> Option<&'static dyn LanguageAnalyzer> {
    match ext {
        "ts" | "mts" | "cts" => Some(TYPESCRIPT_ANALYZER.get_or_init(TypeScriptAnalyzer::new)),
        "tsx" => Some(TSX_ANALYZER.get_or_init(TypeScriptAnalyzer::tsx)),
        _ => None,
    }
}

/// `.d.ts` files resolve through their final `ts` extension.
pub fn get_analyzer_for_path(path: &Path) -> Option<&'static dyn LanguageAnalyzer> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(get_analyzer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_analyzer_by_extension() {
        assert_eq!(get_analyzer("ts").map(|a| a.language_id()), Some("typescript"));
        assert_eq!(get_analyzer("mts").map(|a| a.language_id()), Some("typescript"));
        assert_eq!(get_analyzer("tsx").map(|a| a.language_id()), Some("tsx"));
        assert!(get_analyzer("js").is_none());
        assert!(get_analyzer("rs").is_none());
    }

    #[test]
    fn test_get_analyzer_for_declaration_file() {
        let analyzer = get_analyzer_for_path(Path::new("types/index.d.ts")).unwrap();
        assert!(analyzer.handles_extension("ts"));
        assert!(get_analyzer_for_path(Path::new("Makefile")).is_none());
    }
}
