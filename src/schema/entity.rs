//! Storage-table binding for response entities.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::analysis::{AnalysisSession, Decorated};
use crate::config::Conventions;

/// Identifies the class an endpoint returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub declaration_path: PathBuf,
    pub class_name: String,
}

/// Looks up the table a storage entity is bound to.
pub struct TableBindingResolver<'s> {
    session: &'s AnalysisSession,
    conventions: &'s Conventions,
}

impl<'s> TableBindingResolver<'s> {
    pub fn new(session: &'s AnalysisSession, conventions: &'s Conventions) -> Self {
        Self {
            session,
            conventions,
        }
    }

    /// Whether a file is named like a storage entity (`user.entity.ts`).
    pub fn matches_convention(&self, path: &Path) -> bool {
        path.to_string_lossy()
            .contains(&self.conventions.entity_file_marker)
    }

    /// Table name of an entity class.
    ///
    /// The first string argument of the entity annotation, else its `name`
    /// option, else the class name. `None` when the class is missing or not
    /// annotated as an entity.
    pub fn resolve_table(&self, path: &Path, class_name: &str) -> Option<String> {
        let unit = match self.session.load(path) {
            Ok(unit) => unit,
            Err(e) => {
                warn!(error = %e, "cannot read entity file");
                return None;
            }
        };

        let Some(class) = unit.facts.find_class(class_name) else {
            debug!(class = class_name, path = %path.display(), "entity class not found");
            return None;
        };

        let entity = class.decorator(&self.conventions.entity_annotation)?;
        let table = entity
            .first_string_argument()
            .or_else(|| entity.first_argument_property("name"))
            .map(str::to_string)
            .unwrap_or_else(|| class.name.clone());
        Some(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &str, class: &str) -> Option<String> {
        let session = AnalysisSession::new();
        session.set_buffer("/ws/user.entity.ts", source);
        let conventions = Conventions::default();
        TableBindingResolver::new(&session, &conventions)
            .resolve_table(Path::new("/ws/user.entity.ts"), class)
    }

    #[test]
    fn test_table_name_sources() {
        assert_eq!(
            resolve("@Entity('app_users') export class User {}", "User"),
            Some("app_users".to_string())
        );
        assert_eq!(
            resolve("@Entity({ name: 'people' }) export class User {}", "User"),
            Some("people".to_string())
        );
        assert_eq!(
            resolve("@Entity() export class User {}", "User"),
            Some("User".to_string())
        );
    }

    #[test]
    fn test_no_table_without_entity() {
        assert_eq!(resolve("export class User {}", "User"), None);
        assert_eq!(resolve("@Entity() export class User {}", "Other"), None);

        let session = AnalysisSession::new();
        let conventions = Conventions::default();
        let resolver = TableBindingResolver::new(&session, &conventions);
        assert_eq!(
            resolver.resolve_table(Path::new("/nowhere/user.entity.ts"), "User"),
            None
        );
    }

    #[test]
    fn test_matches_convention() {
        let session = AnalysisSession::new();
        let conventions = Conventions::default();
        let resolver = TableBindingResolver::new(&session, &conventions);
        assert!(resolver.matches_convention(Path::new("/ws/src/user.entity.ts")));
        assert!(!resolver.matches_convention(Path::new("/ws/src/user.dto.ts")));
    }
}
