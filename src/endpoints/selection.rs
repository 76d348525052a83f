//! Request-handling class selection.
//!
//! Strategies run in order and the first one that picks a class wins.

use crate::analysis::{ClassDecl, Decorated};
use crate::config::Conventions;

/// Picks a class from a file's top-level classes, or declines.
pub type SelectionStrategy = for<'a> fn(&'a [ClassDecl], &Conventions) -> Option<&'a ClassDecl>;

/// Strategies in evaluation order.
pub const SELECTION_STRATEGIES: &[(&str, SelectionStrategy)] = &[
    ("group annotation", by_group_annotation),
    ("naming convention", by_naming_convention),
    ("last exported class", last_exported),
];

/// The first class carrying the group annotation.
pub fn by_group_annotation<'a>(
    classes: &'a [ClassDecl],
    conventions: &Conventions,
) -> Option<&'a ClassDecl> {
    classes
        .iter()
        .find(|c| c.has_decorator(&conventions.group_annotation))
}

/// The first exported class whose name contains the group suffix.
pub fn by_naming_convention<'a>(
    classes: &'a [ClassDecl],
    conventions: &Conventions,
) -> Option<&'a ClassDecl> {
    classes
        .iter()
        .find(|c| c.exported && c.name.contains(&conventions.group_suffix))
}

pub fn last_exported<'a>(classes: &'a [ClassDecl], _: &Conventions) -> Option<&'a ClassDecl> {
    classes.iter().rev().find(|c| c.exported)
}

/// Run the strategies in order, returning the chosen class and strategy name.
pub fn select_controller<'a>(
    classes: &'a [ClassDecl],
    conventions: &Conventions,
) -> Option<(&'a ClassDecl, &'static str)> {
    SELECTION_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(classes, conventions).map(|class| (class, *name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Decorator, Span};

    fn span() -> Span {
        Span {
            start_byte: 0,
            end_byte: 0,
            start_line: 1,
            start_col: 1,
            end_line: 1,
            end_col: 1,
        }
    }

    fn class(name: &str, exported: bool, decorators: &[&str]) -> ClassDecl {
        ClassDecl {
            name: name.to_string(),
            exported,
            default_export: false,
            decorators: decorators
                .iter()
                .map(|d| Decorator {
                    name: d.to_string(),
                    arguments: Vec::new(),
                    span: span(),
                })
                .collect(),
            properties: Vec::new(),
            methods: Vec::new(),
            span: span(),
        }
    }

    #[test]
    fn test_group_annotation_wins() {
        let classes = vec![
            class("UsersController", true, &[]),
            class("Handlers", false, &["Controller"]),
        ];
        let (chosen, strategy) = select_controller(&classes, &Conventions::default()).unwrap();
        assert_eq!(chosen.name, "Handlers");
        assert_eq!(strategy, "group annotation");
    }

    #[test]
    fn test_naming_convention_requires_export() {
        let conventions = Conventions::default();
        let classes = vec![
            class("InternalController", false, &[]),
            class("OrdersController", true, &[]),
        ];
        assert!(by_group_annotation(&classes, &conventions).is_none());
        assert_eq!(
            by_naming_convention(&classes, &conventions).map(|c| c.name.as_str()),
            Some("OrdersController")
        );
    }

    #[test]
    fn test_last_exported_fallback() {
        let classes = vec![
            class("First", true, &[]),
            class("Second", true, &[]),
            class("Hidden", false, &[]),
        ];
        let (chosen, strategy) = select_controller(&classes, &Conventions::default()).unwrap();
        assert_eq!(chosen.name, "Second");
        assert_eq!(strategy, "last exported class");
    }

    #[test]
    fn test_no_candidate() {
        let classes = vec![class("Hidden", false, &[])];
        assert!(select_controller(&classes, &Conventions::default()).is_none());
        assert!(select_controller(&[], &Conventions::default()).is_none());
    }
}
