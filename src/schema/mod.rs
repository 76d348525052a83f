//! DTO schema resolution.
//!
//! Expands a DTO class into field descriptors, linking fields whose type is
//! another workspace class to that class's declaration.

pub mod entity;

pub use entity::{EntityRef, TableBindingResolver};

use serde::Serialize;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

use crate::analysis::{AnalysisSession, DeclarationKind, PropertyDecl, SourceUnit, TypeExpr};
use crate::error::AnalysisError;

/// Upper bound on chained type aliases followed for one field.
const MAX_ALIAS_HOPS: usize = 8;

/// Identifies a DTO by its declaration site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DtoRef {
    pub declaration_path: PathBuf,
    pub class_name: String,
}

impl DtoRef {
    pub fn new(declaration_path: impl Into<PathBuf>, class_name: impl Into<String>) -> Self {
        Self {
            declaration_path: declaration_path.into(),
            class_name: class_name.into(),
        }
    }
}

/// One property of a DTO class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Type text; the element type for arrays.
    pub declared_type: String,
    pub is_array: bool,
    /// The nested DTO, when the field's type is a workspace declaration.
    pub related_dto: Option<DtoRef>,
}

impl FieldDescriptor {
    pub fn is_primitive(&self) -> bool {
        self.related_dto.is_none()
    }
}

/// Expands DTO references into fields using a session's units.
pub struct SchemaResolver<'s> {
    session: &'s AnalysisSession,
}

impl<'s> SchemaResolver<'s> {
    pub fn new(session: &'s AnalysisSession) -> Self {
        Self { session }
    }

    /// Fields of a DTO in declaration order.
    ///
    /// Missing classes and unreadable files yield no fields.
    pub fn resolve(&self, dto: &DtoRef) -> Vec<FieldDescriptor> {
        match self.try_resolve(dto) {
            Ok(fields) => fields,
            Err(e) if e.is_not_found() => {
                debug!(error = %e, "DTO not found");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, class = %dto.class_name, "cannot resolve DTO");
                Vec::new()
            }
        }
    }

    pub fn try_resolve(&self, dto: &DtoRef) -> Result<Vec<FieldDescriptor>, AnalysisError> {
        let unit = self.session.load(&dto.declaration_path)?;
        let class = unit
            .facts
            .find_class(&dto.class_name)
            .ok_or_else(|| AnalysisError::ClassNotFound {
                path: unit.path.clone(),
                class: dto.class_name.clone(),
            })?;

        Ok(class
            .properties
            .iter()
            .map(|p| self.describe(&unit, p))
            .collect())
    }

    fn describe(&self, unit: &SourceUnit, property: &PropertyDecl) -> FieldDescriptor {
        let declared = property.declared_type();
        let base = declared.base_type();

        if let Some(target) = self.primitive_alias(unit, base) {
            return FieldDescriptor {
                name: property.name.clone(),
                declared_type: target.base_type().to_string(),
                is_array: declared.is_array() || target.is_array(),
                related_dto: None,
            };
        }

        FieldDescriptor {
            name: property.name.clone(),
            declared_type: base.to_string(),
            is_array: declared.is_array(),
            related_dto: self.dto_for_type(unit, base),
        }
    }

    /// The workspace DTO a type used in `unit` refers to.
    ///
    /// Primitives, enums, unresolvable types and declarations inside the
    /// dependency store have none.
    pub fn dto_for_type(&self, unit: &SourceUnit, ty: &TypeExpr) -> Option<DtoRef> {
        if is_primitive_text(ty) || self.primitive_alias(unit, ty).is_some() {
            return None;
        }

        let symbol = self.session.resolve_type(unit, ty)?;
        match symbol.kind {
            None | Some(DeclarationKind::Enum) => None,
            Some(_) if self.session.is_dependency_path(&symbol.path) => {
                debug!(name = %symbol.name, "type declared in dependency store, opaque");
                None
            }
            Some(_) => Some(DtoRef::new(symbol.path, symbol.name)),
        }
    }

    /// The primitive a chain of type aliases ends in, element type included
    /// (`type Tags = string[]`). `None` for anything that is not an alias of
    /// a primitive.
    fn primitive_alias(&self, unit: &SourceUnit, ty: &TypeExpr) -> Option<TypeExpr> {
        let target = self.expand_alias(unit, ty)?;
        is_primitive_text(target.base_type()).then_some(target)
    }

    /// Follow type aliases starting at `ty` as written in `unit`.
    ///
    /// Returns the first non-alias target, or `None` when `ty` is not an alias.
    fn expand_alias(&self, unit: &SourceUnit, ty: &TypeExpr) -> Option<TypeExpr> {
        let mut current = ty.clone();
        let mut owner: Option<Rc<SourceUnit>> = None;

        for _ in 0..MAX_ALIAS_HOPS {
            let at = owner.as_deref().unwrap_or(unit);
            let Some(symbol) = self.session.resolve_type(at, &current) else {
                break;
            };
            if symbol.kind != Some(DeclarationKind::TypeAlias) {
                break;
            }
            let declaring = match self.session.load(&symbol.path) {
                Ok(declaring) => declaring,
                Err(e) => {
                    debug!(error = %e, alias = %symbol.name, "cannot follow type alias");
                    break;
                }
            };
            let Some(target) = declaring
                .facts
                .find_declaration(&symbol.name)
                .and_then(|d| d.aliased.clone())
            else {
                break;
            };
            current = target;
            owner = Some(declaring);
        }

        owner.map(|_| current)
    }
}

/// Keyword primitives, `any`, and anything mentioning `Date`.
pub fn is_primitive_text(ty: &TypeExpr) -> bool {
    if let TypeExpr::Predefined(keyword) = ty {
        if matches!(keyword.as_str(), "string" | "number" | "boolean" | "any") {
            return true;
        }
    }
    let text = ty.to_string();
    text.contains("Date") || text == "any"
}
