//! Endpoint extraction from controller source units.

use std::path::Path;

use tracing::{debug, warn};

use crate::analysis::{AnalysisSession, ClassDecl, Decorated, MethodDecl, SourceUnit, TypeExpr};
use crate::config::Conventions;
use crate::endpoints::{join_route, select_controller, EndpointDescriptor, HttpMethod};
use crate::error::AnalysisError;
use crate::schema::{DtoRef, EntityRef, SchemaResolver, TableBindingResolver};

/// Wrapper types unwrapped from a handler's return type.
const RESPONSE_WRAPPERS: &[&str] = &["Promise", "Observable"];

/// Turns a controller file into endpoint descriptors.
pub struct EndpointExtractor<'s> {
    session: &'s AnalysisSession,
    conventions: &'s Conventions,
}

impl<'s> EndpointExtractor<'s> {
    pub fn new(session: &'s AnalysisSession, conventions: &'s Conventions) -> Self {
        Self {
            session,
            conventions,
        }
    }

    /// Endpoints declared in a file; empty when the file has no controller
    /// or cannot be loaded.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Vec<EndpointDescriptor> {
        match self.try_extract(path.as_ref()) {
            Ok(endpoints) => endpoints,
            Err(e) => {
                warn!(error = %e, "cannot extract endpoints");
                Vec::new()
            }
        }
    }

    pub fn try_extract(&self, path: &Path) -> Result<Vec<EndpointDescriptor>, AnalysisError> {
        let unit = self.session.load(path)?;
        Ok(self.extract_unit(&unit))
    }

    /// Endpoints of an already loaded unit.
    pub fn extract_unit(&self, unit: &SourceUnit) -> Vec<EndpointDescriptor> {
        let Some((controller, strategy)) = select_controller(&unit.facts.classes, self.conventions)
        else {
            debug!(path = %unit.path.display(), "no request-handling class");
            return Vec::new();
        };
        debug!(class = %controller.name, strategy, "selected controller");

        let base = self.base_route(controller);
        let schema = SchemaResolver::new(self.session);
        let tables = TableBindingResolver::new(self.session, self.conventions);

        controller
            .methods
            .iter()
            .filter_map(|method| self.describe(unit, method, &base, &schema, &tables))
            .collect()
    }

    /// The group annotation's path: a string argument or a `{ path }` option.
    fn base_route(&self, controller: &ClassDecl) -> String {
        controller
            .decorator(&self.conventions.group_annotation)
            .and_then(|d| {
                d.first_string_argument()
                    .or_else(|| d.first_argument_property("path"))
            })
            .map(|path| path.trim().to_string())
            .unwrap_or_default()
    }

    fn describe(
        &self,
        unit: &SourceUnit,
        method: &MethodDecl,
        base: &str,
        schema: &SchemaResolver,
        tables: &TableBindingResolver,
    ) -> Option<EndpointDescriptor> {
        let mut verbs = method
            .decorators
            .iter()
            .filter_map(|d| HttpMethod::from_decorator(&d.name).map(|m| (m, d)));
        let (http_method, verb) = verbs.next()?;

        let ignored: Vec<&str> = verbs.map(|(m, _)| m.as_str()).collect();
        if !ignored.is_empty() {
            warn!(
                handler = %method.name,
                using = %http_method,
                ?ignored,
                "several verb annotations on one handler, using the first"
            );
        }

        let route = join_route(base, verb.first_string_argument().unwrap_or(""));

        let mut request_body = None;
        let mut body_seen = false;
        let mut path_params = Vec::new();
        let mut query_params = Vec::new();

        for param in &method.parameters {
            let is_body = param.has_decorator(&self.conventions.body_annotation);
            let query = param.decorator(&self.conventions.query_param_annotation);

            if is_body && query.is_some() {
                warn!(
                    handler = %method.name,
                    parameter = %param.name,
                    "parameter bound to both body and query"
                );
            }

            if is_body && !body_seen {
                body_seen = true;
                request_body = param
                    .type_expr
                    .as_ref()
                    .and_then(|ty| self.body_dto(unit, ty, schema));
            }

            if param.has_decorator(&self.conventions.path_param_annotation) {
                path_params.push(param.name.clone());
            }

            if let Some(query) = query {
                let name = query
                    .first_string_argument()
                    .map(str::to_string)
                    .unwrap_or_else(|| param.name.clone());
                query_params.push(name);
            }
        }

        let entity = method
            .return_type
            .as_ref()
            .and_then(|ty| self.entity_ref(unit, ty));
        let table_name = entity.as_ref().and_then(|e| {
            if tables.matches_convention(&e.declaration_path) {
                tables.resolve_table(&e.declaration_path, &e.class_name)
            } else {
                None
            }
        });

        Some(EndpointDescriptor {
            http_method,
            route,
            handler: method.name.clone(),
            request_body,
            entity,
            table_name,
            path_params,
            query_params,
            decl_line: verb.span.start_line,
            span_start: method.span.start_line,
            span_end: method.span.end_line,
        })
    }

    /// Arrays and types without a workspace declaration carry no body DTO.
    fn body_dto(&self, unit: &SourceUnit, ty: &TypeExpr, schema: &SchemaResolver) -> Option<DtoRef> {
        if ty.is_array() {
            return None;
        }
        schema.dto_for_type(unit, ty)
    }

    fn entity_ref(&self, unit: &SourceUnit, ty: &TypeExpr) -> Option<EntityRef> {
        let inner = ty.unwrap_generic(RESPONSE_WRAPPERS).base_type();
        let symbol = self.session.resolve_type(unit, inner)?;
        if symbol.kind.is_none() || self.session.is_dependency_path(&symbol.path) {
            return None;
        }
        Some(EntityRef {
            declaration_path: symbol.path,
            class_name: symbol.name,
        })
    }
}
