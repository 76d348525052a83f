//! TypeScript language analyzer using tree-sitter.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::{
    Argument, ClassDecl, Declaration, DeclarationKind, Decorator, ExportSpecifier, FileFacts,
    Import, ImportBinding, ImportedName, LanguageAnalyzer, MethodDecl, ParameterDecl,
    ParsedFile, PropertyDecl, ReExport, Span, TypeExpr,
};
use crate::error::AnalysisError;

const DECLARATION_QUERY: &str = r#"
; Class declarations
(class_declaration
  name: (type_identifier) @class_name
) @class

(abstract_class_declaration
  name: (type_identifier) @class_name
) @class

; Interface declarations
(interface_declaration
  name: (type_identifier) @interface_name
) @interface

; Enum declarations
(enum_declaration
  name: (identifier) @enum_name
) @enum

; Type alias declarations
(type_alias_declaration
  name: (type_identifier) @type_alias_name
) @type_alias
"#;

pub struct TypeScriptAnalyzer {
    language: Language,
    language_id: &'static str,
    extensions: &'static [&'static str],
}

impl TypeScriptAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            language_id: "typescript",
            extensions: &["ts", "mts", "cts"],
        }
    }

    /// Analyzer for `.tsx` files (TypeScript grammar with JSX).
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            language_id: "tsx",
            extensions: &["tsx"],
        }
    }

    fn create_parser(&self) -> Result<Parser, AnalysisError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    fn extract_declarations(
        &self,
        parsed: &ParsedFile,
    ) -> Result<(Vec<Declaration>, Vec<ClassDecl>), AnalysisError> {
        let query = Query::new(&self.language, DECLARATION_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut declarations = Vec::new();
        let mut classes = Vec::new();

        while let Some(m) = matches.next() {
            let mut name = String::new();
            let mut kind = DeclarationKind::Class;
            let mut decl_node = None;

            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                match capture_name {
                    "class_name" => {
                        name = parsed.node_text(capture.node).to_string();
                        kind = DeclarationKind::Class;
                    }
                    "interface_name" => {
                        name = parsed.node_text(capture.node).to_string();
                        kind = DeclarationKind::Interface;
                    }
                    "enum_name" => {
                        name = parsed.node_text(capture.node).to_string();
                        kind = DeclarationKind::Enum;
                    }
                    "type_alias_name" => {
                        name = parsed.node_text(capture.node).to_string();
                        kind = DeclarationKind::TypeAlias;
                    }
                    "class" | "interface" | "enum" | "type_alias" => {
                        decl_node = Some(capture.node);
                    }
                    _ => {}
                }
            }

            let Some(node) = decl_node else { continue };
            if name.is_empty() {
                continue;
            }
            // Only top-level statements count, as with a module's own scope.
            let Some((exported, default_export)) = top_level_context(node) else {
                continue;
            };

            if kind == DeclarationKind::Class {
                classes.push(self.extract_class(parsed, node, &name, exported, default_export));
            }
            let aliased = match kind {
                DeclarationKind::TypeAlias => node
                    .child_by_field_name("value")
                    .map(|value| self.parse_type(parsed, value)),
                _ => None,
            };
            declarations.push(Declaration {
                name,
                kind,
                exported,
                default_export,
                aliased,
                span: Span::from_node(node),
            });
        }

        declarations.sort_by_key(|d| d.span.start_byte);
        classes.sort_by_key(|c| c.span.start_byte);
        Ok((declarations, classes))
    }

    fn extract_class(
        &self,
        parsed: &ParsedFile,
        node: Node,
        name: &str,
        exported: bool,
        default_export: bool,
    ) -> ClassDecl {
        // `@Controller() export class X` attaches the decorators to the export statement.
        let mut decorators = Vec::new();
        if let Some(parent) = node.parent().filter(|p| p.kind() == "export_statement") {
            decorators.extend(self.decorators_of(parsed, parent));
        }
        decorators.extend(self.decorators_of(parsed, node));

        let mut properties = Vec::new();
        let mut methods = Vec::new();

        if let Some(body) = node.child_by_field_name("body") {
            // Member decorators are siblings preceding the member in the class body.
            let mut pending: Vec<Decorator> = Vec::new();
            let mut pending_start: Option<Node> = None;

            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "decorator" => {
                        pending_start.get_or_insert(member);
                        if let Some(decorator) = self.parse_decorator(parsed, member) {
                            pending.push(decorator);
                        }
                    }
                    "comment" => {}
                    "method_definition" => {
                        let mut member_decorators = std::mem::take(&mut pending);
                        member_decorators.extend(self.decorators_of(parsed, member));
                        let start = pending_start.take().unwrap_or(member);
                        methods.push(self.extract_method(parsed, member, start, member_decorators));
                    }
                    "public_field_definition" => {
                        let mut member_decorators = std::mem::take(&mut pending);
                        member_decorators.extend(self.decorators_of(parsed, member));
                        let start = pending_start.take().unwrap_or(member);
                        if let Some(property) =
                            self.extract_property(parsed, member, start, member_decorators)
                        {
                            properties.push(property);
                        }
                    }
                    _ => {
                        pending.clear();
                        pending_start = None;
                    }
                }
            }
        }

        ClassDecl {
            name: name.to_string(),
            exported,
            default_export,
            decorators,
            properties,
            methods,
            span: Span::from_node(node),
        }
    }

    fn extract_method(
        &self,
        parsed: &ParsedFile,
        node: Node,
        start: Node,
        decorators: Vec<Decorator>,
    ) -> MethodDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| unquote(parsed.node_text(n)))
            .unwrap_or_default();

        let mut parameters = Vec::new();
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if matches!(param.kind(), "required_parameter" | "optional_parameter") {
                    parameters.push(self.extract_parameter(parsed, param));
                }
            }
        }

        let return_type = node
            .child_by_field_name("return_type")
            .filter(|n| n.kind() == "type_annotation")
            .and_then(|n| self.annotation_type(parsed, n));

        MethodDecl {
            name,
            decorators,
            parameters,
            return_type,
            span: Span::covering(start, node),
        }
    }

    fn extract_parameter(&self, parsed: &ParsedFile, node: Node) -> ParameterDecl {
        let name = node
            .child_by_field_name("pattern")
            .map(|n| parsed.node_text(n).to_string())
            .unwrap_or_default();
        let type_expr = node
            .child_by_field_name("type")
            .and_then(|n| self.annotation_type(parsed, n));

        ParameterDecl {
            name,
            decorators: self.decorators_of(parsed, node),
            type_expr,
        }
    }

    fn extract_property(
        &self,
        parsed: &ParsedFile,
        node: Node,
        start: Node,
        decorators: Vec<Decorator>,
    ) -> Option<PropertyDecl> {
        let name = unquote(parsed.node_text(node.child_by_field_name("name")?));
        let type_expr = node
            .child_by_field_name("type")
            .and_then(|n| self.annotation_type(parsed, n))
            .or_else(|| {
                node.child_by_field_name("value")
                    .and_then(|v| self.infer_initializer_type(parsed, v))
            });

        Some(PropertyDecl {
            name,
            decorators,
            type_expr,
            optional: has_child_kind(node, "?"),
            span: Span::covering(start, node),
        })
    }

    /// Type of a literal initializer, the way the compiler would widen it.
    fn infer_initializer_type(&self, parsed: &ParsedFile, value: Node) -> Option<TypeExpr> {
        match value.kind() {
            "string" | "template_string" => Some(TypeExpr::Predefined("string".to_string())),
            "number" => Some(TypeExpr::Predefined("number".to_string())),
            "true" | "false" => Some(TypeExpr::Predefined("boolean".to_string())),
            "new_expression" => {
                let constructor = value.child_by_field_name("constructor")?;
                (constructor.kind() == "identifier")
                    .then(|| TypeExpr::named(parsed.node_text(constructor)))
            }
            _ => None,
        }
    }

    /// Type inside a `: T` annotation.
    fn annotation_type(&self, parsed: &ParsedFile, annotation: Node) -> Option<TypeExpr> {
        let mut cursor = annotation.walk();
        let inner = annotation
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment")?;
        Some(self.parse_type(parsed, inner))
    }

    fn parse_type(&self, parsed: &ParsedFile, node: Node) -> TypeExpr {
        match node.kind() {
            "predefined_type" => TypeExpr::Predefined(parsed.node_text(node).to_string()),
            "type_identifier" | "nested_type_identifier" | "identifier" => {
                TypeExpr::named(compact(parsed.node_text(node)))
            }
            "generic_type" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| compact(parsed.node_text(n)))
                    .unwrap_or_default();
                let mut args = Vec::new();
                if let Some(type_args) = node.child_by_field_name("type_arguments") {
                    let mut cursor = type_args.walk();
                    for arg in type_args.named_children(&mut cursor) {
                        if arg.kind() != "comment" {
                            args.push(self.parse_type(parsed, arg));
                        }
                    }
                }
                TypeExpr::Reference { name, args }
            }
            "array_type" => match node.named_child(0) {
                Some(element) => TypeExpr::Array(Box::new(self.parse_type(parsed, element))),
                None => TypeExpr::Other(compact(parsed.node_text(node))),
            },
            "union_type" => {
                let mut members = Vec::new();
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match self.parse_type(parsed, child) {
                        TypeExpr::Union(nested) => members.extend(nested),
                        other => members.push(other),
                    }
                }
                TypeExpr::Union(members)
            }
            "parenthesized_type" | "type_annotation" => match node.named_child(0) {
                Some(inner) => self.parse_type(parsed, inner),
                None => TypeExpr::Other(compact(parsed.node_text(node))),
            },
            "literal_type" => TypeExpr::Literal(parsed.node_text(node).to_string()),
            _ => TypeExpr::Other(compact(parsed.node_text(node))),
        }
    }

    /// Decorators that are direct children of `node`.
    fn decorators_of(&self, parsed: &ParsedFile, node: Node) -> Vec<Decorator> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .filter_map(|child| self.parse_decorator(parsed, child))
            .collect()
    }

    fn parse_decorator(&self, parsed: &ParsedFile, node: Node) -> Option<Decorator> {
        let mut cursor = node.walk();
        let expr = node
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment")?;

        let (target, arguments) = match expr.kind() {
            "call_expression" => (
                expr.child_by_field_name("function")?,
                expr.child_by_field_name("arguments"),
            ),
            _ => (expr, None),
        };

        let raw = parsed.node_text(target);
        let name = raw.rsplit('.').next().unwrap_or(raw).trim().to_string();
        if name.is_empty() {
            return None;
        }

        let arguments = match arguments {
            Some(args) => {
                let mut cursor = args.walk();
                args.named_children(&mut cursor)
                    .filter(|n| n.kind() != "comment")
                    .map(|n| self.parse_argument(parsed, n))
                    .collect()
            }
            None => Vec::new(),
        };

        Some(Decorator {
            name,
            arguments,
            span: Span::from_node(node),
        })
    }

    fn parse_argument(&self, parsed: &ParsedFile, node: Node) -> Argument {
        match node.kind() {
            "string" => Argument::Str(unquote(parsed.node_text(node))),
            "template_string" if !has_named_child_kind(node, "template_substitution") => {
                Argument::Str(unquote(parsed.node_text(node)))
            }
            "object" => {
                let mut pairs = Vec::new();
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "pair" => {
                            let (Some(key), Some(value)) = (
                                child.child_by_field_name("key"),
                                child.child_by_field_name("value"),
                            ) else {
                                continue;
                            };
                            pairs.push((
                                unquote(parsed.node_text(key)),
                                self.parse_argument(parsed, value),
                            ));
                        }
                        "shorthand_property_identifier" => {
                            let name = parsed.node_text(child).to_string();
                            pairs.push((name.clone(), Argument::Other(name)));
                        }
                        _ => {}
                    }
                }
                Argument::Object(pairs)
            }
            _ => Argument::Other(parsed.node_text(node).to_string()),
        }
    }

    fn extract_module_links(&self, parsed: &ParsedFile, facts: &mut FileFacts) {
        let root = parsed.tree.root_node();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "import_statement" => {
                    if let Some(import) = self.parse_import(parsed, node) {
                        facts.imports.push(import);
                    }
                }
                "export_statement" => self.parse_export(parsed, node, facts),
                _ => {}
            }
        }
    }

    fn parse_import(&self, parsed: &ParsedFile, node: Node) -> Option<Import> {
        let source = unquote(parsed.node_text(node.child_by_field_name("source")?));
        let mut bindings = Vec::new();

        let mut cursor = node.walk();
        for clause in node.named_children(&mut cursor) {
            if clause.kind() != "import_clause" {
                continue;
            }
            let mut clause_cursor = clause.walk();
            for part in clause.named_children(&mut clause_cursor) {
                match part.kind() {
                    "identifier" => bindings.push(ImportBinding {
                        local: parsed.node_text(part).to_string(),
                        imported: ImportedName::Default,
                    }),
                    "namespace_import" => {
                        if let Some(local) = find_child(part, "identifier") {
                            bindings.push(ImportBinding {
                                local: parsed.node_text(local).to_string(),
                                imported: ImportedName::Namespace,
                            });
                        }
                    }
                    "named_imports" => {
                        let mut spec_cursor = part.walk();
                        for spec in part.named_children(&mut spec_cursor) {
                            if spec.kind() != "import_specifier" {
                                continue;
                            }
                            let Some(name) = spec.child_by_field_name("name") else {
                                continue;
                            };
                            let name = unquote(parsed.node_text(name));
                            let local = spec
                                .child_by_field_name("alias")
                                .map(|a| parsed.node_text(a).to_string())
                                .unwrap_or_else(|| name.clone());
                            let imported = if name == "default" {
                                ImportedName::Default
                            } else {
                                ImportedName::Named(name)
                            };
                            bindings.push(ImportBinding { local, imported });
                        }
                    }
                    _ => {}
                }
            }
        }

        Some(Import {
            source,
            bindings,
            span: Span::from_node(node),
        })
    }

    fn parse_export(&self, parsed: &ParsedFile, node: Node, facts: &mut FileFacts) {
        if let Some(source) = node.child_by_field_name("source") {
            let source = unquote(parsed.node_text(source));
            let names = match find_child(node, "export_clause") {
                Some(clause) => Some(self.export_specifiers(parsed, clause)),
                // `export * as ns from` binds a namespace, not individual types.
                None if find_child(node, "namespace_export").is_some() => return,
                None => None,
            };
            facts.re_exports.push(ReExport { source, names });
            return;
        }

        if let Some(clause) = find_child(node, "export_clause") {
            for spec in self.export_specifiers(parsed, clause) {
                if spec.exported_name() == "default" {
                    facts.default_alias = Some(spec.name.clone());
                }
                facts.local_exports.push(spec);
            }
            return;
        }

        if has_child_kind(node, "default") {
            if let Some(value) = node.child_by_field_name("value") {
                if value.kind() == "identifier" {
                    facts.default_alias = Some(parsed.node_text(value).to_string());
                }
            }
        }
    }

    fn export_specifiers(&self, parsed: &ParsedFile, clause: Node) -> Vec<ExportSpecifier> {
        let mut specs = Vec::new();
        let mut cursor = clause.walk();
        for spec in clause.named_children(&mut cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            let Some(name) = spec.child_by_field_name("name") else {
                continue;
            };
            specs.push(ExportSpecifier {
                name: unquote(parsed.node_text(name)),
                alias: spec
                    .child_by_field_name("alias")
                    .map(|a| unquote(parsed.node_text(a))),
            });
        }
        specs
    }
}

impl Default for TypeScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for TypeScriptAnalyzer {
    fn language_id(&self) -> &'static str {
        self.language_id
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile, AnalysisError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::Parse(path.to_path_buf()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn extract_facts(&self, parsed: &ParsedFile) -> Result<FileFacts, AnalysisError> {
        let (declarations, classes) = self.extract_declarations(parsed)?;

        let mut facts = FileFacts {
            classes,
            declarations,
            has_parse_errors: parsed.tree.root_node().has_error(),
            ..FileFacts::empty(&parsed.path, self.language_id())
        };
        self.extract_module_links(parsed, &mut facts);

        // `export { Foo }` makes an earlier local declaration visible.
        let exported: Vec<String> = facts.local_exports.iter().map(|s| s.name.clone()).collect();
        for decl in &mut facts.declarations {
            if exported.contains(&decl.name) {
                decl.exported = true;
            }
        }
        for class in &mut facts.classes {
            if exported.contains(&class.name) {
                class.exported = true;
            }
        }

        Ok(facts)
    }
}

/// `(exported, default_export)` for a top-level declaration, `None` if nested.
fn top_level_context(node: Node) -> Option<(bool, bool)> {
    let mut exported = false;
    let mut default_export = false;
    let mut current = node;
    loop {
        let parent = current.parent()?;
        match parent.kind() {
            "program" => return Some((exported, default_export)),
            "export_statement" => {
                exported = true;
                default_export = has_child_kind(parent, "default");
            }
            "ambient_declaration" => {}
            _ => return None,
        }
        current = parent;
    }
}

fn find_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    find_child(node, kind).is_some()
}

fn has_named_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(|c| c.kind() == kind);
    found
}

/// Strip one pair of matching quotes or backticks.
fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && matches!(first, '\'' | '"' | '`') => {
            chars.as_str().to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Collapse whitespace runs in rendered type text.
fn compact(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_of(source: &str) -> FileFacts {
        let analyzer = TypeScriptAnalyzer::new();
        let parsed = analyzer
            .parse(Path::new("test.ts"), source.as_bytes())
            .unwrap();
        analyzer.extract_facts(&parsed).unwrap()
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'users'"), "users");
        assert_eq!(unquote("\"users\""), "users");
        assert_eq!(unquote("`users`"), "users");
        assert_eq!(unquote("users"), "users");
        assert_eq!(unquote("'"), "'");
    }

    #[test]
    fn test_class_and_method_decorators() {
        let source = r#"
import { Controller, Get, Post, Body } from '@nestjs/common';

@Controller('users')
export class UsersController {
  @Get('list')
  @HttpCode(200)
  list() {
    return [];
  }

  @Post()
  create(@Body() dto: CreateUserDto): Promise<User> {
    return null;
  }

  helper() {}
}
"#;
        let facts = facts_of(source);
        assert_eq!(facts.classes.len(), 1);

        let class = &facts.classes[0];
        assert_eq!(class.name, "UsersController");
        assert!(class.exported);
        assert_eq!(class.decorators.len(), 1);
        assert_eq!(class.decorators[0].name, "Controller");
        assert_eq!(class.decorators[0].first_string_argument(), Some("users"));

        assert_eq!(class.methods.len(), 3);
        let list = &class.methods[0];
        assert_eq!(list.name, "list");
        let names: Vec<_> = list.decorators.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Get", "HttpCode"]);
        // Span starts at the first decorator, not at the method name.
        assert_eq!(list.span.start_line, 6);
        assert_eq!(list.span.end_line, 10);

        let create = &class.methods[1];
        assert_eq!(create.parameters.len(), 1);
        let param = &create.parameters[0];
        assert_eq!(param.name, "dto");
        assert_eq!(param.decorators[0].name, "Body");
        assert_eq!(param.type_expr, Some(TypeExpr::named("CreateUserDto")));
        assert_eq!(
            create.return_type.as_ref().map(|t| t.to_string()),
            Some("Promise<User>".to_string())
        );

        assert!(class.methods[2].decorators.is_empty());
    }

    #[test]
    fn test_property_types() {
        let source = r#"
export class CreateUserDto {
  @IsString()
  name: string;
  tags: string[];
  roles?: Array<Role>;
  address: AddressDto;
  nickname: string | null;
  count = 0;
  label = 'x';
  createdAt = new Date();
  misc;
}
"#;
        let facts = facts_of(source);
        let class = facts.find_class("CreateUserDto").unwrap();
        let props: Vec<_> = class
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.declared_type().to_string()))
            .collect();
        assert_eq!(
            props,
            vec![
                ("name", "string".to_string()),
                ("tags", "string[]".to_string()),
                ("roles", "Array<Role>".to_string()),
                ("address", "AddressDto".to_string()),
                ("nickname", "string | null".to_string()),
                ("count", "number".to_string()),
                ("label", "string".to_string()),
                ("createdAt", "Date".to_string()),
                ("misc", "any".to_string()),
            ]
        );
        assert_eq!(class.properties[0].decorators[0].name, "IsString");
        assert!(class.properties[2].optional);
        assert!(class.properties[2].declared_type().is_array());
    }

    #[test]
    fn test_top_level_declarations() {
        let source = r#"
export enum Role { Admin = 'admin', User = 'user' }
interface Internal { id: number }
export type Id = string;
class Hidden {}
export default class Main {}
function factory() {
  class Nested {}
}
"#;
        let facts = facts_of(source);
        let kinds: Vec<_> = facts
            .declarations
            .iter()
            .map(|d| (d.name.as_str(), d.kind, d.exported))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Role", DeclarationKind::Enum, true),
                ("Internal", DeclarationKind::Interface, false),
                ("Id", DeclarationKind::TypeAlias, true),
                ("Hidden", DeclarationKind::Class, false),
                ("Main", DeclarationKind::Class, true),
            ]
        );
        assert_eq!(facts.default_export_name(), Some("Main"));
        assert!(facts.find_class("Nested").is_none());

        let id = facts.find_declaration("Id").unwrap();
        assert_eq!(id.aliased, Some(TypeExpr::Predefined("string".to_string())));
        assert!(facts.find_declaration("Role").unwrap().aliased.is_none());
    }

    #[test]
    fn test_imports_and_reexports() {
        let source = r#"
import Default, { A, B as C } from './things';
import * as dto from './dto';
import type { T } from "../types";
export * from './barrel';
export { X, Y as Z } from './xy';
export * as ns from './ns';
class Local {}
export { Local as Public };
"#;
        let facts = facts_of(source);
        assert_eq!(facts.imports.len(), 3);

        let (import, binding) = facts.import_binding("C").unwrap();
        assert_eq!(import.source, "./things");
        assert_eq!(binding.imported, ImportedName::Named("B".to_string()));
        assert_eq!(
            facts.import_binding("Default").unwrap().1.imported,
            ImportedName::Default
        );
        assert_eq!(
            facts.import_binding("dto").unwrap().1.imported,
            ImportedName::Namespace
        );
        assert_eq!(facts.import_binding("T").unwrap().0.source, "../types");

        assert_eq!(facts.re_exports.len(), 2);
        assert_eq!(facts.re_exports[0].source, "./barrel");
        assert!(facts.re_exports[0].names.is_none());
        let names = facts.re_exports[1].names.as_ref().unwrap();
        assert_eq!(names[1].exported_name(), "Z");
        assert_eq!(names[1].name, "Y");

        assert_eq!(facts.local_export_target("Public"), Some("Local"));
        assert!(facts.find_class("Local").unwrap().exported);
    }

    #[test]
    fn test_decorator_object_and_non_literal_arguments() {
        let source = r#"
@Controller({ path: 'orders', version: '1' })
export class OrdersController {
  @Get(ROUTES.list)
  list() {}

  @Get(`recent`)
  recent() {}
}
"#;
        let facts = facts_of(source);
        let class = &facts.classes[0];
        assert_eq!(class.decorators[0].first_argument_property("path"), Some("orders"));
        assert_eq!(class.methods[0].decorators[0].first_string_argument(), None);
        assert_eq!(class.methods[1].decorators[0].first_string_argument(), Some("recent"));
    }
}
