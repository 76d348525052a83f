//! Fact structures extracted from a TypeScript source file.

use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        Self::covering(node, node)
    }

    /// Span running from the start of `first` to the end of `last`.
    pub fn covering(first: tree_sitter::Node, last: tree_sitter::Node) -> Self {
        let start = first.start_position();
        let end = last.end_position();
        Self {
            start_byte: first.start_byte(),
            end_byte: last.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// Whether a 1-indexed line falls inside this span.
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A type annotation, reduced to the shapes DTO analysis cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// Keyword type: `string`, `number`, `boolean`, `any`, `unknown`, ...
    Predefined(String),
    /// Named type, possibly qualified (`dto.User`) or generic (`Array<User>`).
    Reference { name: String, args: Vec<TypeExpr> },
    /// `T[]`
    Array(Box<TypeExpr>),
    /// `A | B`
    Union(Vec<TypeExpr>),
    /// `'admin'`, `42`, `null`
    Literal(String),
    /// Anything else (object literals, tuples, function types), kept as text.
    Other(String),
}

impl TypeExpr {
    /// Named reference without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// `T[]` or `Array<T>`.
    pub fn is_array(&self) -> bool {
        self.element_type().is_some()
    }

    /// Element type of an array type.
    pub fn element_type(&self) -> Option<&TypeExpr> {
        match self {
            TypeExpr::Array(inner) => Some(inner),
            TypeExpr::Reference { name, args } if name == "Array" && args.len() == 1 => {
                args.first()
            }
            _ => None,
        }
    }

    /// The element type for arrays, the type itself otherwise.
    pub fn base_type(&self) -> &TypeExpr {
        self.element_type().unwrap_or(self)
    }

    /// Name of a referenced type, if this is a named reference.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Reference { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Unwrap `Wrapper<T>` when the reference name is one of `wrappers`.
    pub fn unwrap_generic(&self, wrappers: &[&str]) -> &TypeExpr {
        match self {
            TypeExpr::Reference { name, args }
                if args.len() == 1 && wrappers.contains(&name.as_str()) =>
            {
                &args[0]
            }
            _ => self,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Predefined(text) | TypeExpr::Literal(text) | TypeExpr::Other(text) => {
                write!(f, "{}", text)
            }
            TypeExpr::Reference { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    write!(f, "<{}>", rendered.join(", "))?;
                }
                Ok(())
            }
            TypeExpr::Array(inner) => match inner.as_ref() {
                TypeExpr::Union(_) => write!(f, "({})[]", inner),
                _ => write!(f, "{}[]", inner),
            },
            TypeExpr::Union(members) => {
                let rendered: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", rendered.join(" | "))
            }
        }
    }
}

/// A decorator argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// String literal, quotes stripped.
    Str(String),
    /// Object literal: `{ path: 'users' }`.
    Object(Vec<(String, Argument)>),
    /// Any other expression, kept as source text.
    Other(String),
}

/// A decorator applied to a class, member or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorator {
    /// Decorator name without `@` or namespace qualifier.
    pub name: String,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

impl Decorator {
    /// The first argument, when it is a string literal.
    pub fn first_string_argument(&self) -> Option<&str> {
        match self.arguments.first() {
            Some(Argument::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// A string-valued property of an object-literal first argument.
    pub fn first_argument_property(&self, key: &str) -> Option<&str> {
        match self.arguments.first() {
            Some(Argument::Object(pairs)) => pairs.iter().find_map(|(k, v)| match v {
                Argument::Str(value) if k == key => Some(value.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }
}

/// Anything that carries decorators.
pub trait Decorated {
    fn decorators(&self) -> &[Decorator];

    /// First decorator with the given name.
    fn decorator(&self, name: &str) -> Option<&Decorator> {
        self.decorators().iter().find(|d| d.name == name)
    }

    fn has_decorator(&self, name: &str) -> bool {
        self.decorator(name).is_some()
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDecl {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub type_expr: Option<TypeExpr>,
}

/// A class property (`name: string;`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: String,
    pub decorators: Vec<Decorator>,
    /// The annotated type, or the type of a literal initializer.
    pub type_expr: Option<TypeExpr>,
    pub optional: bool,
    pub span: Span,
}

impl PropertyDecl {
    /// Declared type, `any` when neither annotated nor inferable.
    pub fn declared_type(&self) -> TypeExpr {
        self.type_expr
            .clone()
            .unwrap_or_else(|| TypeExpr::Predefined("any".to_string()))
    }
}

/// A class method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub parameters: Vec<ParameterDecl>,
    pub return_type: Option<TypeExpr>,
    /// Covers the method including its leading decorators.
    pub span: Span,
}

/// A top-level class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub exported: bool,
    pub default_export: bool,
    pub decorators: Vec<Decorator>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

impl Decorated for ClassDecl {
    fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

impl Decorated for MethodDecl {
    fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

impl Decorated for ParameterDecl {
    fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

impl Decorated for PropertyDecl {
    fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }
}

/// Kind of top-level type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Interface,
    Enum,
    TypeAlias,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Enum => "enum",
            DeclarationKind::TypeAlias => "type",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named top-level type declaration (class, interface, enum or alias).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub exported: bool,
    pub default_export: bool,
    /// Right-hand side of a type alias.
    pub aliased: Option<TypeExpr>,
    pub span: Span,
}

/// What an import binding refers to in the source module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Named(String),
    Default,
    Namespace,
}

/// One local name bound by an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    pub imported: ImportedName,
}

/// An `import ... from '<source>'` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Module specifier, quotes stripped.
    pub source: String,
    pub bindings: Vec<ImportBinding>,
    pub span: Span,
}

/// `name` or `name as alias` inside an export clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifier {
    pub name: String,
    pub alias: Option<String>,
}

impl ExportSpecifier {
    /// The name other modules import.
    pub fn exported_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// `export { A } from './a'` or `export * from './a'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReExport {
    pub source: String,
    /// `None` for `export *`.
    pub names: Option<Vec<ExportSpecifier>>,
}

/// All facts extracted from a single file.
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    /// File path.
    pub path: String,
    /// Language identifier.
    pub language: String,
    /// Top-level classes in source order.
    pub classes: Vec<ClassDecl>,
    /// Every named top-level type declaration, classes included.
    pub declarations: Vec<Declaration>,
    pub imports: Vec<Import>,
    pub re_exports: Vec<ReExport>,
    /// `export { A as B };` without a source module.
    pub local_exports: Vec<ExportSpecifier>,
    /// Identifier of `export default Foo;`.
    pub default_alias: Option<String>,
    /// Whether the file had parse errors.
    pub has_parse_errors: bool,
}

impl FileFacts {
    /// Create empty facts for a file.
    pub fn empty(path: &str, language: &str) -> Self {
        Self {
            path: path.to_string(),
            language: language.to_string(),
            ..Default::default()
        }
    }

    /// Find a top-level class by name.
    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Find a top-level type declaration by name.
    pub fn find_declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Local name of the default export, if any.
    pub fn default_export_name(&self) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.default_export && !d.name.is_empty())
            .map(|d| d.name.as_str())
            .or(self.default_alias.as_deref())
    }

    /// Local name behind `export { local as exported }`.
    pub fn local_export_target(&self, exported: &str) -> Option<&str> {
        self.local_exports
            .iter()
            .find(|s| s.exported_name() == exported)
            .map(|s| s.name.as_str())
    }

    /// The import statement and binding that introduce a local name.
    pub fn import_binding(&self, local: &str) -> Option<(&Import, &ImportBinding)> {
        self.imports.iter().find_map(|import| {
            import
                .bindings
                .iter()
                .find(|b| b.local == local)
                .map(|b| (import, b))
        })
    }
}
