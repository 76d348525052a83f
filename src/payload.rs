//! Example payload synthesis from DTO field descriptors.
//!
//! Nested DTOs are expanded up to a fixed depth so mutually referencing
//! DTOs still produce a finite value.

use chrono::{SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::schema::{DtoRef, FieldDescriptor, SchemaResolver};

/// Default deepest nesting level that is still expanded.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// An example value.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadNode {
    Null,
    String(String),
    Number(i64),
    Bool(bool),
    /// Fields in declaration order.
    Object(Vec<(String, PayloadNode)>),
    Array(Vec<PayloadNode>),
}

impl PayloadNode {
    pub fn empty_object() -> Self {
        PayloadNode::Object(Vec::new())
    }

    /// Wrap in a one-element array.
    pub fn into_array(self) -> Self {
        PayloadNode::Array(vec![self])
    }

    /// Set a field on an object, replacing an existing one in place.
    pub fn insert(&mut self, key: impl Into<String>, value: PayloadNode) {
        if let PayloadNode::Object(fields) = self {
            let key = key.into();
            match fields.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => *existing = value,
                None => fields.push((key, value)),
            }
        }
    }

    /// Field of an object by name.
    pub fn get(&self, key: &str) -> Option<&PayloadNode> {
        match self {
            PayloadNode::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// JSON with 2-space indentation.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for PayloadNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PayloadNode::Null => serializer.serialize_unit(),
            PayloadNode::String(value) => serializer.serialize_str(value),
            PayloadNode::Number(value) => serializer.serialize_i64(*value),
            PayloadNode::Bool(value) => serializer.serialize_bool(*value),
            PayloadNode::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            PayloadNode::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Maps a lower-cased type text to a stand-in value.
#[derive(Clone, Copy)]
pub struct PrimitiveRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub value: fn() -> PayloadNode,
}

/// Ordered stand-in rules; the first match wins, no match gives `null`.
#[derive(Clone)]
pub struct PrimitiveTable {
    rules: Vec<PrimitiveRule>,
}

impl PrimitiveTable {
    pub fn new(rules: Vec<PrimitiveRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PrimitiveRule] {
        &self.rules
    }

    /// Stand-in value for a type text.
    pub fn value_for(&self, type_text: &str) -> PayloadNode {
        let lowered = type_text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| (rule.matches)(&lowered))
            .map(|rule| (rule.value)())
            .unwrap_or(PayloadNode::Null)
    }
}

impl Default for PrimitiveTable {
    fn default() -> Self {
        Self::new(vec![
            PrimitiveRule {
                name: "string",
                matches: |t| t.contains("string"),
                value: || PayloadNode::String("string".to_string()),
            },
            PrimitiveRule {
                name: "number",
                matches: |t| t.contains("number") || t.contains("int"),
                value: || PayloadNode::Number(0),
            },
            PrimitiveRule {
                name: "boolean",
                matches: |t| t.contains("boolean"),
                value: || PayloadNode::Bool(true),
            },
            PrimitiveRule {
                name: "date",
                matches: |t| t.contains("date"),
                value: || PayloadNode::String(current_timestamp()),
            },
        ])
    }
}

/// Current instant as RFC 3339 UTC with milliseconds.
fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Builds example payloads from field descriptors.
#[derive(Clone)]
pub struct PayloadSynthesizer {
    table: PrimitiveTable,
    max_depth: usize,
}

impl PayloadSynthesizer {
    pub fn new() -> Self {
        Self {
            table: PrimitiveTable::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_table(mut self, table: PrimitiveTable) -> Self {
        self.table = table;
        self
    }

    /// Object payload for `fields` at nesting level `depth`.
    ///
    /// Levels deeper than the maximum become `{}`. Never fails: nested DTOs
    /// that cannot be read become `{}` (or `[{}]` for arrays).
    pub fn synthesize(
        &self,
        fields: &[FieldDescriptor],
        resolver: &SchemaResolver,
        depth: usize,
    ) -> PayloadNode {
        if depth > self.max_depth {
            return PayloadNode::empty_object();
        }

        let mut payload = PayloadNode::empty_object();
        for field in fields {
            let value = match &field.related_dto {
                Some(dto) => match resolver.try_resolve(dto) {
                    Ok(nested) => self.synthesize(&nested, resolver, depth + 1),
                    Err(e) => {
                        tracing::warn!(error = %e, field = %field.name, "cannot expand nested DTO");
                        PayloadNode::empty_object()
                    }
                },
                None => self.table.value_for(&field.declared_type),
            };
            let value = if field.is_array { value.into_array() } else { value };
            payload.insert(field.name.clone(), value);
        }
        payload
    }

    /// Payload for a DTO, starting at depth 0.
    pub fn synthesize_for(&self, dto: &DtoRef, resolver: &SchemaResolver) -> PayloadNode {
        let fields = resolver.resolve(dto);
        self.synthesize(&fields, resolver, 0)
    }
}

impl Default for PayloadSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisSession;

    fn field(name: &str, ty: &str, is_array: bool) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            declared_type: ty.to_string(),
            is_array,
            related_dto: None,
        }
    }

    fn depth_of(node: &PayloadNode) -> usize {
        match node {
            PayloadNode::Object(fields) => {
                1 + fields.iter().map(|(_, v)| depth_of(v)).max().unwrap_or(0)
            }
            PayloadNode::Array(items) => items.iter().map(depth_of).max().unwrap_or(0),
            _ => 0,
        }
    }

    #[test]
    fn test_primitive_fields() {
        let session = AnalysisSession::new();
        let resolver = SchemaResolver::new(&session);
        let payload = PayloadSynthesizer::new().synthesize(
            &[
                field("name", "string", false),
                field("tags", "string", true),
                field("age", "number", false),
                field("count", "BigInt", false),
                field("active", "boolean", false),
                field("role", "Role", false),
            ],
            &resolver,
            0,
        );

        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"name":"string","tags":["string"],"age":0,"count":0,"active":true,"role":null}"#
        );
    }

    #[test]
    fn test_primitive_alias_fields() {
        let session = AnalysisSession::new();
        session.set_buffer(
            "/ws/types.ts",
            "export type Id = string;\nexport type Count = number;\n",
        );
        session.set_buffer(
            "/ws/a.dto.ts",
            "import { Id, Count } from './types';\ntype Local = boolean;\nexport class ADto { id: Id; n: Count; flag: Local; }\n",
        );
        let resolver = SchemaResolver::new(&session);
        let payload =
            PayloadSynthesizer::new().synthesize_for(&DtoRef::new("/ws/a.dto.ts", "ADto"), &resolver);

        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"id":"string","n":0,"flag":true}"#
        );
    }

    #[test]
    fn test_date_stand_in() {
        let table = PrimitiveTable::default();
        match table.value_for("Date") {
            PayloadNode::String(value) => {
                assert!(value.ends_with('Z'));
                assert!(chrono::DateTime::parse_from_rfc3339(&value).is_ok());
                assert_eq!(value.len(), "2026-10-18T09:30:00.000Z".len());
            }
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_table() {
        let table = PrimitiveTable::new(vec![PrimitiveRule {
            name: "uuid",
            matches: |t| t.contains("uuid"),
            value: || PayloadNode::String("00000000-0000-0000-0000-000000000000".to_string()),
        }]);
        assert_eq!(table.rules()[0].name, "uuid");
        assert_eq!(table.value_for("string"), PayloadNode::Null);
        assert!(matches!(table.value_for("Uuid"), PayloadNode::String(_)));
    }

    #[test]
    fn test_depth_limit() {
        let session = AnalysisSession::new();
        let resolver = SchemaResolver::new(&session);
        let synth = PayloadSynthesizer::new();
        let fields = [field("name", "string", false)];

        assert_eq!(synth.synthesize(&fields, &resolver, 4), PayloadNode::empty_object());
        assert_eq!(
            synth.synthesize(&fields, &resolver, 3).get("name"),
            Some(&PayloadNode::String("string".to_string()))
        );
    }

    #[test]
    fn test_mutual_references_terminate() {
        let session = AnalysisSession::new();
        session.set_buffer(
            "/ws/a.dto.ts",
            "import { BDto } from './b.dto';\nexport class ADto { id: number; b: BDto; }",
        );
        session.set_buffer(
            "/ws/b.dto.ts",
            "import { ADto } from './a.dto';\nexport class BDto { name: string; a: ADto; list: ADto[]; }",
        );
        let resolver = SchemaResolver::new(&session);
        let payload = PayloadSynthesizer::new()
            .synthesize_for(&DtoRef::new("/ws/a.dto.ts", "ADto"), &resolver);

        // Levels 0..=3 are expanded, level 4 is the empty object.
        assert_eq!(depth_of(&payload), 5);
        let b = payload.get("b").unwrap();
        assert_eq!(b.get("name"), Some(&PayloadNode::String("string".to_string())));
        assert!(matches!(b.get("list"), Some(PayloadNode::Array(items)) if items.len() == 1));
    }

    #[test]
    fn test_missing_nested_dto_degrades() {
        let session = AnalysisSession::new();
        let resolver = SchemaResolver::new(&session);
        let mut nested = field("address", "AddressDto", true);
        nested.related_dto = Some(DtoRef::new("/ws/missing.dto.ts", "AddressDto"));

        let payload = PayloadSynthesizer::new().synthesize(&[nested], &resolver, 0);
        assert_eq!(payload.to_json_pretty(), "{\n  \"address\": [\n    {}\n  ]\n}");
    }
}
