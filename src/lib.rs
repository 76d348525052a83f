//! Osprey - static endpoint and DTO analysis for TypeScript controllers.
//!
//! Osprey reads decorator-annotated controller classes (NestJS style) without
//! executing them and builds a queryable model of every request handler:
//! its HTTP verb, route, source span, path and query parameters, request-body
//! DTO and response entity. From a DTO it derives typed field descriptors and
//! a synthetic example payload.
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter facts, source units and symbol resolution
//! - `endpoints`: controller selection, extraction, caching and discovery
//! - `schema`: DTO field resolution and entity table binding
//! - `payload`: example payload synthesis
//! - `workspace`: session, cache and configuration tied together
//! - `config`: YAML configuration
//! - `report`: Output formatting (pretty, JSON)

pub mod analysis;
pub mod cli;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod payload;
pub mod report;
pub mod schema;
pub mod workspace;

pub use analysis::{register_analyzers, AnalysisSession, FileFacts, LanguageAnalyzer, SourceUnit};
pub use config::Config;
pub use endpoints::{EndpointCache, EndpointDescriptor, EndpointExtractor, FileEvent, HttpMethod};
pub use error::AnalysisError;
pub use payload::{PayloadNode, PayloadSynthesizer};
pub use schema::{DtoRef, EntityRef, FieldDescriptor, SchemaResolver, TableBindingResolver};
pub use workspace::{RequestPreview, Workspace};
