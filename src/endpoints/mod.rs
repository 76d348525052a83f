//! Endpoint model: descriptors extracted from request-handling classes.
//!
//! - `extract`: builds descriptors from a controller source unit
//! - `selection`: picks the request-handling class in a file
//! - `cache`: per-file descriptor memoization
//! - `discovery`: workspace-wide controller scan

pub mod cache;
pub mod discovery;
pub mod extract;
pub mod selection;

pub use cache::{EndpointCache, FileEvent};
pub use discovery::{
    controller_label, discover, find_controller_files, CancellationFlag, ControllerFiles,
    ControllerGroup, DiscoveryReport,
};
pub use extract::EndpointExtractor;
pub use selection::{select_controller, SelectionStrategy, SELECTION_STRATEGIES};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::schema::{DtoRef, EntityRef};

static REPEATED_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"/+").unwrap());

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    All,
}

impl HttpMethod {
    /// The verb named by a method annotation (`Get`, `Post`, ...).
    pub fn from_decorator(name: &str) -> Option<Self> {
        match name {
            "Get" => Some(HttpMethod::Get),
            "Post" => Some(HttpMethod::Post),
            "Put" => Some(HttpMethod::Put),
            "Delete" => Some(HttpMethod::Delete),
            "Patch" => Some(HttpMethod::Patch),
            "Options" => Some(HttpMethod::Options),
            "Head" => Some(HttpMethod::Head),
            "All" => Some(HttpMethod::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::All => "ALL",
        }
    }

    /// Whether requests with this verb carry a body.
    pub fn expects_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One request-handling method of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    pub http_method: HttpMethod,
    /// Normalized route, always starting with `/`.
    pub route: String,
    /// Name of the handler method.
    pub handler: String,
    pub request_body: Option<DtoRef>,
    pub entity: Option<EntityRef>,
    pub table_name: Option<String>,
    pub path_params: Vec<String>,
    pub query_params: Vec<String>,
    /// Line of the verb annotation (1-indexed).
    pub decl_line: usize,
    /// First line of the method, decorators included.
    pub span_start: usize,
    pub span_end: usize,
}

impl EndpointDescriptor {
    /// Whether `line` falls inside the method.
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.span_start && line <= self.span_end
    }

    /// Whether a cursor on `line` selects this endpoint.
    ///
    /// Matches within one line of the verb annotation or anywhere in the method.
    pub fn matches_cursor(&self, line: usize) -> bool {
        line.abs_diff(self.decl_line) <= 1 || self.contains_line(line)
    }
}

/// Collapse repeated slashes, drop one trailing slash, keep `/` for the root.
pub fn normalize_route(route: &str) -> String {
    let collapsed = REPEATED_SLASHES.replace_all(route, "/");
    let mut normalized = if collapsed.starts_with('/') {
        collapsed.into_owned()
    } else {
        format!("/{}", collapsed)
    };
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Full route for a controller base and a method sub-route.
pub fn join_route(base: &str, sub: &str) -> String {
    normalize_route(&format!("/{}/{}", base, sub))
}
