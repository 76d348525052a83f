//! Output formatting for osprey results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;
use std::path::Path;

use crate::endpoints::{ControllerGroup, DiscoveryReport, EndpointDescriptor, HttpMethod};
use crate::schema::FieldDescriptor;
use crate::workspace::RequestPreview;

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for the `routes` command.
#[derive(Serialize)]
pub struct JsonRoutesReport<'a> {
    pub version: String,
    pub root: String,
    pub files_scanned: usize,
    pub endpoint_count: usize,
    pub cancelled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
    pub controllers: &'a [ControllerGroup],
}

/// An endpoint together with its request-body fields.
#[derive(Serialize)]
pub struct InspectedEndpoint {
    #[serde(flatten)]
    pub endpoint: EndpointDescriptor,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body_fields: Vec<FieldDescriptor>,
}

/// Write discovery results in JSON format.
pub fn write_routes_json(root: &Path, report: &DiscoveryReport) -> anyhow::Result<()> {
    let json = JsonRoutesReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        root: root.display().to_string(),
        files_scanned: report.scanned,
        endpoint_count: report.endpoint_count(),
        cancelled: report.cancelled,
        failed: report
            .failed
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        controllers: &report.groups,
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub fn write_inspect_json(entries: &[InspectedEndpoint]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

pub fn write_preview_json(preview: &RequestPreview) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(preview)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Verb label padded to a fixed width and colored by verb.
pub fn colored_method(method: HttpMethod) -> ColoredString {
    let label = format!("{:<7}", method.as_str());
    match method {
        HttpMethod::Get => label.green().bold(),
        HttpMethod::Post => label.yellow().bold(),
        HttpMethod::Put => label.blue().bold(),
        HttpMethod::Delete => label.red().bold(),
        HttpMethod::Patch => label.magenta().bold(),
        _ => label.cyan().bold(),
    }
}

/// One line of the route tree: verb, route and handler location.
pub fn format_endpoint_line(endpoint: &EndpointDescriptor) -> String {
    let mut line = format!(
        "{} {}  {}",
        colored_method(endpoint.http_method),
        endpoint.route,
        format!("{}() L{}", endpoint.handler, endpoint.decl_line).dimmed()
    );
    if let Some(table) = &endpoint.table_name {
        line.push_str(&format!("  {}", format!("[table: {}]", table).dimmed()));
    }
    line
}

fn write_header(label: &str, target: &str) {
    println!();
    print!("  ");
    print!("{}", "osprey".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("  {}", format!("{:<10}", label).dimmed());
    println!("{}", target);
    println!();
}

/// Write discovery results in pretty format.
pub fn write_routes_pretty(root: &Path, report: &DiscoveryReport) {
    write_header("Scanning:", &root.display().to_string());

    if report.groups.is_empty() {
        println!("  {}", "No endpoints found".yellow());
        println!();
    }

    for group in &report.groups {
        let relative = group.path.strip_prefix(root).unwrap_or(&group.path);
        println!(
            "  {} {}",
            group.label.bold(),
            format!("({})", relative.display()).dimmed()
        );
        for endpoint in &group.endpoints {
            println!("    {}", format_endpoint_line(endpoint));
        }
        println!();
    }

    for failed in &report.failed {
        println!("  {} {}", "✗ unreadable".red(), failed.display());
    }

    let summary = format!(
        "{} endpoints in {} controllers ({} files scanned)",
        report.endpoint_count(),
        report.groups.len(),
        report.scanned
    );
    if report.cancelled {
        println!("  {} {}", "⚠ cancelled".yellow(), summary);
    } else {
        println!("  {} {}", "✓".green(), summary);
    }
    println!();
}

/// Write the per-file analysis log.
pub fn write_inspect_pretty(path: &Path, entries: &[InspectedEndpoint]) {
    write_header("File:", &path.display().to_string());

    if entries.is_empty() {
        println!("  {}", "No request-handling class found".yellow());
        println!();
        return;
    }

    for entry in entries {
        let endpoint = &entry.endpoint;
        println!("  {}", format_endpoint_line(endpoint));
        println!(
            "    {} {}-{}",
            "lines".dimmed(),
            endpoint.span_start,
            endpoint.span_end
        );
        if !endpoint.path_params.is_empty() {
            println!("    {} {}", "params".dimmed(), endpoint.path_params.join(", "));
        }
        if !endpoint.query_params.is_empty() {
            println!("    {} {}", "query".dimmed(), endpoint.query_params.join(", "));
        }
        if let Some(entity) = &endpoint.entity {
            println!("    {} {}", "returns".dimmed(), entity.class_name);
        }
        if let Some(dto) = &endpoint.request_body {
            println!("    {} {}", "body".dimmed(), dto.class_name.bold());
            for field in &entry.body_fields {
                println!("      {}", format_field(field));
            }
        }
        println!();
    }
}

fn format_field(field: &FieldDescriptor) -> String {
    let ty = if field.is_array {
        format!("{}[]", field.declared_type)
    } else {
        field.declared_type.clone()
    };
    match &field.related_dto {
        Some(dto) => format!(
            "{}: {} {}",
            field.name,
            ty,
            format!("→ {}", dto.class_name).dimmed()
        ),
        None => format!("{}: {}", field.name, ty),
    }
}

/// Write a request preview in pretty format.
pub fn write_preview_pretty(preview: &RequestPreview) {
    println!();
    println!(
        "  {} {}  {}",
        colored_method(preview.method),
        preview.route,
        format!("{}()", preview.handler).dimmed()
    );
    if let Some(table) = &preview.table_name {
        println!("  {} {}", "table".dimmed(), table);
    }
    if !preview.query_params.is_empty() {
        let keys: Vec<&str> = preview.query_params.iter().map(|q| q.key.as_str()).collect();
        println!("  {} {}", "query".dimmed(), keys.join(", "));
    }
    println!();
    match &preview.payload {
        Some(payload) => {
            for line in payload.to_json_pretty().lines() {
                println!("  {}", line);
            }
        }
        None => println!("  {}", "(no request body)".dimmed()),
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> EndpointDescriptor {
        EndpointDescriptor {
            http_method: HttpMethod::Delete,
            route: "/users/:id".to_string(),
            handler: "remove".to_string(),
            request_body: None,
            entity: None,
            table_name: Some("app_users".to_string()),
            path_params: vec!["id".to_string()],
            query_params: Vec::new(),
            decl_line: 42,
            span_start: 42,
            span_end: 45,
        }
    }

    #[test]
    fn test_format_endpoint_line() {
        colored::control::set_override(false);
        let line = format_endpoint_line(&endpoint());
        assert_eq!(line, "DELETE  /users/:id  remove() L42  [table: app_users]");
    }

    #[test]
    fn test_format_field() {
        colored::control::set_override(false);
        let field = FieldDescriptor {
            name: "tags".to_string(),
            declared_type: "string".to_string(),
            is_array: true,
            related_dto: None,
        };
        assert_eq!(format_field(&field), "tags: string[]");
    }

    #[test]
    fn test_inspected_endpoint_json_is_flat() {
        let entry = InspectedEndpoint {
            endpoint: endpoint(),
            body_fields: Vec::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["http_method"], "DELETE");
        assert_eq!(value["route"], "/users/:id");
        assert!(value.get("body_fields").is_none());
    }
}
