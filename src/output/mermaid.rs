//! Mermaid flowchart rendering of the call list.
//!
//! Tree shape is rebuilt from the per-call depth, so the diagram only needs
//! the flat, pre-ordered list from the report.

use super::json::create_parent_dirs;
use super::validate_path;
use crate::parser::schema::{AnalysisReport, CallRecord, CallRole, ValueMap};
use crate::utils::error::OutputError;
use log::info;
use std::path::Path;

/// Longest function name kept in a node label
const MAX_NAME_LEN: usize = 30;

/// Longest parameter/return summary kept in a node label
const MAX_DETAIL_LEN: usize = 40;

const LIFECYCLE_STYLE: &str = "fill:#c8f0c8,stroke:#008000,stroke-width:2px,color:#000";

/// Render the report's call list as a `graph TD` flowchart
pub fn render_mermaid(report: &AnalysisReport) -> String {
    if report.calls.is_empty() {
        return "graph TD\n  A[No trace data available] --> B[No diagram generated]\n".to_string();
    }

    let mut graph = String::from("graph TD\n");
    render_actors(&mut graph, report.detected_hook_address.as_deref());

    let start = "N0".to_string();
    graph.push_str(&format!(
        "  {}(\"Tx Start: {}\")\n",
        start,
        short_address(&report.calls[0].from)
    ));

    // parents[d] is the id of the most recent node at depth d
    let mut parents: Vec<String> = Vec::new();
    let mut lifecycle_nodes = Vec::new();
    let mut last = start.clone();

    for (index, call) in report.calls.iter().enumerate() {
        let id = format!("N{}", index + 1);
        graph.push_str(&format!("  {}{}\n", id, node_shape(call)));

        let parent = call
            .depth
            .checked_sub(1)
            .and_then(|d| parents.get(d))
            .unwrap_or(&start);
        graph.push_str(&format!("  {} --> {}\n", parent, id));

        parents.truncate(call.depth);
        parents.push(id.clone());

        if call.call.is_lifecycle_call {
            lifecycle_nodes.push(id.clone());
        }
        last = id;
    }

    let end = format!("N{}", report.calls.len() + 1);
    graph.push_str(&format!("  {}[Tx End]\n", end));
    graph.push_str(&format!("  {} --> {}\n", last, end));

    graph.push_str("\n  style PM fill:#f9f,stroke:#333,stroke-width:2px\n");
    if report.detected_hook_address.is_some() {
        graph.push_str("  style HO fill:#ccf,stroke:#333,stroke-width:2px\n");
    }
    graph.push_str("  style EXT fill:#fcf,stroke:#333,stroke-width:2px\n");
    for id in lifecycle_nodes {
        graph.push_str(&format!("  style {} {}\n", id, LIFECYCLE_STYLE));
    }

    graph
}

/// Write a rendered diagram to disk
pub fn write_diagram(diagram: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    validate_path(output_path)?;
    create_parent_dirs(output_path)?;
    std::fs::write(output_path, diagram)?;
    info!("Diagram written to: {}", output_path.display());
    Ok(())
}

fn render_actors(graph: &mut String, hook: Option<&str>) {
    graph.push_str("  subgraph Actors\n");
    graph.push_str("    PM[PoolManager]\n");
    if let Some(hook) = hook {
        graph.push_str(&format!("    HO[Hook: {}]\n", short_address(hook)));
    }
    graph.push_str("    EXT[External Account]\n");
    graph.push_str("  end\n\n");
}

fn node_shape(call: &CallRecord) -> String {
    let mut label = sanitize(&call.call.function_name, MAX_NAME_LEN);

    let details: Vec<String> = [("P", &call.call.arguments), ("R", &call.call.returns)]
        .into_iter()
        .filter_map(|(tag, values)| summarize(values).map(|s| format!("{}: {}", tag, s)))
        .collect();
    if !details.is_empty() {
        label.push_str("<br>");
        label.push_str(&details.join("<br>"));
    }

    if call.call.is_lifecycle_call {
        return format!("{{{{\"{}\"}}}}", label);
    }
    match call.call.role {
        CallRole::Manager => format!("(\"{}\")", label),
        CallRole::Hook => format!("{{\"{}\"}}", label),
        CallRole::External => format!("[\"{}\"]", label),
    }
}

fn summarize(values: &ValueMap) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let text = serde_json::Value::Object(values.clone()).to_string();
    Some(sanitize(&text, MAX_DETAIL_LEN)).filter(|s| !s.is_empty())
}

/// Reduce text to characters that are safe inside a Mermaid label and cap its length
pub fn sanitize(text: &str, max_len: usize) -> String {
    let kept: String = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | ':' | '.' | ',' | '-'))
        .collect();

    let kept = kept.trim();
    if kept.chars().count() > max_len {
        let truncated: String = kept.chars().take(max_len).collect();
        format!("{}...", truncated.trim_end())
    } else {
        kept.to_string()
    }
}

fn short_address(address: &str) -> String {
    match address.get(..8) {
        Some(prefix) => format!("{}...", prefix),
        None => address.to_string(),
    }
}
