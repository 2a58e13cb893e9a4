//! Terminal rendering of analysis reports.

use crate::abi::value::display_value;
use crate::parser::schema::{AnalysisReport, CallRecord, CallRole, ValueMap};
use colored::*;

const SEPARATOR: &str = "---------------------------------------------------";

/// Render a human-readable report for the terminal
pub fn render_text_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_hook(report));
    out.push_str(&render_trace(report));
    out.push_str(&format!("\n{}\n", "--- End ---".bold()));

    out
}

fn render_header(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(
        &format!("Hook Trace Report: {}", report.transaction_hash)
            .bold()
            .to_string(),
    );
    out.push_str(&format!("\n{}\n", SEPARATOR));
    out.push_str(&format!("Success: {}\n", report.success));
    out.push_str(&format!(
        "Calls:   {} ({} hook lifecycle)\n",
        report.calls.len(),
        report.lifecycle_call_count()
    ));
    out
}

fn render_hook(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let Some(hook) = report.detected_hook_address.as_deref() else {
        out.push_str("\nNo hook address detected in this trace.\n");
        return out;
    };

    out.push_str(&format!("\nDetected Hook Address: {}\n", hook.cyan()));
    out.push_str("Hook Permissions:\n");
    for (name, granted) in report.hook_permissions.iter() {
        let status = if granted {
            "✅ GRANTED".green()
        } else {
            "❌ NOT GRANTED".red()
        };
        out.push_str(&format!("  - {}: {}\n", name, status));
    }
    out
}

fn render_trace(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "--- Call Trace ---".bold()));

    if report.calls.is_empty() {
        out.push_str("No call trace available.\n");
        return out;
    }

    for call in &report.calls {
        out.push_str(&render_call(call));
    }
    out
}

fn render_call(call: &CallRecord) -> String {
    let indent = "  ".repeat(call.depth);
    let mut out = String::new();

    out.push_str(&format!(
        "{}[{}] From: {} -> To: {}\n",
        indent,
        call.kind,
        call.from,
        call.to.as_deref().unwrap_or("(none)")
    ));

    let name = if call.call.is_lifecycle_call {
        call.call.function_name.yellow().bold()
    } else {
        call.call.function_name.normal()
    };
    out.push_str(&format!(
        "{}  Function: {} (Role: {})\n",
        indent,
        name,
        role_label(call.call.role)
    ));

    if call.value_wei != "0" {
        out.push_str(&format!("{}  Value: {} ETH\n", indent, call.value_eth));
    }
    out.push_str(&format!("{}  Gas Used: {}\n", indent, call.gas_used));

    if let Some(error) = &call.error {
        out.push_str(&format!("{}  Error: {}\n", indent, error.red()));
    }

    out.push_str(&render_values(&indent, "Parameters", &call.call.arguments));
    out.push_str(&render_values(&indent, "Returns", &call.call.returns));
    out.push_str(&format!("{}  {}\n", indent, "-".repeat(20)));
    out
}

fn render_values(indent: &str, title: &str, values: &ValueMap) -> String {
    if values.is_empty() {
        return String::new();
    }

    let mut out = format!("{}  {}:\n", indent, title);
    for (key, value) in values {
        out.push_str(&format!("{}    {}: {}\n", indent, key, display_value(value)));
    }
    out
}

fn role_label(role: CallRole) -> ColoredString {
    match role {
        CallRole::Manager => role.to_string().magenta(),
        CallRole::Hook => role.to_string().blue(),
        CallRole::External => role.to_string().normal(),
    }
}
