use crate::analyzer::permissions::{decode_permissions, PermissionMap};
use crate::output::read_report;
use crate::utils::config::{ADDRESS_HEX_LENGTH, SCHEMA_VERSION};
use anyhow::Result;
use colored::*;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Transaction: {}", report.transaction_hash);
    println!("  Calls: {}", report.calls.len());
    println!("  Lifecycle Calls: {}", report.lifecycle_call_count());
    println!(
        "  Hook: {}",
        report.detected_hook_address.as_deref().unwrap_or("none")
    );
    println!(
        "  Permissions Granted: {}",
        report.hook_permissions.granted_count()
    );

    Ok(())
}

/// Decode and print the permission bits of a hook address, without any I/O
pub fn display_permissions(address: &str) -> Result<PermissionMap> {
    let trimmed = address.trim();
    let well_formed = trimmed.len() == ADDRESS_HEX_LENGTH
        && trimmed
            .strip_prefix("0x")
            .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()));
    if !well_formed {
        anyhow::bail!("Address must be 0x followed by 40 hex characters");
    }

    let permissions = decode_permissions(Some(trimmed));

    println!("Hook Permissions for {}", trimmed);
    for (name, granted) in permissions.iter() {
        let status = if granted {
            "GRANTED".green()
        } else {
            "NOT GRANTED".red()
        };
        println!("  {:<22} {}", name, status);
    }

    Ok(permissions)
}

/// Display version information
pub fn display_version() {
    println!("Hook Trace Inspector v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call-trace decoding and hook permission analysis for Uniswap v4 style pools.");
}
