//! Trace command implementation.
//!
//! The trace command:
//! 1. Builds the analyzer configuration (file + CLI overrides)
//! 2. Fetches and analyzes the transaction
//! 3. Writes the requested output files
//! 4. Prints the text report

use super::models::TraceArgs;
use crate::analyzer::{validate_tx_hash, TraceAnalyzer};
use crate::output::{render_mermaid, render_text_report, write_diagram, write_report};
use crate::parser::schema::AnalysisReport;
use crate::utils::config::{load_config, AnalyzerConfig};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the trace command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid configuration file or ABI files
/// * RPC connection failures
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = TraceArgs {
///     transaction_hash: "0xabc123...".to_string(),
///     output_json: Some(PathBuf::from("report.json")),
///     ..Default::default()
/// };
///
/// execute_trace(args)?;
/// ```
pub fn execute_trace(args: TraceArgs) -> Result<AnalysisReport> {
    let start_time = Instant::now();

    info!("Starting analysis for transaction: {}", args.transaction_hash);

    // Step 1: Configuration
    info!("Step 1/4: Loading configuration...");
    let config = build_config(&args)?;
    debug!("Analyzer configuration: {:?}", config);

    // Step 2: Analysis
    info!("Step 2/4: Fetching and analyzing trace...");
    let analyzer =
        TraceAnalyzer::from_config(config).context("Failed to set up the analyzer")?;
    info!("RPC endpoint: {}", analyzer.config().rpc_url);
    let report = analyzer
        .analyze(&args.transaction_hash)
        .context(format!(
            "Failed to analyze transaction {}",
            args.transaction_hash
        ))?;

    info!(
        "Decoded {} calls, hook: {}",
        report.calls.len(),
        report.detected_hook_address.as_deref().unwrap_or("none")
    );

    // Step 3: Outputs
    info!("Step 3/4: Writing output files...");
    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }
    if let Some(path) = &args.output_diagram {
        write_diagram(&render_mermaid(&report), path).context("Failed to write diagram")?;
        info!("✓ Diagram written to: {}", path.display());
    }

    // Step 4: Report
    if args.quiet {
        info!("Step 4/4: Skipping text report (quiet)");
    } else {
        info!("Step 4/4: Rendering report...");
        println!("{}", render_text_report(&report));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Build the analyzer configuration: defaults, then the config file, then CLI overrides
///
/// **Public** - exposed for testing the override order
pub fn build_config(args: &TraceArgs) -> Result<AnalyzerConfig> {
    let mut config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    if let Some(rpc_url) = &args.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(url) = &args.explorer_url {
        config.explorer.api_url = url.clone();
    }
    if let Some(key) = &args.explorer_key {
        config.explorer.api_key = Some(key.clone());
    }
    if args.offline {
        config.explorer.enabled = false;
    }

    Ok(config)
}

/// Validate trace arguments
///
/// **Public** - can be called before execute_trace for early validation
pub fn validate_args(args: &TraceArgs) -> Result<()> {
    if args.transaction_hash.is_empty() {
        anyhow::bail!("Transaction hash cannot be empty");
    }

    validate_tx_hash(&args.transaction_hash)
        .context("Transaction hash must be 0x followed by 64 hex characters")?;

    if let Some(rpc_url) = &args.rpc_url {
        validate_url("RPC URL", rpc_url)?;
    }
    if let Some(url) = &args.explorer_url {
        validate_url("Explorer URL", url)?;
    }

    if let Some(path) = &args.config_path {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }

    Ok(())
}

fn validate_url(label: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", label);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TX: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

    #[test]
    fn test_validate_args_valid() {
        let args = TraceArgs {
            transaction_hash: TX.to_string(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_invalid_rpc_scheme() {
        let args = TraceArgs {
            rpc_url: Some("ftp://localhost:8545".to_string()),
            transaction_hash: TX.to_string(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_tx_hash_without_prefix() {
        let args = TraceArgs {
            transaction_hash: TX[2..].to_string(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_offline_disables_explorer() {
        let args = TraceArgs {
            transaction_hash: TX.to_string(),
            offline: true,
            rpc_url: Some("http://node:8545".to_string()),
            ..Default::default()
        };

        let config = build_config(&args).unwrap();
        assert!(!config.explorer.enabled);
        assert_eq!(config.rpc_url, "http://node:8545");
    }
}
