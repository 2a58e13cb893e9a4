//! Hook Trace Inspector CLI
//!
//! Decodes the call tree of a transaction, detects the hook contract involved
//! and reports the hook's permissions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use hook_trace_inspector::commands::{
    display_permissions, display_version, execute_trace, validate_args, validate_report_file,
    TraceArgs,
};

/// Hook Trace Inspector - call trace decoding for Uniswap v4 hooks
#[derive(Parser, Debug)]
#[command(name = "hook-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a transaction's call trace
    Trace {
        /// Transaction hash to analyze
        #[arg(short, long)]
        tx: String,

        /// RPC endpoint URL (overrides the config file)
        #[arg(short, long)]
        rpc: Option<String>,

        /// TOML analyzer configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for a Mermaid call flow diagram
        #[arg(short, long)]
        diagram: Option<PathBuf>,

        /// Explorer API URL for ABI lookups (overrides the config file)
        #[arg(long)]
        explorer_url: Option<String>,

        /// Explorer API key
        #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
        explorer_key: Option<String>,

        /// Disable remote ABI lookups
        #[arg(long)]
        offline: bool,

        /// Do not print the text report
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the permissions encoded in a hook address
    Permissions {
        /// Hook address (0x + 40 hex characters)
        #[arg(short, long)]
        address: String,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Trace {
            tx,
            rpc,
            config,
            output,
            diagram,
            explorer_url,
            explorer_key,
            offline,
            quiet,
        } => {
            let args = TraceArgs {
                rpc_url: rpc,
                transaction_hash: tx,
                config_path: config,
                output_json: output,
                output_diagram: diagram,
                explorer_url,
                explorer_key,
                offline,
                quiet,
            };

            // Validate args first
            validate_args(&args)?;

            execute_trace(args)?;
        }

        Commands::Permissions { address } => {
            display_permissions(&address)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
