use std::path::PathBuf;

/// Arguments for the trace command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct TraceArgs {
    /// RPC endpoint URL; overrides the config file when set
    pub rpc_url: Option<String>,

    /// Transaction hash to analyze
    pub transaction_hash: String,

    /// Optional TOML analyzer configuration
    pub config_path: Option<PathBuf>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for the Mermaid diagram (optional)
    pub output_diagram: Option<PathBuf>,

    /// Explorer API URL; overrides the config file when set
    pub explorer_url: Option<String>,

    /// Explorer API key; overrides the config file when set
    pub explorer_key: Option<String>,

    /// Never look up ABIs remotely
    pub offline: bool,

    /// Skip printing the text report
    pub quiet: bool,
}
