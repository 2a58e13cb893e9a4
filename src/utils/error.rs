//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Only [`AnalyzeError`] ever fails an analysis. Schema lookup and decode errors
//! are absorbed where they happen and show up as degraded call records.

use thiserror::Error;

/// Errors that can occur during RPC communication
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("debug_traceTransaction is not supported by this RPC endpoint")]
    TracerNotSupported,

    #[error("Malformed call trace: {0}")]
    MalformedTrace(#[from] ParseError),
}

/// Errors that can occur while converting a raw trace into a call tree
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),

    #[error("Call tree deeper than {0} frames")]
    TooDeep(usize),
}

/// Errors from the remote ABI lookup. Never fatal to an analysis.
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Explorer returned HTTP {0}")]
    BadStatus(u16),

    #[error("No ABI published: {0}")]
    NotFound(String),

    #[error("ABI JSON is invalid: {0}")]
    InvalidAbi(#[from] serde_json::Error),
}

/// Errors from decoding one call's payload. Never fatal to an analysis.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Input shorter than a function selector")]
    MissingSelector,

    #[error("No function in schema matches selector {0}")]
    UnknownSelector(String),

    #[error("ABI decoding failed: {0}")]
    Abi(#[from] alloy_dyn_abi::Error),
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid ABI file {path}: {source}")]
    InvalidAbiFile {
        path: String,
        source: serde_json::Error,
    },

    #[error("Failed to build RPC client: {0}")]
    RpcClient(#[from] RpcError),

    #[error("Failed to build explorer client: {0}")]
    ExplorerClient(#[from] ExplorerError),
}

/// Errors that fail a whole analysis
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Invalid transaction hash: {0}")]
    InvalidTransactionHash(String),

    #[error("Failed to fetch trace: {0}")]
    TraceFetchFailed(#[from] RpcError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
