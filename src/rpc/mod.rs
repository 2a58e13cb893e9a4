//! Network clients: the node RPC endpoint for traces and the block explorer for ABIs.

pub mod client;
pub mod explorer;
pub mod types;

// Re-export main types
pub use client::{RpcClient, TraceSource};
pub use explorer::ExplorerClient;
