//! Contract schemas and call decoding.
//!
//! This module handles:
//! - The static schema registry (pool manager, hook lifecycle interface, ABI files)
//! - Address → schema resolution with a shared cache and remote lookups
//! - Decoding call payloads into named JSON values

pub mod decoder;
pub mod registry;
pub mod resolver;
pub mod value;

// Re-export main types
pub use decoder::{decode_call, decode_input, decode_output, unknown_label};
pub use registry::{hook_interface_abi, load_abi_file, pool_manager_abi, SchemaRegistry};
pub use resolver::{InterfaceResolver, ResolveSession, SchemaCache, SchemaSource};
