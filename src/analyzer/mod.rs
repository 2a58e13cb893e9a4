//! Transaction analysis: hook detection, call classification, tree walking and
//! permission decoding.
//!
//! [`TraceAnalyzer`] ties the pieces together. It is `Send + Sync`: one
//! analyzer can serve several threads, sharing only the schema cache.
//! Everything derived from a single transaction stays local to its
//! [`TraceAnalyzer::analyze`] call.

pub mod classifier;
pub mod detector;
pub mod permissions;
pub mod walker;

pub use classifier::classify;
pub use detector::detect_hook_address;
pub use permissions::{decode_permissions, HookPermission, PermissionMap};
pub use walker::walk;

use crate::abi::registry::SchemaRegistry;
use crate::abi::resolver::{InterfaceResolver, SchemaCache, SchemaSource};
use crate::parser::call_frame::lower_hex;
use crate::parser::schema::AnalysisReport;
use crate::rpc::{ExplorerClient, RpcClient, TraceSource};
use crate::utils::config::{AnalyzerConfig, SCHEMA_VERSION, TX_HASH_LENGTH};
use crate::utils::error::{AnalyzeError, ConfigError};
use log::{debug, info};
use std::sync::Arc;

/// Analyzes transactions against one configuration
pub struct TraceAnalyzer {
    config: AnalyzerConfig,
    source: Box<dyn TraceSource>,
    resolver: InterfaceResolver,
}

impl TraceAnalyzer {
    /// Build an analyzer from explicit collaborators
    ///
    /// # Errors
    /// * `ConfigError` - An ABI file listed in the configuration cannot be loaded
    pub fn new(
        config: AnalyzerConfig,
        source: Box<dyn TraceSource>,
        remote: Option<Box<dyn SchemaSource>>,
    ) -> Result<Self, ConfigError> {
        let registry = SchemaRegistry::from_config(&config)?;
        Ok(Self {
            resolver: InterfaceResolver::new(registry, remote),
            config,
            source,
        })
    }

    /// Build an analyzer talking to the configured RPC endpoint and, unless
    /// disabled, the configured explorer
    pub fn from_config(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        let source = RpcClient::new(config.rpc_url.clone())?;
        let remote: Option<Box<dyn SchemaSource>> = if config.explorer.enabled {
            Some(Box::new(ExplorerClient::new(&config.explorer)?))
        } else {
            info!("Remote ABI lookups disabled");
            None
        };
        Self::new(config, Box::new(source), remote)
    }

    /// Share a schema cache with other analyzers, e.g. one per chain endpoint
    pub fn with_schema_cache(mut self, cache: Arc<SchemaCache>) -> Self {
        self.resolver = self.resolver.with_cache(cache);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &InterfaceResolver {
        &self.resolver
    }

    /// Analyze one transaction
    ///
    /// **Public** - main entry point for analysis
    ///
    /// # Errors
    /// * `AnalyzeError::InvalidTransactionHash` - Rejected before any I/O
    /// * `AnalyzeError::TraceFetchFailed` - The trace could not be fetched or parsed
    ///
    /// Schema lookups and decoding never fail the analysis; they degrade the
    /// affected call records instead.
    pub fn analyze(&self, tx_hash: &str) -> Result<AnalysisReport, AnalyzeError> {
        validate_tx_hash(tx_hash)?;

        let root = self.source.fetch_call_tree(tx_hash)?;
        let generated_at = chrono::Utc::now().to_rfc3339();

        let Some(root) = root else {
            info!("Empty trace for {}", tx_hash);
            return Ok(AnalysisReport {
                version: SCHEMA_VERSION.to_string(),
                success: true,
                transaction_hash: tx_hash.to_string(),
                calls: Vec::new(),
                detected_hook_address: None,
                hook_permissions: PermissionMap::default(),
                generated_at,
            });
        };

        let hook = detect_hook_address(&root, self.resolver.registry(), &self.config);
        let calls = walk(&root, hook.as_ref(), &self.resolver, &self.config);

        let detected_hook_address = hook.as_ref().map(lower_hex);
        let hook_permissions = decode_permissions(detected_hook_address.as_deref());

        debug!(
            "{} calls, {} lifecycle, {} permissions granted",
            calls.len(),
            calls.iter().filter(|c| c.call.is_lifecycle_call).count(),
            hook_permissions.granted_count()
        );

        Ok(AnalysisReport {
            version: SCHEMA_VERSION.to_string(),
            success: true,
            transaction_hash: tx_hash.to_string(),
            calls,
            detected_hook_address,
            hook_permissions,
            generated_at,
        })
    }
}

/// Check that a transaction id is `0x` followed by 64 hex digits
pub fn validate_tx_hash(tx_hash: &str) -> Result<(), AnalyzeError> {
    let valid = tx_hash.len() == TX_HASH_LENGTH
        && tx_hash
            .strip_prefix("0x")
            .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()));

    if valid {
        Ok(())
    } else {
        Err(AnalyzeError::InvalidTransactionHash(tx_hash.to_string()))
    }
}
