//! Address → schema resolution.
//!
//! Resolution is an ordered chain of strategies, each returning an optional
//! schema: static registry, process-wide cache, remote lookup. Hooks get one
//! more fallback, the fixed lifecycle interface.

use super::registry::SchemaRegistry;
use crate::parser::schema::CallRole;
use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A remote provider of contract schemas (block explorer, local database, ...)
///
/// Implementations swallow their own failures: any problem is "not found".
pub trait SchemaSource: Send + Sync {
    fn fetch_schema(&self, address: &Address) -> Option<JsonAbi>;
}

/// Process-lifetime cache of remotely resolved schemas.
///
/// Safe to share between concurrent analyses. Inserting the same address twice
/// stores the same schema, so racing writers are harmless.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<Address, Arc<JsonAbi>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &Address) -> Option<Arc<JsonAbi>> {
        self.entries.read().get(address).cloned()
    }

    pub fn insert(&self, address: Address, abi: Arc<JsonAbi>) {
        self.entries.write().insert(address, abi);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps contract addresses to decoding schemas
pub struct InterfaceResolver {
    registry: SchemaRegistry,
    cache: Arc<SchemaCache>,
    remote: Option<Box<dyn SchemaSource>>,
}

impl InterfaceResolver {
    pub fn new(registry: SchemaRegistry, remote: Option<Box<dyn SchemaSource>>) -> Self {
        Self {
            registry,
            cache: Arc::new(SchemaCache::new()),
            remote,
        }
    }

    /// Share an existing cache instead of starting empty
    pub fn with_cache(mut self, cache: Arc<SchemaCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }

    /// Resolve a schema by address: registry, then cache, then remote lookup.
    /// Remote successes are cached for the life of the process.
    pub fn resolve(&self, address: &Address) -> Option<Arc<JsonAbi>> {
        self.resolve_local(address)
            .or_else(|| self.fetch_remote(address))
    }

    /// Start resolving for one analysis
    pub fn session(&self) -> ResolveSession<'_> {
        ResolveSession {
            resolver: self,
            misses: HashSet::new(),
        }
    }

    fn resolve_local(&self, address: &Address) -> Option<Arc<JsonAbi>> {
        self.registry
            .get(address)
            .or_else(|| self.cache.get(address))
    }

    fn fetch_remote(&self, address: &Address) -> Option<Arc<JsonAbi>> {
        let remote = self.remote.as_ref()?;
        let abi = Arc::new(remote.fetch_schema(address)?);
        info!("Fetched and cached ABI for {}", address);
        self.cache.insert(*address, Arc::clone(&abi));
        Some(abi)
    }
}

/// Resolution state scoped to one analysis.
///
/// Addresses that resolved to nothing are not looked up remotely again until
/// the session ends. Successes still go to the shared cache.
pub struct ResolveSession<'a> {
    resolver: &'a InterfaceResolver,
    misses: HashSet<Address>,
}

impl ResolveSession<'_> {
    pub fn resolve(&mut self, address: &Address) -> Option<Arc<JsonAbi>> {
        if self.misses.contains(address) {
            return self.resolver.resolve_local(address);
        }

        let resolved = self.resolver.resolve(address);
        if resolved.is_none() {
            self.misses.insert(*address);
        }
        resolved
    }

    /// Resolve the schema for a call's callee, falling back to the hook
    /// lifecycle interface when the call is classified as a Hook call.
    pub fn resolve_for(&mut self, address: Option<&Address>, role: CallRole) -> Option<Arc<JsonAbi>> {
        let resolved = address.and_then(|a| self.resolve(a));
        if resolved.is_none() && role == CallRole::Hook {
            debug!("Using hook lifecycle interface for {:?}", address);
            return Some(self.resolver.registry.hook_interface());
        }
        resolved
    }

    /// Number of addresses that resolved to nothing so far
    pub fn miss_count(&self) -> usize {
        self.misses.len()
    }
}
