//! Static schema registry.
//!
//! Holds the schemas known without any lookup: the pool manager, the fixed hook
//! lifecycle interface, and any ABI files listed in the configuration.

use crate::utils::config::AnalyzerConfig;
use crate::utils::error::ConfigError;
use alloy_json_abi::{Function, JsonAbi, Param, StateMutability};
use alloy_primitives::Address;
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Schemas available without I/O
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    by_address: HashMap<Address, Arc<JsonAbi>>,
    pool_manager: Address,
    hook_interface: Arc<JsonAbi>,
}

impl SchemaRegistry {
    /// Registry with only the built-in pool manager and hook schemas
    pub fn new(pool_manager: Address) -> Self {
        let mut by_address = HashMap::new();
        by_address.insert(pool_manager, Arc::new(pool_manager_abi()));
        Self {
            by_address,
            pool_manager,
            hook_interface: Arc::new(hook_interface_abi()),
        }
    }

    /// Registry with the built-ins plus every ABI file in the configuration.
    /// A file registered for the pool manager replaces the built-in schema.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new(config.pool_manager);
        for (address, path) in &config.abi_files {
            let abi = load_abi_file(path)?;
            info!("Registered ABI for {} from {}", address, path.display());
            registry.register(*address, abi);
        }
        Ok(registry)
    }

    pub fn register(&mut self, address: Address, abi: JsonAbi) {
        self.by_address.insert(address, Arc::new(abi));
    }

    pub fn get(&self, address: &Address) -> Option<Arc<JsonAbi>> {
        self.by_address.get(address).cloned()
    }

    /// Schema of the pool manager, if registered
    pub fn pool_manager_schema(&self) -> Option<Arc<JsonAbi>> {
        self.get(&self.pool_manager)
    }

    /// The fixed hook lifecycle schema
    pub fn hook_interface(&self) -> Arc<JsonAbi> {
        Arc::clone(&self.hook_interface)
    }
}

/// Load a JSON ABI from disk. Accepts a bare ABI array or a build artifact
/// with an `abi` field.
pub fn load_abi_file(path: &Path) -> Result<JsonAbi, ConfigError> {
    debug!("Loading ABI file: {}", path.display());
    let contents = fs::read_to_string(path)?;
    let invalid = |source| ConfigError::InvalidAbiFile {
        path: path.display().to_string(),
        source,
    };

    let mut value: serde_json::Value = serde_json::from_str(&contents).map_err(invalid)?;
    if let Some(abi) = value.get_mut("abi") {
        value = abi.take();
    }
    serde_json::from_value(value).map_err(invalid)
}

fn param(ty: &str, name: &str) -> Param {
    Param {
        ty: ty.to_string(),
        name: name.to_string(),
        components: Vec::new(),
        internal_type: None,
    }
}

fn tuple(name: &str, components: Vec<Param>) -> Param {
    Param {
        ty: "tuple".to_string(),
        name: name.to_string(),
        components,
        internal_type: None,
    }
}

fn function(name: &str, inputs: Vec<Param>, outputs: Vec<Param>) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        state_mutability: StateMutability::NonPayable,
    }
}

fn abi_from(functions: Vec<Function>) -> JsonAbi {
    let mut abi = JsonAbi::new();
    for f in functions {
        abi.functions.entry(f.name.clone()).or_default().push(f);
    }
    abi
}

fn pool_key(name: &str) -> Param {
    tuple(
        name,
        vec![
            param("address", "currency0"),
            param("address", "currency1"),
            param("uint24", "fee"),
            param("int24", "tickSpacing"),
            param("address", "hooks"),
        ],
    )
}

fn modify_liquidity_params() -> Param {
    tuple(
        "params",
        vec![
            param("int24", "tickLower"),
            param("int24", "tickUpper"),
            param("int256", "liquidityDelta"),
            param("bytes32", "salt"),
        ],
    )
}

fn swap_params() -> Param {
    tuple(
        "params",
        vec![
            param("bool", "zeroForOne"),
            param("int256", "amountSpecified"),
            param("uint160", "sqrtPriceLimitX96"),
        ],
    )
}

/// Pool manager entry points
pub fn pool_manager_abi() -> JsonAbi {
    abi_from(vec![
        function(
            "initialize",
            vec![pool_key("key"), param("uint160", "sqrtPriceX96")],
            vec![param("int24", "tick")],
        ),
        function(
            "unlock",
            vec![param("bytes", "data")],
            vec![param("bytes", "result")],
        ),
        function(
            "modifyLiquidity",
            vec![
                pool_key("key"),
                modify_liquidity_params(),
                param("bytes", "hookData"),
            ],
            vec![
                param("int256", "callerDelta"),
                param("int256", "feesAccrued"),
            ],
        ),
        function(
            "swap",
            vec![pool_key("key"), swap_params(), param("bytes", "hookData")],
            vec![param("int256", "swapDelta")],
        ),
        function(
            "donate",
            vec![
                pool_key("key"),
                param("uint256", "amount0"),
                param("uint256", "amount1"),
                param("bytes", "hookData"),
            ],
            vec![param("int256", "delta")],
        ),
        function("sync", vec![param("address", "currency")], vec![]),
        function(
            "take",
            vec![
                param("address", "currency"),
                param("address", "to"),
                param("uint256", "amount"),
            ],
            vec![],
        ),
        function("settle", vec![], vec![param("uint256", "paid")]),
        function(
            "settleFor",
            vec![param("address", "recipient")],
            vec![param("uint256", "paid")],
        ),
        function(
            "clear",
            vec![param("address", "currency"), param("uint256", "amount")],
            vec![],
        ),
        function(
            "mint",
            vec![
                param("address", "to"),
                param("uint256", "id"),
                param("uint256", "amount"),
            ],
            vec![],
        ),
        function(
            "burn",
            vec![
                param("address", "from"),
                param("uint256", "id"),
                param("uint256", "amount"),
            ],
            vec![],
        ),
    ])
}

/// The ten hook lifecycle functions, nothing else
pub fn hook_interface_abi() -> JsonAbi {
    let selector_only = || vec![param("bytes4", "")];
    let liquidity_inputs = || {
        vec![
            param("address", "sender"),
            pool_key("key"),
            modify_liquidity_params(),
            param("bytes", "hookData"),
        ]
    };
    let after_liquidity_inputs = || {
        vec![
            param("address", "sender"),
            pool_key("key"),
            modify_liquidity_params(),
            param("int256", "delta"),
            param("int256", "feesAccrued"),
            param("bytes", "hookData"),
        ]
    };
    let donate_inputs = || {
        vec![
            param("address", "sender"),
            pool_key("key"),
            param("uint256", "amount0"),
            param("uint256", "amount1"),
            param("bytes", "hookData"),
        ]
    };

    abi_from(vec![
        function(
            "beforeInitialize",
            vec![
                param("address", "sender"),
                pool_key("key"),
                param("uint160", "sqrtPriceX96"),
            ],
            selector_only(),
        ),
        function(
            "afterInitialize",
            vec![
                param("address", "sender"),
                pool_key("key"),
                param("uint160", "sqrtPriceX96"),
                param("int24", "tick"),
            ],
            selector_only(),
        ),
        function("beforeAddLiquidity", liquidity_inputs(), selector_only()),
        function(
            "afterAddLiquidity",
            after_liquidity_inputs(),
            vec![param("bytes4", ""), param("int256", "hookDelta")],
        ),
        function("beforeRemoveLiquidity", liquidity_inputs(), selector_only()),
        function(
            "afterRemoveLiquidity",
            after_liquidity_inputs(),
            vec![param("bytes4", ""), param("int256", "hookDelta")],
        ),
        function(
            "beforeSwap",
            vec![
                param("address", "sender"),
                pool_key("key"),
                swap_params(),
                param("bytes", "hookData"),
            ],
            vec![
                param("bytes4", ""),
                param("int256", "beforeSwapDelta"),
                param("uint24", "lpFeeOverride"),
            ],
        ),
        function(
            "afterSwap",
            vec![
                param("address", "sender"),
                pool_key("key"),
                swap_params(),
                param("int256", "delta"),
                param("bytes", "hookData"),
            ],
            vec![param("bytes4", ""), param("int128", "hookDelta")],
        ),
        function("beforeDonate", donate_inputs(), selector_only()),
        function("afterDonate", donate_inputs(), selector_only()),
    ])
}
