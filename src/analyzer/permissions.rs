//! Hook permission decoding from address bits.
//!
//! A hook's capabilities live in the low bits of its own address, so they can be
//! read without touching the chain.

use crate::utils::config::ADDRESS_HEX_LENGTH;
use alloy_primitives::{Address, U160};
use serde::{Deserialize, Serialize};

/// One of the ten hook lifecycle entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPermission {
    BeforeSwap,
    AfterSwap,
    BeforeAddLiquidity,
    AfterAddLiquidity,
    BeforeRemoveLiquidity,
    AfterRemoveLiquidity,
    AfterInitialize,
    BeforeInitialize,
    BeforeDonate,
    AfterDonate,
}

impl HookPermission {
    /// All permissions in bit order
    pub const ALL: [HookPermission; 10] = [
        HookPermission::BeforeSwap,
        HookPermission::AfterSwap,
        HookPermission::BeforeAddLiquidity,
        HookPermission::AfterAddLiquidity,
        HookPermission::BeforeRemoveLiquidity,
        HookPermission::AfterRemoveLiquidity,
        HookPermission::AfterInitialize,
        HookPermission::BeforeInitialize,
        HookPermission::BeforeDonate,
        HookPermission::AfterDonate,
    ];

    /// Bit position in the hook address
    pub fn bit(self) -> usize {
        match self {
            HookPermission::BeforeSwap => 0,
            HookPermission::AfterSwap => 1,
            HookPermission::BeforeAddLiquidity => 2,
            HookPermission::AfterAddLiquidity => 3,
            HookPermission::BeforeRemoveLiquidity => 4,
            HookPermission::AfterRemoveLiquidity => 5,
            HookPermission::AfterInitialize => 6,
            HookPermission::BeforeInitialize => 7,
            HookPermission::BeforeDonate => 8,
            HookPermission::AfterDonate => 9,
        }
    }

    /// Name of the matching lifecycle function on the hook contract
    pub fn name(self) -> &'static str {
        match self {
            HookPermission::BeforeSwap => "beforeSwap",
            HookPermission::AfterSwap => "afterSwap",
            HookPermission::BeforeAddLiquidity => "beforeAddLiquidity",
            HookPermission::AfterAddLiquidity => "afterAddLiquidity",
            HookPermission::BeforeRemoveLiquidity => "beforeRemoveLiquidity",
            HookPermission::AfterRemoveLiquidity => "afterRemoveLiquidity",
            HookPermission::AfterInitialize => "afterInitialize",
            HookPermission::BeforeInitialize => "beforeInitialize",
            HookPermission::BeforeDonate => "beforeDonate",
            HookPermission::AfterDonate => "afterDonate",
        }
    }

    /// Look up a permission by lifecycle function name (exact match)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// True if `function_name` is exactly one of the ten lifecycle functions
pub fn is_lifecycle_function(function_name: &str) -> bool {
    HookPermission::from_name(function_name).is_some()
}

/// The ten capability flags of a hook
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMap {
    pub before_swap: bool,
    pub after_swap: bool,
    pub before_add_liquidity: bool,
    pub after_add_liquidity: bool,
    pub before_remove_liquidity: bool,
    pub after_remove_liquidity: bool,
    pub after_initialize: bool,
    pub before_initialize: bool,
    pub before_donate: bool,
    pub after_donate: bool,
}

impl PermissionMap {
    /// Read the flags from the low bits of an address
    pub fn from_address(address: &Address) -> Self {
        Self::from_bits(U160::from_be_slice(address.as_slice()))
    }

    /// Read the flags from an address interpreted as a 160-bit integer
    pub fn from_bits(bits: U160) -> Self {
        let mut map = Self::default();
        for permission in HookPermission::ALL {
            map.set(permission, bits.bit(permission.bit()));
        }
        map
    }

    pub fn get(&self, permission: HookPermission) -> bool {
        match permission {
            HookPermission::BeforeSwap => self.before_swap,
            HookPermission::AfterSwap => self.after_swap,
            HookPermission::BeforeAddLiquidity => self.before_add_liquidity,
            HookPermission::AfterAddLiquidity => self.after_add_liquidity,
            HookPermission::BeforeRemoveLiquidity => self.before_remove_liquidity,
            HookPermission::AfterRemoveLiquidity => self.after_remove_liquidity,
            HookPermission::AfterInitialize => self.after_initialize,
            HookPermission::BeforeInitialize => self.before_initialize,
            HookPermission::BeforeDonate => self.before_donate,
            HookPermission::AfterDonate => self.after_donate,
        }
    }

    fn set(&mut self, permission: HookPermission, granted: bool) {
        let slot = match permission {
            HookPermission::BeforeSwap => &mut self.before_swap,
            HookPermission::AfterSwap => &mut self.after_swap,
            HookPermission::BeforeAddLiquidity => &mut self.before_add_liquidity,
            HookPermission::AfterAddLiquidity => &mut self.after_add_liquidity,
            HookPermission::BeforeRemoveLiquidity => &mut self.before_remove_liquidity,
            HookPermission::AfterRemoveLiquidity => &mut self.after_remove_liquidity,
            HookPermission::AfterInitialize => &mut self.after_initialize,
            HookPermission::BeforeInitialize => &mut self.before_initialize,
            HookPermission::BeforeDonate => &mut self.before_donate,
            HookPermission::AfterDonate => &mut self.after_donate,
        };
        *slot = granted;
    }

    /// (name, granted) pairs in bit order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        HookPermission::ALL
            .into_iter()
            .map(move |p| (p.name(), self.get(p)))
    }

    /// Number of granted capabilities
    pub fn granted_count(&self) -> usize {
        self.iter().filter(|(_, granted)| *granted).count()
    }
}

/// Decode the capability flags of an optional hook address string
///
/// **Public** - main entry point for permission decoding
///
/// Anything other than `0x` followed by exactly 40 hex digits yields all-false.
pub fn decode_permissions(hook_address: Option<&str>) -> PermissionMap {
    let Some(hex_str) = hook_address
        .filter(|s| s.len() == ADDRESS_HEX_LENGTH)
        .and_then(|s| s.strip_prefix("0x"))
        .filter(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
    else {
        return PermissionMap::default();
    };

    U160::from_str_radix(hex_str, 16)
        .map(PermissionMap::from_bits)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_bits_zero_and_seven() {
        let map = decode_permissions(Some("0x0000000000000000000000000000000000000081"));
        assert!(map.before_swap);
        assert!(map.before_initialize);
        assert_eq!(map.granted_count(), 2);
    }

    #[test]
    fn test_absent_or_malformed_is_all_false() {
        assert_eq!(decode_permissions(None), PermissionMap::default());
        assert_eq!(decode_permissions(Some("0x81")), PermissionMap::default());
        assert_eq!(
            decode_permissions(Some("0xzz00000000000000000000000000000000000081")),
            PermissionMap::default()
        );
        // 66-char hashes are not addresses
        assert_eq!(
            decode_permissions(Some(
                "0x00000000000000000000000000000000000000000000000000000000000003ff"
            )),
            PermissionMap::default()
        );
    }

    #[test]
    fn test_from_address_matches_string_form() {
        let addr = address!("00000000000000000000000000000000000003ff");
        let map = PermissionMap::from_address(&addr);
        assert_eq!(map.granted_count(), 10);
        assert_eq!(
            map,
            decode_permissions(Some("0x00000000000000000000000000000000000003ff"))
        );
    }

    #[test]
    fn test_high_bits_are_ignored() {
        let map = decode_permissions(Some("0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC00"));
        assert_eq!(map.granted_count(), 0);
    }

    #[test]
    fn test_lifecycle_names() {
        assert!(is_lifecycle_function("afterSwap"));
        assert!(!is_lifecycle_function("AfterSwap"));
        assert!(!is_lifecycle_function("swap"));
        assert_eq!(HookPermission::from_name("beforeDonate").map(|p| p.bit()), Some(8));
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(PermissionMap::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "beforeSwap",
                "afterSwap",
                "beforeAddLiquidity",
                "afterAddLiquidity",
                "beforeRemoveLiquidity",
                "afterRemoveLiquidity",
                "afterInitialize",
                "beforeInitialize",
                "beforeDonate",
                "afterDonate",
            ]
        );
    }
}
