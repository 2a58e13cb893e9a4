//! Per-call role classification.

use crate::parser::call_frame::CallNode;
use crate::parser::schema::CallRole;
use crate::utils::config::AnalyzerConfig;
use alloy_primitives::Address;

/// Assign a role to one call based only on its callee.
///
/// Pure and position-independent: the same node and hook address always give
/// the same role, wherever the node sits in the tree. Addresses compare as
/// bytes, so hex case never matters.
pub fn classify(
    node: &CallNode,
    detected_hook: Option<&Address>,
    config: &AnalyzerConfig,
) -> CallRole {
    let Some(to) = node.to.as_ref() else {
        return CallRole::External;
    };

    if *to == config.pool_manager {
        CallRole::Manager
    } else if detected_hook == Some(to) || config.is_known_hook(to) {
        CallRole::Hook
    } else {
        CallRole::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const USER: Address = address!("00000000000000000000000000000000000000aa");
    const HOOK: Address = address!("0000000000000000000000000000000000000081");
    const KNOWN: Address = address!("00000000000000000000000000000000000000c0");

    fn config() -> AnalyzerConfig {
        let mut config = AnalyzerConfig::default();
        config.known_hooks.insert(KNOWN);
        config
    }

    #[test]
    fn test_manager() {
        let config = config();
        let node = CallNode::new(USER, config.pool_manager);
        assert_eq!(classify(&node, Some(&HOOK), &config), CallRole::Manager);
    }

    #[test]
    fn test_detected_and_known_hooks() {
        let config = config();
        assert_eq!(
            classify(&CallNode::new(USER, HOOK), Some(&HOOK), &config),
            CallRole::Hook
        );
        assert_eq!(
            classify(&CallNode::new(USER, HOOK), None, &config),
            CallRole::External
        );
        assert_eq!(
            classify(&CallNode::new(USER, KNOWN), None, &config),
            CallRole::Hook
        );
    }

    #[test]
    fn test_missing_callee_is_external() {
        let mut node = CallNode::new(USER, HOOK);
        node.to = None;
        assert_eq!(classify(&node, Some(&HOOK), &config()), CallRole::External);
    }
}
