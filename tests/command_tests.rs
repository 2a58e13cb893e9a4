use alloy_primitives::address;
use hook_trace_inspector::commands::{
    build_config, display_permissions, validate_args, validate_report_file, TraceArgs,
};
use hook_trace_inspector::utils::config::{DEFAULT_POOL_MANAGER, DEFAULT_RPC_URL};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const TX: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcd";

fn args() -> TraceArgs {
    TraceArgs {
        transaction_hash: TX.to_string(),
        ..Default::default()
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_validate_args() {
    assert!(validate_args(&args()).is_ok());

    let empty = TraceArgs {
        transaction_hash: String::new(),
        ..args()
    };
    assert!(validate_args(&empty).is_err());

    let short = TraceArgs {
        transaction_hash: "0xabc".to_string(),
        ..args()
    };
    assert!(validate_args(&short).is_err());

    let not_hex = TraceArgs {
        transaction_hash: format!("0x{}", "zz".repeat(32)),
        ..args()
    };
    assert!(validate_args(&not_hex).is_err());

    let bad_explorer = TraceArgs {
        explorer_url: Some("api.example.com".to_string()),
        ..args()
    };
    assert!(validate_args(&bad_explorer).is_err());

    let missing_config = TraceArgs {
        config_path: Some(PathBuf::from("/definitely/not/here.toml")),
        ..args()
    };
    assert!(validate_args(&missing_config).is_err());
}

#[test]
fn test_build_config_defaults() {
    let config = build_config(&args()).unwrap();
    assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
    assert_eq!(config.pool_manager, DEFAULT_POOL_MANAGER);
    assert!(config.explorer.enabled);
}

#[test]
fn test_build_config_file_then_overrides() {
    let file = config_file(
        r#"
        rpc_url = "http://archive:8545"
        known_hooks = ["0xa1b2000000000000000000000000000000000081"]

        [explorer]
        api_url = "https://explorer.example/api"
        api_key = "from-file"
        "#,
    );

    let from_file = build_config(&TraceArgs {
        config_path: Some(file.path().to_path_buf()),
        ..args()
    })
    .unwrap();
    assert_eq!(from_file.rpc_url, "http://archive:8545");
    assert_eq!(from_file.explorer.api_url, "https://explorer.example/api");
    assert_eq!(from_file.explorer.api_key.as_deref(), Some("from-file"));
    assert!(from_file.is_known_hook(&address!("a1b2000000000000000000000000000000000081")));

    let overridden = build_config(&TraceArgs {
        config_path: Some(file.path().to_path_buf()),
        rpc_url: Some("http://localhost:9545".to_string()),
        explorer_key: Some("from-cli".to_string()),
        offline: true,
        ..args()
    })
    .unwrap();
    assert_eq!(overridden.rpc_url, "http://localhost:9545");
    assert_eq!(overridden.explorer.api_url, "https://explorer.example/api");
    assert_eq!(overridden.explorer.api_key.as_deref(), Some("from-cli"));
    assert!(!overridden.explorer.enabled);
    assert_eq!(overridden.known_hooks.len(), 1);
}

#[test]
fn test_build_config_rejects_bad_toml() {
    let file = config_file("rpc_url = [");
    let result = build_config(&TraceArgs {
        config_path: Some(file.path().to_path_buf()),
        ..args()
    });
    assert!(result.is_err());
}

#[test]
fn test_display_permissions() {
    let permissions = display_permissions("0xa1b2000000000000000000000000000000000081").unwrap();
    assert!(permissions.before_swap);
    assert!(permissions.before_initialize);
    assert_eq!(permissions.granted_count(), 2);

    let all = display_permissions("0x00000000000000000000000000000000000003ff").unwrap();
    assert_eq!(all.granted_count(), 10);
}

#[test]
fn test_display_permissions_rejects_malformed() {
    assert!(display_permissions("0x1234").is_err());
    assert!(display_permissions("a1b2000000000000000000000000000000000081").is_err());
    assert!(display_permissions("0xg1b2000000000000000000000000000000000081").is_err());
    assert!(display_permissions(
        "0xa1b2000000000000000000000000000000000000000000000000000000000081"
    )
    .is_err());
}

#[test]
fn test_validate_report_file() {
    let missing = validate_report_file(PathBuf::from("/definitely/not/report.json"));
    assert!(missing.is_err());

    let file = config_file("[]");
    assert!(validate_report_file(file.path().to_path_buf()).is_err());
}
