//! 连接目标解析测试

use crate::descriptor::ConfigCenterConfig;
use crate::resolver::resolve;
use config_abstractions::RemoteConfig;
use infrastructure_common::constants::{CONFIG_GROUP_KEY, CONFIG_TIMEOUT_KEY};
use infrastructure_common::ConfigCenterError;
use std::collections::HashMap;

fn no_remotes() -> HashMap<String, RemoteConfig> {
    HashMap::new()
}

/// 内联模式下协议、地址与参数原样来自描述
#[test]
fn test_direct_mode_uses_descriptor_verbatim() {
    let configs = [
        ConfigCenterConfig::new("zookeeper", "127.0.0.1:2181"),
        ConfigCenterConfig::new("nacos", "10.0.0.1:8848,10.0.0.2:8848")
            .with_group("")
            .with_param("namespaceId", "dev"),
        ConfigCenterConfig::new("apollo", "apollo.internal:8080")
            .with_credentials("admin", "")
            .with_timeout("5s"),
    ];

    for config in configs {
        let locator = resolve(&config, &no_remotes()).unwrap();
        assert_eq!(locator.protocol, config.protocol);
        assert_eq!(locator.location, config.address);
        assert_eq!(locator.params, config.url_params());
    }
}

/// 内联地址携带的协议会被描述中的协议覆盖
#[test]
fn test_direct_mode_descriptor_protocol_wins() {
    let config = ConfigCenterConfig::new("etcdv3", "zookeeper://127.0.0.1:2181");
    let locator = resolve(&config, &no_remotes()).unwrap();
    assert_eq!(locator.protocol, "etcdv3");
    assert_eq!(locator.location, "127.0.0.1:2181");
}

/// 描述未给出协议时使用地址中的协议
#[test]
fn test_direct_mode_protocol_from_address() {
    let config = ConfigCenterConfig::new("", "nacos://127.0.0.1:8848");
    let locator = resolve(&config, &no_remotes()).unwrap();
    assert_eq!(locator.protocol, "nacos");
}

/// 协议完全缺失时无法构造定位符
#[test]
fn test_direct_mode_without_protocol_fails() {
    let config = ConfigCenterConfig::new("", "127.0.0.1:2181");
    let err = resolve(&config, &no_remotes()).unwrap_err();
    assert!(matches!(err, ConfigCenterError::UrlConstruction { .. }));
}

/// 引用缺失时返回 ReferenceNotFound，任何名字都一样
#[test]
fn test_missing_reference_is_reported() {
    let mut remotes = HashMap::new();
    remotes.insert("zk".to_string(), RemoteConfig::new("zookeeper", "127.0.0.1:2181"));

    for name in ["ref1", "ZK", "zk ", "nacos"] {
        let config = ConfigCenterConfig::new("zookeeper", "127.0.0.1:2181").with_remote_ref(name);
        let err = resolve(&config, &remotes).unwrap_err();
        assert!(matches!(err, ConfigCenterError::ReferenceNotFound { name: n } if n == name));
    }
}

/// 引用未声明协议时继承描述的协议
#[test]
fn test_reference_inherits_protocol() {
    let mut remotes = HashMap::new();
    remotes.insert("shared".to_string(), RemoteConfig::new("", "10.1.1.1:2181"));

    let config = ConfigCenterConfig::new("zookeeper", "").with_remote_ref("shared");
    let locator = resolve(&config, &remotes).unwrap();
    assert_eq!(locator.protocol, "zookeeper");
    assert_eq!(locator.location, "10.1.1.1:2181");
}

/// 引用存在时完全以引用为准，不合并描述中的连接字段
#[test]
fn test_reference_wins_entirely() {
    let mut remotes = HashMap::new();
    remotes.insert(
        "shared".to_string(),
        RemoteConfig::new("nacos", "10.1.1.1:8848").with_timeout("3s"),
    );

    let config = ConfigCenterConfig::new("zookeeper", "127.0.0.1:2181")
        .with_group("ignored")
        .with_remote_ref("shared");
    let locator = resolve(&config, &remotes).unwrap();

    assert_eq!(locator.protocol, "nacos");
    assert_eq!(locator.location, "10.1.1.1:8848");
    assert_eq!(locator.param(CONFIG_TIMEOUT_KEY), Some("3s"));
    assert_eq!(locator.param(CONFIG_GROUP_KEY), None);
}

/// 引用地址非法时返回 UrlConstruction
#[test]
fn test_reference_with_bad_address_fails() {
    let mut remotes = HashMap::new();
    remotes.insert("bad".to_string(), RemoteConfig::new("zookeeper", "127.0.0.1:notaport"));

    let config = ConfigCenterConfig::new("zookeeper", "").with_remote_ref("bad");
    let err = resolve(&config, &remotes).unwrap_err();
    assert!(matches!(err, ConfigCenterError::UrlConstruction { .. }));
}
