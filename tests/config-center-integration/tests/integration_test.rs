//! 配置中心启动流程的集中集成测试
use config_abstractions::{DynamicConfiguration, RemoteConfig};
use config_impl::{
    global_environment, ConfigCenterConfig, ConfigCenterStarter, Environment,
    FileConfigCenterFactory, FileDynamicConfiguration, FactoryRegistry, MemoryConfigCenterFactory,
    RoleContext,
};
use infrastructure_common::constants::CONFIG_ROOT_PATH_KEY;
use infrastructure_common::{ApplicationRole, ConfigCenterError, StartStage};
use std::collections::HashMap;
use std::sync::Arc;

fn starter_with(registry: FactoryRegistry) -> (ConfigCenterStarter, Arc<Environment>) {
    let environment = Arc::new(Environment::new());
    let starter = ConfigCenterStarter::new(Arc::new(registry), environment.clone());
    (starter, environment)
}

#[tokio::test]
async fn test_file_config_center_end_to_end() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("config-center");
    std::fs::create_dir_all(root.join("dubbo"))?;
    std::fs::create_dir_all(root.join("orderService"))?;
    std::fs::write(
        root.join("dubbo").join("dubbo.properties"),
        "# shared\ndubbo.registries.zk.address=127.0.0.1:2181\ntimeout=1000\n",
    )?;
    std::fs::write(
        root.join("orderService").join("dubbo.properties"),
        "timeout=3000\n",
    )?;

    let (starter, environment) = starter_with(FactoryRegistry::with_builtin());
    let config = ConfigCenterConfig::new("file", "")
        .with_param(CONFIG_ROOT_PATH_KEY, root.display().to_string());

    starter
        .start(&config, &HashMap::<String, RemoteConfig>::new(), &RoleContext::provider("orderService"))
        .await?;

    assert_eq!(environment.get_property("timeout").as_deref(), Some("3000"));
    assert_eq!(
        environment.get_property("dubbo.registries.zk.address").as_deref(),
        Some("127.0.0.1:2181")
    );
    assert!(environment.get_sub_property("dubbo.registries").contains("zk"));
    Ok(())
}

#[tokio::test]
async fn test_file_config_center_via_remote_reference() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("center");

    let mut remotes = HashMap::new();
    remotes.insert(
        "local-files".to_string(),
        RemoteConfig::new("", "").with_param(CONFIG_ROOT_PATH_KEY, root.display().to_string()),
    );

    // 先通过驱动发布文档，再启动
    let (starter, environment) = starter_with(FactoryRegistry::with_builtin());
    let config = ConfigCenterConfig::new("file", "").with_remote_ref("local-files");

    let publisher = FileDynamicConfiguration::new(&root);
    publisher
        .publish_config("dubbo.properties", "dubbo", "greeting=hello")
        .await?;

    starter
        .start(&config, &remotes, &RoleContext::new(ApplicationRole::Consumer))
        .await?;

    assert_eq!(environment.get_property("greeting").as_deref(), Some("hello"));
    Ok(())
}

#[tokio::test]
async fn test_missing_global_file_is_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let (starter, environment) = starter_with(FactoryRegistry::with_builtin());
    let config = ConfigCenterConfig::new("file", "")
        .with_param(CONFIG_ROOT_PATH_KEY, dir.path().display().to_string());

    let err = starter
        .start(
            &config,
            &HashMap::<String, RemoteConfig>::new(),
            &RoleContext::new(ApplicationRole::Provider),
        )
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(StartStage::FetchGlobal));
    assert!(matches!(err.root_cause(), ConfigCenterError::Fetch { .. }));
    assert!(err.is_retryable());
    assert!(environment.external_config().is_empty());
}

#[tokio::test]
async fn test_hybrid_process_last_writer_wins() -> anyhow::Result<()> {
    // 提供方走内存驱动
    let provider_side = MemoryConfigCenterFactory::new();
    let store = provider_side.configuration();
    store.insert("dubbo.properties", "dubbo", "side=provider\nprovider.only=yes");
    store.insert("dubbo.properties", "orders", "app=orders");

    // 消费方走文件驱动
    let dir = tempfile::tempdir()?;
    let files = FileDynamicConfiguration::new(dir.path());
    files
        .publish_config("dubbo.properties", "dubbo", "side=consumer")
        .await?;
    files
        .publish_config("dubbo.properties", "orders-client", "app=orders-client")
        .await?;

    let registry = FactoryRegistry::new();
    registry.register(Arc::new(provider_side));
    registry.register(Arc::new(FileConfigCenterFactory::new()));
    let (starter, environment) = starter_with(registry);
    let remotes = HashMap::<String, RemoteConfig>::new();

    starter
        .start(
            &ConfigCenterConfig::new("memory", ""),
            &remotes,
            &RoleContext::provider("orders"),
        )
        .await?;
    assert_eq!(
        environment.dynamic_configuration().map(|c| c.name().to_string()),
        Some("memory".to_string())
    );
    assert_eq!(environment.get_property("side").as_deref(), Some("provider"));

    let consumer_config = ConfigCenterConfig::new("file", "")
        .with_param(CONFIG_ROOT_PATH_KEY, dir.path().display().to_string());
    starter
        .start(&consumer_config, &remotes, &RoleContext::consumer("orders-client"))
        .await?;

    assert_eq!(
        environment.dynamic_configuration().map(|c| c.name().to_string()),
        Some("file".to_string())
    );
    assert_eq!(environment.get_property("side").as_deref(), Some("consumer"));
    assert_eq!(environment.get_property("app").as_deref(), Some("orders-client"));
    // 全局映射被整体替换
    assert_eq!(environment.get_property("provider.only"), None);
    Ok(())
}

#[tokio::test]
async fn test_descriptor_loaded_from_yaml() -> anyhow::Result<()> {
    let factory = MemoryConfigCenterFactory::new();
    factory
        .configuration()
        .insert("global.properties", "tenant-a", "a=1");

    let registry = FactoryRegistry::new();
    registry.register(Arc::new(factory));
    let (starter, environment) = starter_with(registry);

    let config = ConfigCenterConfig::from_yaml_str(
        "protocol: memory\ngroup: tenant-a\nconfig_file: global.properties\n",
    )?;
    starter
        .start(
            &config,
            &HashMap::<String, RemoteConfig>::new(),
            &RoleContext::new(ApplicationRole::Provider),
        )
        .await?;

    assert_eq!(environment.get_property("a").as_deref(), Some("1"));
    Ok(())
}

#[test]
fn test_global_environment_is_shared() {
    let first = global_environment();
    let second = global_environment();
    assert!(Arc::ptr_eq(&first, &second));
}
