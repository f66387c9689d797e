//! 内置配置中心驱动实现
//!
//! - `memory`：进程内存储，主要用于测试与演示
//! - `file`：以 `<root>/<group>/<key>` 目录结构保存配置文档

use crate::parser::PropertiesParser;
use async_trait::async_trait;
use config_abstractions::{ConfigCenterFactory, ConfigParser, DynamicConfiguration, Locator};
use dashmap::DashMap;
use infrastructure_common::constants::{
    CONFIG_GROUP_KEY, CONFIG_ROOT_PATH_KEY, DEFAULT_GROUP, FILE_PROTOCOL, MEMORY_PROTOCOL,
};
use infrastructure_common::{ConfigCenterError, ConfigCenterResult};
use parking_lot::Mutex;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

/// 内存动态配置源
///
/// 不存在的文档返回空字符串。通过 [`MemoryDynamicConfiguration::recording`]
/// 创建时按顺序记录读取请求，便于断言。
pub struct MemoryDynamicConfiguration {
    documents: DashMap<(String, String), String>,
    requests: Option<Mutex<Vec<(String, String)>>>,
    parser: Arc<dyn ConfigParser>,
}

impl std::fmt::Debug for MemoryDynamicConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDynamicConfiguration")
            .field("documents", &self.documents.len())
            .field("recording", &self.requests.is_some())
            .field("parser", &self.parser.name())
            .finish()
    }
}

impl MemoryDynamicConfiguration {
    /// 创建空的内存配置源
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            requests: None,
            parser: Arc::new(PropertiesParser::new()),
        }
    }

    /// 创建记录读取请求的内存配置源
    pub fn recording() -> Self {
        Self {
            requests: Some(Mutex::new(Vec::new())),
            ..Self::new()
        }
    }

    /// 设置解析器
    pub fn with_parser(mut self, parser: Arc<dyn ConfigParser>) -> Self {
        self.parser = parser;
        self
    }

    /// 写入文档
    pub fn insert(&self, key: impl Into<String>, group: impl Into<String>, content: impl Into<String>) {
        self.documents.insert((group.into(), key.into()), content.into());
    }

    /// 删除文档
    pub fn remove(&self, key: &str, group: &str) -> Option<String> {
        self.documents
            .remove(&(group.to_string(), key.to_string()))
            .map(|(_, content)| content)
    }

    /// 已记录的读取请求 `(key, group)`，未开启记录时为空
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .as_ref()
            .map(|requests| requests.lock().clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryDynamicConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DynamicConfiguration for MemoryDynamicConfiguration {
    async fn get_properties(&self, key: &str, group: &str) -> ConfigCenterResult<String> {
        if let Some(requests) = &self.requests {
            requests.lock().push((key.to_string(), group.to_string()));
        }

        let content = self
            .documents
            .get(&(group.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        debug!("读取内存配置文档: group={}, key={}, {} 字节", group, key, content.len());
        Ok(content)
    }

    fn parser(&self) -> Arc<dyn ConfigParser> {
        self.parser.clone()
    }

    async fn publish_config(&self, key: &str, group: &str, value: &str) -> ConfigCenterResult<()> {
        self.insert(key, group, value);
        Ok(())
    }

    fn name(&self) -> &str {
        MEMORY_PROTOCOL
    }
}

/// 内存驱动工厂
///
/// 所有定位符共享同一个内存配置源
#[derive(Debug, Clone)]
pub struct MemoryConfigCenterFactory {
    configuration: Arc<MemoryDynamicConfiguration>,
}

impl MemoryConfigCenterFactory {
    /// 创建带空存储的工厂
    pub fn new() -> Self {
        Self::with_configuration(Arc::new(MemoryDynamicConfiguration::new()))
    }

    /// 使用已有的内存配置源
    pub fn with_configuration(configuration: Arc<MemoryDynamicConfiguration>) -> Self {
        Self { configuration }
    }

    /// 共享的内存配置源
    pub fn configuration(&self) -> Arc<MemoryDynamicConfiguration> {
        self.configuration.clone()
    }
}

impl Default for MemoryConfigCenterFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigCenterFactory for MemoryConfigCenterFactory {
    async fn get_dynamic_configuration(
        &self,
        locator: &Locator,
    ) -> ConfigCenterResult<Arc<dyn DynamicConfiguration>> {
        debug!("创建内存配置源: {}", locator);
        Ok(self.configuration.clone())
    }

    fn protocol(&self) -> &str {
        MEMORY_PROTOCOL
    }
}

/// 文件动态配置源
#[derive(Debug, Clone)]
pub struct FileDynamicConfiguration {
    root: PathBuf,
    default_group: String,
    parser: Arc<PropertiesParser>,
}

impl FileDynamicConfiguration {
    /// 以指定根目录创建
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            default_group: DEFAULT_GROUP.to_string(),
            parser: Arc::new(PropertiesParser::new()),
        }
    }

    /// 设置分组为空时使用的分组
    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    /// 根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 文档路径 `<root>/<group>/<key>`
    pub fn document_path(&self, key: &str, group: &str) -> ConfigCenterResult<PathBuf> {
        let group = if group.is_empty() { self.default_group.as_str() } else { group };

        for part in [group, key] {
            let relative = Path::new(part);
            let safe = !part.is_empty()
                && relative
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !safe {
                return Err(ConfigCenterError::url_construction(
                    format!("{}/{}", group, key),
                    format!("非法的文档路径: {}", part),
                ));
            }
        }

        Ok(self.root.join(group).join(key))
    }
}

#[async_trait]
impl DynamicConfiguration for FileDynamicConfiguration {
    async fn get_properties(&self, key: &str, group: &str) -> ConfigCenterResult<String> {
        let path = self.document_path(key, group)?;
        debug!("读取文件配置文档: {}", path.display());

        tokio::fs::read_to_string(&path).await.map_err(|e| {
            error!("读取文件配置文档失败: {}, 错误: {}", path.display(), e);
            ConfigCenterError::fetch(key, group, e)
        })
    }

    fn parser(&self) -> Arc<dyn ConfigParser> {
        self.parser.clone()
    }

    async fn publish_config(&self, key: &str, group: &str, value: &str) -> ConfigCenterResult<()> {
        let path = self.document_path(key, group)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigCenterError::fetch(key, group, e))?;
        }

        debug!("写入文件配置文档: {}", path.display());
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| ConfigCenterError::fetch(key, group, e))
    }

    fn name(&self) -> &str {
        FILE_PROTOCOL
    }
}

/// 文件驱动工厂
///
/// 根目录取自 `config.rootPath` 参数，否则取定位符的地址与路径
#[derive(Debug, Default, Clone, Copy)]
pub struct FileConfigCenterFactory;

impl FileConfigCenterFactory {
    /// 创建工厂
    pub fn new() -> Self {
        Self
    }

    fn root_of(locator: &Locator) -> ConfigCenterResult<PathBuf> {
        if let Some(root) = locator.param(CONFIG_ROOT_PATH_KEY).filter(|r| !r.is_empty()) {
            return Ok(PathBuf::from(root));
        }

        let root = format!("{}{}", locator.location, locator.path);
        if root.is_empty() {
            return Err(ConfigCenterError::url_construction(
                locator.to_string(),
                "文件配置中心缺少根目录",
            ));
        }
        Ok(PathBuf::from(root))
    }
}

#[async_trait]
impl ConfigCenterFactory for FileConfigCenterFactory {
    async fn get_dynamic_configuration(
        &self,
        locator: &Locator,
    ) -> ConfigCenterResult<Arc<dyn DynamicConfiguration>> {
        let root = Self::root_of(locator)?;
        debug!("创建文件配置源，根目录: {}", root.display());

        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| ConfigCenterError::Connect {
                protocol: FILE_PROTOCOL.to_string(),
                source: Box::new(e),
            })?;

        let configuration = FileDynamicConfiguration::new(root)
            .with_default_group(locator.param_or(CONFIG_GROUP_KEY, DEFAULT_GROUP));
        Ok(Arc::new(configuration))
    }

    fn protocol(&self) -> &str {
        FILE_PROTOCOL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn memory_missing_document_is_empty() {
        let config = MemoryDynamicConfiguration::recording();
        config.insert("dubbo.properties", "dubbo", "a=1");

        assert_eq!(config.get_properties("dubbo.properties", "dubbo").await.unwrap(), "a=1");
        assert_eq!(config.get_properties("dubbo.properties", "other").await.unwrap(), "");
        assert_eq!(
            config.requests(),
            vec![
                ("dubbo.properties".to_string(), "dubbo".to_string()),
                ("dubbo.properties".to_string(), "other".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn memory_does_not_record_by_default() {
        let config = MemoryDynamicConfiguration::new();
        config.insert("dubbo.properties", "dubbo", "a=1");

        config.get_properties("dubbo.properties", "dubbo").await.unwrap();
        config.get_properties("dubbo.properties", "dubbo").await.unwrap();
        assert!(config.requests().is_empty());
    }

    #[tokio::test]
    async fn memory_factory_shares_configuration() {
        let factory = MemoryConfigCenterFactory::new();
        factory.configuration().insert("k", "g", "v=1");

        let source = factory
            .get_dynamic_configuration(&Locator::new("memory", ""))
            .await
            .unwrap();
        assert_eq!(source.get_properties("k", "g").await.unwrap(), "v=1");
    }

    #[tokio::test]
    async fn file_publish_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileDynamicConfiguration::new(dir.path());

        config.publish_config("dubbo.properties", "orders", "a=1").await.unwrap();
        assert!(dir.path().join("orders").join("dubbo.properties").exists());
        assert_eq!(config.get_properties("dubbo.properties", "orders").await.unwrap(), "a=1");
    }

    #[tokio::test]
    async fn file_missing_document_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileDynamicConfiguration::new(dir.path());

        let err = config.get_properties("absent.properties", "dubbo").await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, ConfigCenterError::Fetch { .. }));
    }

    #[tokio::test]
    async fn file_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileDynamicConfiguration::new(dir.path());

        for (key, group) in [("../secret", "dubbo"), ("dubbo.properties", "/etc")] {
            let err = config.document_path(key, group).unwrap_err();
            assert!(matches!(err, ConfigCenterError::UrlConstruction { .. }));
            assert!(!err.is_retryable());
        }

        let err = config.get_properties("../secret", "dubbo").await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn file_factory_uses_root_path_param() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("center");

        let mut params = BTreeMap::new();
        params.insert(CONFIG_ROOT_PATH_KEY.to_string(), root.display().to_string());
        let locator = Locator::new("file", "").with_params(params);

        let source = FileConfigCenterFactory::new()
            .get_dynamic_configuration(&locator)
            .await
            .unwrap();
        assert_eq!(source.name(), "file");
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn file_factory_without_root_fails() {
        let err = FileConfigCenterFactory::new()
            .get_dynamic_configuration(&Locator::new("file", ""))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConfigCenterError::UrlConstruction { .. }));
    }
}
