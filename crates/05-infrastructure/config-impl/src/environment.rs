//! 配置环境存储
//!
//! 保存当前生效的动态配置源，以及从配置中心拉取的全局配置与应用配置。
//! 各字段自带读写锁，写入方无需额外加锁；同一字段以最后一次写入为准。

use config_abstractions::DynamicConfiguration;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// 进程级默认环境
static GLOBAL_ENVIRONMENT: Lazy<Arc<Environment>> = Lazy::new(|| Arc::new(Environment::new()));

/// 获取进程级默认环境
///
/// 新代码应显式构造并传递 [`Environment`]
pub fn global_environment() -> Arc<Environment> {
    GLOBAL_ENVIRONMENT.clone()
}

/// 配置环境
#[derive(Default)]
pub struct Environment {
    dynamic_configuration: RwLock<Option<Arc<dyn DynamicConfiguration>>>,
    external_config: RwLock<HashMap<String, String>>,
    app_external_config: RwLock<HashMap<String, String>>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field(
                "dynamic_configuration",
                &self.dynamic_configuration.read().as_ref().map(|c| c.name().to_string()),
            )
            .field("external_config_len", &self.external_config.read().len())
            .field("app_external_config_len", &self.app_external_config.read().len())
            .finish()
    }
}

impl Environment {
    /// 创建空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置当前动态配置源，覆盖之前的配置源
    pub fn set_dynamic_configuration(&self, configuration: Arc<dyn DynamicConfiguration>) {
        debug!("设置动态配置源: {}", configuration.name());
        *self.dynamic_configuration.write() = Some(configuration);
    }

    /// 获取当前动态配置源
    pub fn dynamic_configuration(&self) -> Option<Arc<dyn DynamicConfiguration>> {
        self.dynamic_configuration.read().clone()
    }

    /// 替换全局外部配置
    pub fn update_external_config_map(&self, config: HashMap<String, String>) {
        debug!("更新全局外部配置，共 {} 项", config.len());
        *self.external_config.write() = config;
    }

    /// 替换应用外部配置
    pub fn update_app_external_config_map(&self, config: HashMap<String, String>) {
        debug!("更新应用外部配置，共 {} 项", config.len());
        *self.app_external_config.write() = config;
    }

    /// 全局外部配置快照
    pub fn external_config(&self) -> HashMap<String, String> {
        self.external_config.read().clone()
    }

    /// 应用外部配置快照
    pub fn app_external_config(&self) -> HashMap<String, String> {
        self.app_external_config.read().clone()
    }

    /// 分层配置视图，应用配置优先于全局配置
    pub fn configuration(&self) -> LayeredConfiguration {
        LayeredConfiguration {
            layers: vec![self.app_external_config(), self.external_config()],
        }
    }

    /// 按分层顺序查找配置项
    pub fn get_property(&self, key: &str) -> Option<String> {
        if let Some(value) = self.app_external_config.read().get(key) {
            return Some(value.clone());
        }
        self.external_config.read().get(key).cloned()
    }

    /// 列出 `prefix.` 之下的下一级键名
    pub fn get_sub_property(&self, prefix: &str) -> BTreeSet<String> {
        self.configuration().get_sub_property(prefix)
    }

    /// 清空环境
    pub fn clear(&self) {
        *self.dynamic_configuration.write() = None;
        self.external_config.write().clear();
        self.app_external_config.write().clear();
    }
}

/// 分层配置视图
///
/// 按层顺序查找，前面的层优先
#[derive(Debug, Clone, Default)]
pub struct LayeredConfiguration {
    layers: Vec<HashMap<String, String>>,
}

impl LayeredConfiguration {
    /// 查找配置项
    pub fn get_property(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .find_map(|layer| layer.get(key))
            .map(String::as_str)
    }

    /// 查找配置项，不存在时返回默认值
    pub fn get_property_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_property(key).unwrap_or(default)
    }

    /// 列出 `prefix.` 之下的下一级键名
    pub fn get_sub_property(&self, prefix: &str) -> BTreeSet<String> {
        let prefix = format!("{}.", prefix);
        self.layers
            .iter()
            .flat_map(|layer| layer.keys())
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('.').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 层数
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
