//! 动态配置源抽象接口

use async_trait::async_trait;
use infrastructure_common::{ConfigCenterError, ConfigCenterResult};
use std::collections::HashMap;
use std::sync::Arc;

/// 配置文档解析器 trait
///
/// 把配置中心返回的原始文档转换为键值映射
pub trait ConfigParser: Send + Sync {
    /// 解析配置文档
    fn parse(&self, content: &str) -> ConfigCenterResult<HashMap<String, String>>;

    /// 获取解析器名称
    fn name(&self) -> &str;
}

/// 动态配置源 trait
///
/// 由后端驱动提供，按 `(key, group)` 定位配置文档。
/// 实现可能发起网络请求，超时与重试由实现自行负责。
#[async_trait]
pub trait DynamicConfiguration: Send + Sync {
    /// 获取分组下的配置文档原文
    async fn get_properties(&self, key: &str, group: &str) -> ConfigCenterResult<String>;

    /// 获取配置文档解析器
    fn parser(&self) -> Arc<dyn ConfigParser>;

    /// 发布配置文档
    async fn publish_config(&self, key: &str, group: &str, _value: &str) -> ConfigCenterResult<()> {
        Err(ConfigCenterError::Unsupported {
            operation: format!("publish_config({}, {}) on {}", key, group, self.name()),
        })
    }

    /// 获取配置源名称
    fn name(&self) -> &str;
}
