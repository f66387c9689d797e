//! 配置中心驱动工厂注册表

use crate::providers::{FileConfigCenterFactory, MemoryConfigCenterFactory};
use config_abstractions::ConfigCenterFactory;
use infrastructure_common::{ConfigCenterError, ConfigCenterResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// 驱动工厂注册表
///
/// 协议名到驱动工厂的映射，通常在进程启动时注册完毕
#[derive(Default)]
pub struct FactoryRegistry {
    factories: RwLock<HashMap<String, Arc<dyn ConfigCenterFactory>>>,
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("protocols", &self.protocols())
            .finish()
    }
}

impl FactoryRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建并注册内置的 `memory` 与 `file` 驱动
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(MemoryConfigCenterFactory::new()));
        registry.register(Arc::new(FileConfigCenterFactory::new()));
        registry
    }

    /// 注册驱动工厂，同名协议的旧工厂会被替换
    pub fn register(&self, factory: Arc<dyn ConfigCenterFactory>) {
        let protocol = factory.protocol().to_string();
        info!("注册配置中心驱动: {}", protocol);

        if self.factories.write().insert(protocol.clone(), factory).is_some() {
            warn!("配置中心驱动 {} 已存在，旧工厂被替换", protocol);
        }
    }

    /// 移除驱动工厂
    pub fn unregister(&self, protocol: &str) -> Option<Arc<dyn ConfigCenterFactory>> {
        let removed = self.factories.write().remove(protocol);
        if removed.is_some() {
            info!("移除配置中心驱动: {}", protocol);
        }
        removed
    }

    /// 按协议获取驱动工厂
    pub fn get(&self, protocol: &str) -> ConfigCenterResult<Arc<dyn ConfigCenterFactory>> {
        self.factories
            .read()
            .get(protocol)
            .cloned()
            .ok_or_else(|| ConfigCenterError::DriverLookup {
                protocol: protocol.to_string(),
            })
    }

    /// 协议是否已注册
    pub fn contains(&self, protocol: &str) -> bool {
        self.factories.read().contains_key(protocol)
    }

    /// 已注册的协议列表（已排序）
    pub fn protocols(&self) -> Vec<String> {
        let mut protocols: Vec<String> = self.factories.read().keys().cloned().collect();
        protocols.sort();
        protocols
    }
}
