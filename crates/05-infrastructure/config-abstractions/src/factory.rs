//! 配置中心驱动工厂抽象接口

use crate::locator::Locator;
use crate::provider::DynamicConfiguration;
use async_trait::async_trait;
use infrastructure_common::ConfigCenterResult;
use std::sync::Arc;

/// 配置中心驱动工厂 trait
///
/// 每种协议注册一个工厂，由工厂根据定位符创建动态配置源
#[async_trait]
pub trait ConfigCenterFactory: Send + Sync {
    /// 创建动态配置源
    async fn get_dynamic_configuration(
        &self,
        locator: &Locator,
    ) -> ConfigCenterResult<Arc<dyn DynamicConfiguration>>;

    /// 获取工厂对应的协议名
    fn protocol(&self) -> &str;
}
