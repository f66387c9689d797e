//! 配置中心连接目标解析

use crate::descriptor::ConfigCenterConfig;
use config_abstractions::{Locator, RemoteConfigRegistry};
use infrastructure_common::{ConfigCenterError, ConfigCenterResult};
use tracing::debug;

/// 解析配置中心的连接定位符
///
/// `remote_ref` 为空时直接使用描述中的协议、地址与连接参数；
/// 否则完全以引用的远程配置为准，仅在引用未声明协议时继承描述的协议。
pub fn resolve(
    config: &ConfigCenterConfig,
    remotes: &dyn RemoteConfigRegistry,
) -> ConfigCenterResult<Locator> {
    if config.remote_ref.is_empty() {
        debug!("使用内联地址解析配置中心: {}", config.address);
        let mut locator = Locator::parse(&config.address, &config.protocol)?;
        if !config.protocol.is_empty() {
            locator.protocol = config.protocol.clone();
        }
        return Ok(locator.with_params(config.url_params()));
    }

    debug!("使用远程引用解析配置中心: {}", config.remote_ref);
    let mut remote = remotes
        .lookup(&config.remote_ref)
        .ok_or_else(|| ConfigCenterError::ReferenceNotFound {
            name: config.remote_ref.clone(),
        })?;

    if remote.protocol.is_empty() {
        remote.protocol = config.protocol.clone();
    }

    remote.to_locator()
}
