//! 配置中心启动器
//!
//! 解析连接目标，通过驱动获取动态配置源，拉取全局配置与应用分组配置，
//! 解析后写入 [`Environment`]。

use crate::descriptor::ConfigCenterConfig;
use crate::environment::Environment;
use crate::registry::FactoryRegistry;
use crate::resolver::resolve;
use config_abstractions::RemoteConfigRegistry;
use infrastructure_common::{ApplicationRole, ConfigCenterResult, StartStage};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 持有配置中心描述的角色上下文
///
/// 由调用方给出角色与应用名，应用名决定应用分组配置所在的分组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleContext {
    /// 角色
    pub role: ApplicationRole,
    /// 应用名
    pub application_name: Option<String>,
}

impl RoleContext {
    /// 创建未配置应用名的上下文
    pub fn new(role: ApplicationRole) -> Self {
        Self {
            role,
            application_name: None,
        }
    }

    /// 服务提供方上下文
    pub fn provider(application_name: impl Into<String>) -> Self {
        Self::new(ApplicationRole::Provider).with_application_name(application_name)
    }

    /// 服务消费方上下文
    pub fn consumer(application_name: impl Into<String>) -> Self {
        Self::new(ApplicationRole::Consumer).with_application_name(application_name)
    }

    /// 设置应用名
    pub fn with_application_name(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = Some(application_name.into());
        self
    }

    /// 应用分组名，未配置或为空时为 `None`
    pub fn app_group(&self) -> Option<&str> {
        self.application_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// 配置中心启动器
#[derive(Debug, Clone)]
pub struct ConfigCenterStarter {
    factories: Arc<FactoryRegistry>,
    environment: Arc<Environment>,
}

impl ConfigCenterStarter {
    /// 创建启动器
    pub fn new(factories: Arc<FactoryRegistry>, environment: Arc<Environment>) -> Self {
        Self {
            factories,
            environment,
        }
    }

    /// 写入目标环境
    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// 启动配置中心
    ///
    /// 任一步骤失败即返回，错误以 [`StartStage`] 标注。应用分组文档
    /// 为空时保留环境中原有的应用配置。
    ///
    /// 同一进程内多个角色并发启动时，动态配置源以最后写入者为准，
    /// 调用方需要自行串行化。
    pub async fn start(
        &self,
        config: &ConfigCenterConfig,
        remotes: &dyn RemoteConfigRegistry,
        role: &RoleContext,
    ) -> ConfigCenterResult<()> {
        info!("启动配置中心，角色: {}", role.role);

        let locator = resolve(config, remotes).map_err(|e| {
            error!("解析配置中心地址失败: {}", e);
            e.at_stage(StartStage::Resolve)
        })?;
        debug!("配置中心定位符: {}", locator);

        let factory = self
            .factories
            .get(&locator.protocol)
            .map_err(|e| e.at_stage(StartStage::DriverLookup))?;

        let dynamic_config = factory
            .get_dynamic_configuration(&locator)
            .await
            .map_err(|e| {
                error!("获取动态配置源失败: {}", e);
                e.at_stage(StartStage::Connect)
            })?;

        self.environment.set_dynamic_configuration(dynamic_config.clone());

        let content = dynamic_config
            .get_properties(&config.config_file, &config.group)
            .await
            .map_err(|e| {
                error!("拉取全局配置失败: {}", e);
                e.at_stage(StartStage::FetchGlobal)
            })?;

        let mut app_content = String::new();
        if let Some(app_group) = role.app_group() {
            let app_config_file = config.effective_app_config_file();
            debug!("拉取应用配置: group={}, key={}", app_group, app_config_file);

            app_content = dynamic_config
                .get_properties(app_config_file, app_group)
                .await
                .map_err(|e| {
                    error!("拉取应用配置失败: {}", e);
                    e.at_stage(StartStage::FetchApp)
                })?;
        }

        let parser = dynamic_config.parser();

        let global = parser
            .parse(&content)
            .map_err(|e| e.at_stage(StartStage::ParseGlobal))?;
        info!("加载全局外部配置 {} 项", global.len());
        self.environment.update_external_config_map(global);

        if !app_content.is_empty() {
            let app = parser
                .parse(&app_content)
                .map_err(|e| e.at_stage(StartStage::ParseApp))?;
            info!("加载应用外部配置 {} 项", app.len());
            self.environment.update_app_external_config_map(app);
        }

        Ok(())
    }
}
