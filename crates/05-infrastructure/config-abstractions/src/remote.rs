//! 远程引用配置

use crate::locator::Locator;
use infrastructure_common::constants::{
    CONFIG_PASSWORD_KEY, CONFIG_TIMEOUT_KEY, CONFIG_USERNAME_KEY,
};
use infrastructure_common::ConfigCenterResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 远程引用配置
///
/// 独立声明、按名称复用的连接描述，配置中心描述可以通过
/// `remote_ref` 指向它，而不是内联填写地址。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// 协议，为空时继承引用方的协议
    pub protocol: String,
    /// 地址
    pub address: String,
    /// 超时，原样转交驱动
    pub timeout: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
    /// 附加参数
    #[serde(alias = "parameters")]
    pub params: HashMap<String, String>,
}

impl RemoteConfig {
    /// 创建远程引用配置
    pub fn new(protocol: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    /// 设置超时
    pub fn with_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// 设置认证信息
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// 添加附加参数
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// 生成连接参数
    ///
    /// 认证与超时字段总是出现（即使为空），附加参数可覆盖它们
    pub fn url_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert(CONFIG_USERNAME_KEY.to_string(), self.username.clone());
        params.insert(CONFIG_PASSWORD_KEY.to_string(), self.password.clone());
        params.insert(CONFIG_TIMEOUT_KEY.to_string(), self.timeout.clone());

        for (key, value) in &self.params {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    /// 转换为连接定位符
    pub fn to_locator(&self) -> ConfigCenterResult<Locator> {
        let mut locator = Locator::parse(&self.address, &self.protocol)?;
        if !self.protocol.is_empty() {
            locator.protocol = self.protocol.clone();
        }
        Ok(locator
            .with_credentials(self.username.clone(), self.password.clone())
            .with_params(self.url_params()))
    }
}

/// 远程引用配置注册表 trait
pub trait RemoteConfigRegistry: Send + Sync {
    /// 按名称查找远程引用配置
    fn lookup(&self, name: &str) -> Option<RemoteConfig>;
}

impl RemoteConfigRegistry for HashMap<String, RemoteConfig> {
    fn lookup(&self, name: &str) -> Option<RemoteConfig> {
        self.get(name).cloned()
    }
}

impl RemoteConfigRegistry for BTreeMap<String, RemoteConfig> {
    fn lookup(&self, name: &str) -> Option<RemoteConfig> {
        self.get(name).cloned()
    }
}
