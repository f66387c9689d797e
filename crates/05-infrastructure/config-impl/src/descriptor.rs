//! 配置中心描述

use infrastructure_common::constants::{
    CONFIG_APP_ID_KEY, CONFIG_CLUSTER_KEY, CONFIG_GROUP_KEY, CONFIG_LOG_DIR_KEY,
    CONFIG_NAMESPACE_KEY, CONFIG_PASSWORD_KEY, CONFIG_TIMEOUT_KEY, CONFIG_USERNAME_KEY,
    DEFAULT_APP_ID, DEFAULT_CONFIG_FILE, DEFAULT_GROUP, DEFAULT_NAMESPACE,
};
use infrastructure_common::{ConfigCenterError, ConfigCenterResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 配置中心描述
///
/// 配置中心通过命名空间和分组管理键值对：命名空间通常用于隔离租户，
/// 分组用于在同一租户内划分键集合。
///
/// 连接目标有两种写法：内联 `address`，或通过 `remote_ref` 引用
/// 单独声明的 [`RemoteConfig`](config_abstractions::RemoteConfig)。
/// 两者同时存在时以引用为准。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigCenterConfig {
    /// 协议（驱动名称）
    pub protocol: String,
    /// 内联地址
    pub address: String,
    /// 集群
    pub cluster: String,
    /// 全局配置文档所在分组
    pub group: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
    /// 驱动日志目录
    pub log_dir: String,
    /// 全局配置文件名
    pub config_file: String,
    /// 命名空间
    pub namespace: String,
    /// 应用分组下的配置文件名
    pub app_config_file: String,
    /// 应用标识
    pub app_id: String,
    /// 超时，原样转交驱动
    pub timeout: String,
    /// 远程引用名称
    pub remote_ref: String,
    /// 附加参数
    #[serde(alias = "parameters")]
    pub params: HashMap<String, String>,
}

impl Default for ConfigCenterConfig {
    fn default() -> Self {
        Self {
            protocol: String::new(),
            address: String::new(),
            cluster: String::new(),
            group: DEFAULT_GROUP.to_string(),
            username: String::new(),
            password: String::new(),
            log_dir: String::new(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            app_config_file: DEFAULT_CONFIG_FILE.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            timeout: String::new(),
            remote_ref: String::new(),
            params: HashMap::new(),
        }
    }
}

impl ConfigCenterConfig {
    /// 创建带默认值的配置中心描述
    pub fn new(protocol: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    /// 从 TOML 文本加载
    pub fn from_toml_str(content: &str) -> ConfigCenterResult<Self> {
        toml::from_str(content).map_err(|e| ConfigCenterError::Deserialize {
            source: Box::new(e),
        })
    }

    /// 从 YAML 文本加载
    pub fn from_yaml_str(content: &str) -> ConfigCenterResult<Self> {
        serde_yaml::from_str(content).map_err(|e| ConfigCenterError::Deserialize {
            source: Box::new(e),
        })
    }

    /// 设置分组
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// 设置命名空间
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// 设置全局配置文件名
    pub fn with_config_file(mut self, config_file: impl Into<String>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// 设置应用配置文件名
    pub fn with_app_config_file(mut self, app_config_file: impl Into<String>) -> Self {
        self.app_config_file = app_config_file.into();
        self
    }

    /// 设置远程引用名称
    pub fn with_remote_ref(mut self, remote_ref: impl Into<String>) -> Self {
        self.remote_ref = remote_ref.into();
        self
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

    /// 应用分组下实际使用的配置文件名
    pub fn effective_app_config_file(&self) -> &str {
        if self.app_config_file.is_empty() {
            &self.config_file
        } else {
            &self.app_config_file
        }
    }

    /// 生成连接参数
    ///
    /// 固定字段总是出现（包括空字符串），随后叠加附加参数，
    /// 附加参数可以覆盖同名的固定字段。不做任何校验。
    pub fn url_params(&self) -> BTreeMap<String, String> {
        let fixed = [
            (CONFIG_NAMESPACE_KEY, &self.namespace),
            (CONFIG_GROUP_KEY, &self.group),
            (CONFIG_CLUSTER_KEY, &self.cluster),
            (CONFIG_APP_ID_KEY, &self.app_id),
            (CONFIG_LOG_DIR_KEY, &self.log_dir),
            (CONFIG_USERNAME_KEY, &self.username),
            (CONFIG_PASSWORD_KEY, &self.password),
            (CONFIG_TIMEOUT_KEY, &self.timeout),
        ];

        let mut params: BTreeMap<String, String> = fixed
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        for (key, value) in &self.params {
            params.insert(key.clone(), value.clone());
        }
        params
    }
}
