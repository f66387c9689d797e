//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 底层错误的装箱类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置中心启动阶段
///
/// 用于在启动失败时标注出错的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartStage {
    /// 解析连接定位符
    Resolve,
    /// 查找后端驱动工厂
    DriverLookup,
    /// 从驱动获取动态配置源
    Connect,
    /// 拉取全局配置文档
    FetchGlobal,
    /// 拉取应用分组配置文档
    FetchApp,
    /// 解析全局配置文档
    ParseGlobal,
    /// 解析应用分组配置文档
    ParseApp,
}

impl fmt::Display for StartStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resolve => "resolve",
            Self::DriverLookup => "driver-lookup",
            Self::Connect => "connect",
            Self::FetchGlobal => "fetch-global",
            Self::FetchApp => "fetch-app",
            Self::ParseGlobal => "parse-global",
            Self::ParseApp => "parse-app",
        };
        f.write_str(name)
    }
}

/// 配置中心错误类型
#[derive(Error, Debug)]
pub enum ConfigCenterError {
    #[error("找不到远程引用配置: {name}")]
    ReferenceNotFound { name: String },

    #[error("配置中心地址无效: {address}, 原因: {message}")]
    UrlConstruction { address: String, message: String },

    #[error("未注册的配置中心协议: {protocol}")]
    DriverLookup { protocol: String },

    #[error("连接配置中心失败: {protocol}, 原因: {source}")]
    Connect { protocol: String, source: BoxError },

    #[error("拉取配置文档失败: key={key}, group={group}, 原因: {source}")]
    Fetch {
        key: String,
        group: String,
        source: BoxError,
    },

    #[error("配置文档解析失败: {message}")]
    Parse { message: String },

    #[error("配置描述反序列化失败: {source}")]
    Deserialize { source: BoxError },

    #[error("配置中心不支持该操作: {operation}")]
    Unsupported { operation: String },

    #[error("启动配置中心失败 [{stage}]: {source}")]
    Start {
        stage: StartStage,
        source: Box<ConfigCenterError>,
    },
}

impl ConfigCenterError {
    /// 创建地址构造错误
    pub fn url_construction(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UrlConstruction {
            address: address.into(),
            message: message.into(),
        }
    }

    /// 创建文档解析错误
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// 创建拉取错误
    pub fn fetch(
        key: impl Into<String>,
        group: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Fetch {
            key: key.into(),
            group: group.into(),
            source: source.into(),
        }
    }

    /// 以启动阶段包装错误
    pub fn at_stage(self, stage: StartStage) -> Self {
        Self::Start {
            stage,
            source: Box::new(self),
        }
    }

    /// 剥离所有启动阶段包装，返回最内层错误
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Start { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// 失败的启动阶段（未包装时为 `None`）
    pub fn stage(&self) -> Option<StartStage> {
        match self {
            Self::Start { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// 是否可能为瞬时故障
    ///
    /// 本层从不重试，仅供调用方决定是否重新启动
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Fetch { .. } | Self::Connect { .. }
        )
    }
}

/// 结果类型别名
pub type ConfigCenterResult<T> = Result<T, ConfigCenterError>;
