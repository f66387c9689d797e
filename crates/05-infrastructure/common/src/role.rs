//! 应用角色定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 持有配置中心描述的应用角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationRole {
    /// 服务提供方
    Provider,
    /// 服务消费方
    Consumer,
}

impl ApplicationRole {
    /// 角色名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Consumer => "consumer",
        }
    }
}

impl fmt::Display for ApplicationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
