//! # Configuration Implementation
//!
//! 配置中心接入的具体实现：解析连接目标、按协议选择驱动、
//! 拉取全局与应用分组配置并写入配置环境。
//!
//! ## 主要组件
//!
//! - [`ConfigCenterConfig`] - 配置中心描述
//! - [`resolve`] - 连接目标解析
//! - [`FactoryRegistry`] - 驱动工厂注册表
//! - [`Environment`] - 配置环境存储
//! - [`PropertiesParser`] - `.properties` 文档解析器
//! - [`ConfigCenterStarter`] - 配置中心启动器

pub mod descriptor;
pub mod environment;
pub mod parser;
pub mod providers;
pub mod registry;
pub mod resolver;
pub mod starter;

pub use descriptor::*;
pub use environment::*;
pub use parser::*;
pub use providers::*;
pub use registry::*;
pub use resolver::*;
pub use starter::*;

#[cfg(test)]
mod tests;
