//! # Configuration Abstractions
//!
//! 配置中心抽象层，定义配置中心接入的核心接口和约定。
//!
//! ## 核心接口
//!
//! - [`Locator`] - 配置中心连接定位符
//! - [`DynamicConfiguration`] - 由驱动提供的动态配置源
//! - [`ConfigParser`] - 配置文档解析器
//! - [`ConfigCenterFactory`] - 按协议创建动态配置源的驱动工厂
//! - [`RemoteConfigRegistry`] - 远程引用配置注册表

pub mod factory;
pub mod locator;
pub mod provider;
pub mod remote;

pub use factory::*;
pub use locator::*;
pub use provider::*;
pub use remote::*;
