//! # Infrastructure Common
//!
//! 配置中心基础设施的公共类型。
//!
//! ## 核心内容
//!
//! - [`ConfigCenterError`] - 配置中心错误分类
//! - [`StartStage`] - 启动阶段标注
//! - [`ApplicationRole`] - 应用角色
//! - [`constants`] - 约定的参数键与默认值

pub mod constants;
pub mod errors;
pub mod role;

pub use errors::*;
pub use role::*;
