//! 配置中心约定的键名与默认值

/// 默认分组
pub const DEFAULT_GROUP: &str = "dubbo";

/// 默认命名空间
pub const DEFAULT_NAMESPACE: &str = "dubbo";

/// 默认应用标识
pub const DEFAULT_APP_ID: &str = "dubbo";

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "dubbo.properties";

/// 协议分隔符
pub const PROTOCOL_SEPARATOR: &str = "://";

/// 命名空间参数
pub const CONFIG_NAMESPACE_KEY: &str = "config.namespace";
/// 分组参数
pub const CONFIG_GROUP_KEY: &str = "config.group";
/// 集群参数
pub const CONFIG_CLUSTER_KEY: &str = "config.cluster";
/// 应用标识参数
pub const CONFIG_APP_ID_KEY: &str = "config.appId";
/// 日志目录参数
pub const CONFIG_LOG_DIR_KEY: &str = "config.logDir";
/// 用户名参数
pub const CONFIG_USERNAME_KEY: &str = "config.username";
/// 密码参数
pub const CONFIG_PASSWORD_KEY: &str = "config.password";
/// 超时参数
pub const CONFIG_TIMEOUT_KEY: &str = "config.timeout";

/// 文件驱动的根目录参数
pub const CONFIG_ROOT_PATH_KEY: &str = "config.rootPath";

/// 内存驱动协议名
pub const MEMORY_PROTOCOL: &str = "memory";

/// 文件驱动协议名
pub const FILE_PROTOCOL: &str = "file";
