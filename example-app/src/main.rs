//! # 示例应用程序
//!
//! 演示如何从配置文件读取配置中心描述，启动配置中心并读取外部配置

use anyhow::Context;
use clap::Parser;
use config_abstractions::RemoteConfig;
use config_impl::{ConfigCenterConfig, ConfigCenterStarter, Environment, FactoryRegistry, RoleContext};
use infrastructure_common::ApplicationRole;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP 配置中心示例应用")]
struct Args {
    /// 配置文件路径（.toml / .yaml / .yml）
    #[arg(short, long, default_value = "config/app.toml")]
    config: String,

    /// 覆盖配置文件中的应用名
    #[arg(long)]
    app_name: Option<String>,

    /// 覆盖配置文件中的角色
    #[arg(long, value_parser = parse_role)]
    role: Option<ApplicationRole>,

    /// 日志级别，设置了 RUST_LOG 时以其为准
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// 应用配置文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 应用信息
    pub application: ApplicationConfig,
    /// 配置中心描述
    pub config_center: ConfigCenterConfig,
    /// 远程引用配置
    pub remotes: HashMap<String, RemoteConfig>,
}

/// 应用信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// 应用名称
    pub name: String,
    /// 角色
    pub role: ApplicationRole,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: ApplicationRole::Provider,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(&args.log_level)));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("启动配置中心示例应用");

    let app_config = load_app_config(&args.config)?;
    let role = role_context(&args, &app_config.application);

    let environment = Arc::new(Environment::new());
    let starter = ConfigCenterStarter::new(Arc::new(FactoryRegistry::with_builtin()), environment.clone());

    if let Err(e) = starter
        .start(&app_config.config_center, &app_config.remotes, &role)
        .await
    {
        error!("配置中心启动失败: {}", e);
        return Err(e).context("启动配置中心失败");
    }

    print_environment(&environment)?;

    info!("应用已退出");
    Ok(())
}

/// 读取应用配置文件
fn load_app_config(path: &str) -> anyhow::Result<AppConfig> {
    info!("读取配置文件: {}", path);

    let content = std::fs::read_to_string(path).with_context(|| format!("读取配置文件失败: {}", path))?;
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let config = match extension {
        "yaml" | "yml" => serde_yaml::from_str(&content).context("YAML 配置解析失败")?,
        _ => toml::from_str(&content).context("TOML 配置解析失败")?,
    };
    Ok(config)
}

/// 命令行参数优先于配置文件
fn role_context(args: &Args, application: &ApplicationConfig) -> RoleContext {
    let role = args.role.unwrap_or(application.role);
    let name = args.app_name.clone().unwrap_or_else(|| application.name.clone());
    RoleContext::new(role).with_application_name(name)
}

/// 以 JSON 打印加载到的外部配置
fn print_environment(environment: &Environment) -> anyhow::Result<()> {
    let global: BTreeMap<_, _> = environment.external_config().into_iter().collect();
    let app: BTreeMap<_, _> = environment.app_external_config().into_iter().collect();

    let output = serde_json::json!({
        "source": environment.dynamic_configuration().map(|c| c.name().to_string()),
        "global": global,
        "app": app,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_role(value: &str) -> Result<ApplicationRole, String> {
    match value.to_lowercase().as_str() {
        "provider" => Ok(ApplicationRole::Provider),
        "consumer" => Ok(ApplicationRole::Consumer),
        other => Err(format!("未知角色: {}", other)),
    }
}

/// 命令行日志级别转为过滤指令，未知级别按 info 处理
fn log_directive(level: &str) -> String {
    match level.to_lowercase().as_str() {
        level @ ("trace" | "debug" | "info" | "warn" | "error") => level.to_string(),
        _ => "info".to_string(),
    }
}
