//! 配置中心连接定位符

use infrastructure_common::constants::PROTOCOL_SEPARATOR;
use infrastructure_common::{ConfigCenterError, ConfigCenterResult};
use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

/// 配置中心连接定位符
///
/// 形如 `protocol://[user:pass@]location[/path][?k=v]`，
/// `location` 可以是逗号分隔的集群地址（`h1:2181,h2:2181`）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    /// 协议（驱动名称）
    pub protocol: String,
    /// 地址，可能为集群地址
    pub location: String,
    /// 路径部分（包含前导 `/`）
    pub path: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
    /// 查询参数
    pub params: BTreeMap<String, String>,
}

impl Locator {
    /// 创建只含协议与地址的定位符
    pub fn new(protocol: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    /// 解析地址字符串
    ///
    /// 地址不含 `://` 时以 `default_protocol` 作为协议；
    /// 两者都无法给出协议时返回 [`ConfigCenterError::UrlConstruction`]。
    pub fn parse(address: &str, default_protocol: &str) -> ConfigCenterResult<Self> {
        let (scheme, rest) = match address.split_once(PROTOCOL_SEPARATOR) {
            Some((scheme, rest)) => (scheme, rest),
            None => (default_protocol, address),
        };

        if scheme.is_empty() {
            return Err(ConfigCenterError::url_construction(address, "缺少协议"));
        }
        if !is_valid_scheme(scheme) {
            return Err(ConfigCenterError::url_construction(
                address,
                format!("协议名非法: {}", scheme),
            ));
        }

        let (target, query) = match rest.split_once('?') {
            Some((target, query)) => (target, query),
            None => (rest, ""),
        };

        let (authority, path) = match target.find('/') {
            Some(index) => target.split_at(index),
            None => (target, ""),
        };

        let (userinfo, location) = match authority.rsplit_once('@') {
            Some((userinfo, location)) => (Some(userinfo), location),
            None => (None, authority),
        };

        validate_location(address, location)?;

        let (username, password) = match userinfo {
            Some(info) => match info.split_once(':') {
                Some((user, pass)) => (decode(user), decode(pass)),
                None => (decode(info), String::new()),
            },
            None => (String::new(), String::new()),
        };

        let params = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            protocol: scheme.to_string(),
            location: location.to_string(),
            path: path.to_string(),
            username,
            password,
            params,
        })
    }

    /// 替换全部查询参数
    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// 设置协议
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// 设置认证信息
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// 获取参数
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// 获取参数，不存在或为空时返回默认值
    pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.param(key) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    /// 集群中的各个地址
    pub fn addresses(&self) -> Vec<&str> {
        self.location
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl fmt::Display for Locator {
    /// 渲染为字符串，密码以 `***` 代替
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.protocol, PROTOCOL_SEPARATOR)?;
        if !self.username.is_empty() {
            write!(f, "{}", self.username)?;
            if !self.password.is_empty() {
                f.write_str(":***")?;
            }
            f.write_str("@")?;
        }
        write!(f, "{}{}", self.location, self.path)?;
        if !self.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter())
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn validate_location(address: &str, location: &str) -> ConfigCenterResult<()> {
    if location.chars().any(char::is_whitespace) {
        return Err(ConfigCenterError::url_construction(address, "地址中包含空白字符"));
    }

    for host in location.split(',').filter(|s| !s.is_empty()) {
        // [::1]:2181 形式的 IPv6 地址
        let port = match host.strip_prefix('[') {
            Some(bracketed) => match bracketed.split_once(']') {
                Some((_, tail)) => tail.strip_prefix(':'),
                None => {
                    return Err(ConfigCenterError::url_construction(address, "IPv6 地址缺少 ']'"));
                }
            },
            None => host.rsplit_once(':').map(|(_, port)| port),
        };

        if let Some(port) = port {
            if port.parse::<u16>().is_err() {
                return Err(ConfigCenterError::url_construction(
                    address,
                    format!("端口无效: {}", port),
                ));
            }
        }
    }
    Ok(())
}

fn decode(raw: &str) -> String {
    form_urlencoded::parse(format!("v={}", raw).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}
