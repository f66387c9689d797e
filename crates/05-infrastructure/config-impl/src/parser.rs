//! `.properties` 配置文档解析器

use config_abstractions::ConfigParser;
use infrastructure_common::{ConfigCenterError, ConfigCenterResult};
use std::collections::HashMap;

/// `.properties` 格式解析器
///
/// 支持 `#`/`!` 注释、`=`/`:`/空白分隔、行尾反斜杠续行以及
/// `\t \n \r \f \uXXXX` 转义。重复的键以最后一次出现为准。
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// 创建解析器
    pub fn new() -> Self {
        Self
    }
}

impl ConfigParser for PropertiesParser {
    fn parse(&self, content: &str) -> ConfigCenterResult<HashMap<String, String>> {
        let mut properties = HashMap::new();

        for (line_no, line) in logical_lines(content) {
            let (raw_key, raw_value) = split_key_value(&line);
            let key = unescape(raw_key).map_err(|m| {
                ConfigCenterError::parse(format!("第 {} 行: {}", line_no, m))
            })?;
            let value = unescape(raw_value).map_err(|m| {
                ConfigCenterError::parse(format!("第 {} 行: {}", line_no, m))
            })?;
            properties.insert(key, value);
        }

        Ok(properties)
    }

    fn name(&self) -> &str {
        "properties"
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// 按 `\n`、`\r\n` 或单独的 `\r` 切分自然行
fn natural_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// 合并续行并去掉注释与空行，返回 (起始行号, 逻辑行)
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, natural) in natural_lines(content).enumerate() {
        let trimmed = natural.trim_start_matches(is_blank);

        let (start, mut buffer) = match current.take() {
            Some(pending) => pending,
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        let trailing = trimmed.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            buffer.push_str(&trimmed[..trimmed.len() - 1]);
            current = Some((start, buffer));
        } else {
            buffer.push_str(trimmed);
            lines.push((start, buffer));
        }
    }

    if let Some(pending) = current {
        lines.push(pending);
    }
    lines
}

/// 在第一个未转义的分隔符处切分键和值
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = index;
            break;
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix(&['=', ':'][..])
        .unwrap_or(rest)
        .trim_start_matches(is_blank);
    (key, rest)
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err(format!("不完整的 unicode 转义: \\u{}", hex));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("非法的 unicode 转义: \\u{}", hex))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("非法的 unicode 码点: \\u{}", hex))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
