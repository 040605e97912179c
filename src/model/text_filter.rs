//! 跳过规则：无需送翻的字符串（空白、时间、版本号、URL）原样保留在原位

use serde::{Deserialize, Serialize};

/// 判定一条字符串是否需要送往翻译服务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFilter {
    pub enabled: bool,
}

impl Default for TextFilter {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl TextFilter {
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn should_translate(&self, s: &str) -> bool {
        if !self.enabled {
            return true;
        }
        let trimmed = s.trim();
        !(trimmed.is_empty()
            || is_time_format(trimmed)
            || is_version_format(trimmed)
            || is_url_format(trimmed))
    }
}

/// 判断是否为时间格式（避免正则表达式性能问题）
pub fn is_time_format(s: &str) -> bool {
    let len = s.len();

    // 快速长度检查
    if !(8..=30).contains(&len) {
        return false;
    }

    let has_time_chars = s.contains('-') || s.contains(':') || s.contains('T') || s.contains('Z');
    if !has_time_chars {
        return false;
    }

    // ISO 8601 格式: 2023-01-01T12:34:56，要求以数字开头，避免误伤普通句子
    if s.starts_with(|c: char| c.is_ascii_digit())
        && s.contains('T')
        && s.contains('-')
        && s.contains(':')
        && !s.contains(' ')
    {
        return true;
    }

    // 日期格式: 2023-01-01
    if s.matches('-').count() == 2 && len <= 12 {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() == 3
            && parts[0].len() == 4
            && parts[1].len() == 2
            && parts[2].len() == 2
            && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
        {
            return true;
        }
    }

    // 时间格式: 12:34:56
    if s.matches(':').count() == 2 && len <= 10 {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())) {
            return true;
        }
    }

    false
}

/// 判断是否为版本号格式（v1.2.3 / 1.0）
pub fn is_version_format(s: &str) -> bool {
    let len = s.len();
    if !(3..=20).contains(&len) || !s.contains('.') {
        return false;
    }

    // 移除可能的v前缀
    let version_str = s.strip_prefix(['v', 'V']).unwrap_or(s);

    // 1-3个点号是合理的版本号
    let parts: Vec<&str> = version_str.split('.').collect();
    (2..=4).contains(&parts.len())
        && parts.iter().all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// 判断是否为URL格式
pub fn is_url_format(s: &str) -> bool {
    // 最短的URL如 http://a 至少7个字符
    if !(7..=2000).contains(&s.len()) {
        return false;
    }

    let lower_s = s.to_lowercase();
    let rest = ["https://", "http://", "ftps://", "ftp://"]
        .iter()
        .find_map(|scheme| lower_s.strip_prefix(scheme));

    match rest {
        // 域名部分应该包含至少一个点或者是localhost
        Some(domain_part) => {
            !domain_part.is_empty() && (domain_part.contains('.') || domain_part.starts_with("localhost"))
        }
        None => false,
    }
}
