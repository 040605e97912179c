//! 配置：先读取 .env，再读取环境变量；命令行参数可覆盖

use std::env;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::model::data_core::TranslateError;
use crate::pipeline::bhashini::{DEFAULT_PIPELINE_URL, DEFAULT_SERVICE_ID};

#[derive(Debug, Clone)]
pub struct Config {
    // Bhashini
    pub api_url: String,
    /// 远程翻译必需；仅做本地扁平化/基准测试时可以缺省
    pub api_key: Option<String>,
    pub service_id: String,

    pub source_lang: String,
    pub timeout: Duration,
    /// 是否跳过空白/时间/版本号/URL 等无需翻译的字符串
    pub skip_filter: bool,

    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PIPELINE_URL.to_string(),
            api_key: None,
            service_id: DEFAULT_SERVICE_ID.to_string(),
            source_lang: "en".to_string(),
            timeout: Duration::from_secs(30),
            skip_filter: true,
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, TranslateError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试，不触碰进程环境）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TranslateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = parse_u64(&get, "TRANSLATE_TIMEOUT_SECS")?.unwrap_or(defaults.timeout.as_secs());
        if timeout_secs == 0 {
            return Err(TranslateError::Config("TRANSLATE_TIMEOUT_SECS 必须大于 0".into()));
        }
        let cache_capacity = parse_u64(&get, "TRANSLATE_CACHE_CAPACITY")?.unwrap_or(defaults.cache.max_capacity);
        let cache_ttl = parse_u64(&get, "TRANSLATE_CACHE_TTL_SECS")?;

        let skip_filter = match get("TRANSLATE_SKIP_FILTER").map(|v| v.to_lowercase()) {
            None => defaults.skip_filter,
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
            Some(v) => {
                return Err(TranslateError::Config(format!("TRANSLATE_SKIP_FILTER 取值无效: {}", v)));
            }
        };

        let mut cache = CacheConfig::with_capacity(cache_capacity);
        if let Some(secs) = cache_ttl {
            cache = if secs == 0 { cache.no_ttl() } else { cache.ttl(Duration::from_secs(secs)) };
        }

        Ok(Self {
            api_url: get("BHASHINI_API_URL").unwrap_or(defaults.api_url),
            api_key: get("BHASHINI_API_KEY"),
            service_id: get("BHASHINI_SERVICE_ID").unwrap_or(defaults.service_id),
            source_lang: get("TRANSLATE_SOURCE_LANG").unwrap_or(defaults.source_lang),
            timeout: Duration::from_secs(timeout_secs),
            skip_filter,
            cache,
        })
    }
}

fn parse_u64<G>(get: &G, key: &str) -> Result<Option<u64>, TranslateError>
where
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| TranslateError::Config(format!("{} 必须是非负整数: {}", key, v)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).expect("默认配置应该成功");
        assert_eq!(config.api_url, DEFAULT_PIPELINE_URL);
        assert_eq!(config.service_id, DEFAULT_SERVICE_ID);
        assert_eq!(config.source_lang, "en");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
        assert!(config.skip_filter);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BHASHINI_API_KEY", " secret "),
            ("TRANSLATE_SOURCE_LANG", "hi"),
            ("TRANSLATE_TIMEOUT_SECS", "5"),
            ("TRANSLATE_CACHE_CAPACITY", "10"),
            ("TRANSLATE_CACHE_TTL_SECS", "0"),
            ("TRANSLATE_SKIP_FILTER", "off"),
        ]))
        .expect("配置应该成功");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.source_lang, "hi");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cache.max_capacity, 10);
        assert!(config.cache.ttl.is_none());
        assert!(!config.skip_filter);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("BHASHINI_API_KEY", "  "), ("BHASHINI_API_URL", "")]))
            .expect("配置应该成功");
        assert!(config.api_key.is_none());
        assert_eq!(config.api_url, DEFAULT_PIPELINE_URL);
    }

    #[test]
    fn test_invalid_numbers_are_config_errors() {
        let result = Config::from_lookup(lookup(&[("TRANSLATE_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(TranslateError::Config(_))));

        let result = Config::from_lookup(lookup(&[("TRANSLATE_SKIP_FILTER", "maybe")]));
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Config::from_lookup(lookup(&[("TRANSLATE_TIMEOUT_SECS", "0")]));
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }
}
