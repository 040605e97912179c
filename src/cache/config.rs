//! 缓存配置

use std::time::Duration;

/// 翻译缓存的容量与过期策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// 最大条目数
    pub max_capacity: u64,

    /// 条目存活时间，到期自动淘汰
    pub ttl: Option<Duration>,

    /// 空闲时间，超过该时长未访问即淘汰
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            ttl: Some(Duration::from_secs(3600)), // 1 小时
            tti: None,
        }
    }
}

impl CacheConfig {
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// 关闭 TTL（条目不会因时间过期）
    #[must_use]
    pub fn no_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }
}
