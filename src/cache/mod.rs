//! 翻译结果缓存（Moka）
//!
//! 缓存是显式对象，由调用方持有并传入；核心的扁平化/回写不依赖任何全局状态。

mod config;
mod translation;

pub use config::CacheConfig;
pub use translation::{CacheKey, TranslationCache};
