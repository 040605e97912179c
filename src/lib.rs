//! Samadhan 多语言内容翻译库
//!
//! 提供任意 JSON 内容的结构保持翻译：扁平化字符串叶子、批量送往外部翻译服务、
//! 按位置对齐结果并回写，数字/布尔/空值与结构原样保留

pub mod cache;
pub mod config;
pub mod model;
pub mod pipeline;
pub mod utils;

// 重新导出主要类型
pub use cache::{CacheConfig, TranslationCache};
pub use config::Config;
pub use model::correlate::{correlate, correlate_pairs, correlate_pairs_counted, TranslatedPair};
pub use model::data_core::{Document, TranslateError};
pub use model::flatten::{flatten, flatten_texts, FlatEntry};
pub use model::path::{JsonPath, PathSegment};
pub use model::rebuild::{rebuild, rebuild_lenient, same_shape, ShapeDrift, TranslationRecord};
pub use model::text_filter::TextFilter;
pub use pipeline::bhashini::BhashiniClient;
pub use pipeline::processor::{ProcessRequest, ProcessResponse, TextProcessor};
pub use pipeline::translate::{apply_translation, TranslationOutcome, TranslationStats, Translator};
