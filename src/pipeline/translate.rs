//! 翻译流水线：扁平化 → 跳过规则 → 批量翻译 → 位置对齐 → 回写

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::model::correlate::correlate_pairs_counted;
use crate::model::data_core::{node_at, replace_at, scope_paths, TranslateError};
use crate::model::flatten::{flatten, flatten_texts, FlatEntry};
use crate::model::path::{JsonPath, PathSegment};
use crate::model::rebuild::{rebuild, rebuild_lenient, same_shape, ShapeDrift, TranslationRecord};
use crate::model::text_filter::TextFilter;
use crate::pipeline::processor::{ProcessRequest, TextProcessor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    /// 字符串叶子总数
    pub total_leaves: usize,
    /// 实际送翻条数
    pub sent: usize,
    /// 被跳过规则保留的条数
    pub skipped: usize,
    /// 送翻但没有拿到可用结果、回退为原文的条数
    pub fallback: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub translated: Value,
    /// 服务端原始响应；未发起请求时为 Null
    pub raw_response: Value,
    /// 送翻条目的译文记录，路径相对于 `translated` 所在的文档
    pub records: Vec<TranslationRecord>,
    pub stats: TranslationStats,
}

pub struct Translator<P> {
    processor: P,
    source_lang: String,
    filter: TextFilter,
}

impl<P: TextProcessor> Translator<P> {
    pub fn new(processor: P, source_lang: impl Into<String>) -> Self {
        Self {
            processor,
            source_lang: source_lang.into(),
            filter: TextFilter::default(),
        }
    }

    pub fn from_config(processor: P, config: &Config) -> Self {
        let filter = if config.skip_filter { TextFilter::default() } else { TextFilter::disabled() };
        Self::new(processor, &config.source_lang).with_filter(filter)
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TextFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    /// 只返回译文
    pub async fn translate_json(&self, value: &Value, target_lang: &str) -> Result<Value, TranslateError> {
        Ok(self.translate_json_with_raw_response(value, target_lang).await?.translated)
    }

    /// 返回译文、原始响应与统计
    pub async fn translate_json_with_raw_response(
        &self,
        value: &Value,
        target_lang: &str,
    ) -> Result<TranslationOutcome, TranslateError> {
        let start = Instant::now();
        let entries = flatten(value);
        let mut stats = TranslationStats {
            total_leaves: entries.len(),
            ..Default::default()
        };

        if target_lang == self.source_lang {
            tracing::info!("目标语言与源语言相同({})，跳过翻译", target_lang);
            stats.skipped = entries.len();
            return Ok(TranslationOutcome {
                translated: value.clone(),
                raw_response: Value::Null,
                records: Vec::new(),
                stats,
            });
        }

        let to_send: Vec<FlatEntry> = entries
            .into_iter()
            .filter(|e| self.filter.should_translate(&e.text))
            .collect();
        stats.sent = to_send.len();
        stats.skipped = stats.total_leaves - stats.sent;

        if to_send.is_empty() {
            return Ok(TranslationOutcome {
                translated: value.clone(),
                raw_response: Value::Null,
                records: Vec::new(),
                stats,
            });
        }

        let request = ProcessRequest {
            source_lang: self.source_lang.clone(),
            target_lang: target_lang.to_string(),
            texts: flatten_texts(&to_send),
        };
        let response = self.processor.process(&request).await?;

        let (records, fallback) = correlate_pairs_counted(&to_send, &response.outputs);
        stats.fallback = fallback;
        // 路径来自同一份快照，严格回写不会失败
        let translated = rebuild(value, &records)?;

        tracing::info!(
            "翻译完成 -> {}：叶子 {} 个，送翻 {}，跳过 {}，回退 {}，耗时: {}ms",
            target_lang,
            stats.total_leaves,
            stats.sent,
            stats.skipped,
            stats.fallback,
            start.elapsed().as_millis()
        );

        Ok(TranslationOutcome {
            translated,
            raw_response: response.raw,
            records,
            stats,
        })
    }

    /// 只翻译 JSONPath `scope` 命中的节点，其余部分原样保留；所有命中节点合并为一个批次
    pub async fn translate_scoped(
        &self,
        value: &Value,
        scope: &str,
        target_lang: &str,
    ) -> Result<TranslationOutcome, TranslateError> {
        let paths = scope_paths(value, scope)?;
        let roots = paths
            .iter()
            .map(|p| p.parse::<JsonPath>().map_err(TranslateError::JsonPath))
            .collect::<Result<Vec<_>, _>>()?;
        let subtrees = paths
            .iter()
            .map(|p| node_at(value, p))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!("限定范围 {} 命中 {} 个节点", scope, paths.len());

        let mut outcome = self
            .translate_json_with_raw_response(&Value::Array(subtrees), target_lang)
            .await?;

        let Value::Array(translated_nodes) = std::mem::take(&mut outcome.translated) else {
            return Err(TranslateError::State("范围翻译结果结构异常".into()));
        };
        let mut result = value.clone();
        for (p, node) in paths.iter().zip(translated_nodes) {
            replace_at(&mut result, p, node)?;
        }
        outcome.translated = result;

        // 记录路径形如 $[i]...，换回命中节点在原文档中的路径
        for record in &mut outcome.records {
            let Some((PathSegment::Index(i), rest)) = record.path.segments().split_first() else {
                return Err(TranslateError::State(format!("范围翻译记录路径异常: {}", record.path)));
            };
            let root = roots
                .get(*i)
                .ok_or_else(|| TranslateError::State(format!("范围翻译记录越界: {}", record.path)))?;
            record.path = rest.iter().cloned().collect::<JsonPath>().prefixed(root);
        }
        Ok(outcome)
    }
}

/// 把针对 `snapshot` 产生的译文记录应用到 `template`。
///
/// 结构一致时严格回写；结构已漂移时尽力回写并返回漂移报告，不抛错。
pub fn apply_translation(
    snapshot: &Value,
    template: &Value,
    records: &[TranslationRecord],
) -> Result<(Value, Option<ShapeDrift>), TranslateError> {
    if same_shape(snapshot, template) {
        Ok((rebuild(template, records)?, None))
    } else {
        Ok(rebuild_lenient(template, records))
    }
}
