//! 以 (模板标识, 目标语言) 为键缓存回写后的译文

use std::sync::Arc;

use moka::sync::Cache;
use serde_json::Value;

use super::CacheConfig;
use crate::model::data_core::TranslateError;
use crate::pipeline::processor::TextProcessor;
use crate::pipeline::translate::Translator;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub template: String,
    pub lang: String,
}

impl CacheKey {
    pub fn new(template: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            lang: lang.into(),
        }
    }
}

/// 共享同一底层缓存，克隆开销很小
#[derive(Clone)]
pub struct TranslationCache {
    inner: Arc<Cache<CacheKey, Value>>,
}

impl TranslationCache {
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        Self {
            inner: Arc::new(builder.build()),
        }
    }

    pub fn get(&self, template: &str, lang: &str) -> Option<Value> {
        self.inner.get(&CacheKey::new(template, lang))
    }

    pub fn insert(&self, template: &str, lang: &str, translated: Value) {
        self.inner.insert(CacheKey::new(template, lang), translated);
    }

    /// 命中则直接返回；否则调用翻译流水线，只缓存成功的结果
    pub async fn get_or_translate<P: TextProcessor>(
        &self,
        template_key: &str,
        template: &Value,
        lang: &str,
        translator: &Translator<P>,
    ) -> Result<Value, TranslateError> {
        if let Some(hit) = self.get(template_key, lang) {
            tracing::debug!("缓存命中: {}-{}", template_key, lang);
            return Ok(hit);
        }

        let translated = translator.translate_json(template, lang).await?;
        self.insert(template_key, lang, translated.clone());
        Ok(translated)
    }

    /// 模板被替换时调用：清除该模板在所有语言下的译文
    pub fn invalidate_template(&self, template_key: &str) {
        let stale: Vec<Arc<CacheKey>> = self
            .inner
            .iter()
            .filter(|(k, _)| k.template == template_key)
            .map(|(k, _)| k)
            .collect();
        for key in &stale {
            self.inner.invalidate(key.as_ref());
        }
        if !stale.is_empty() {
            tracing::info!("模板 {} 已替换，清除 {} 条缓存译文", template_key, stale.len());
        }
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// 近似条目数（并发写入下可能略有滞后）
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}
