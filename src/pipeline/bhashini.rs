//! Bhashini（Dhruva）推理流水线客户端：仅使用 translation 任务

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::model::correlate::TranslatedPair;
use crate::model::data_core::TranslateError;
use crate::pipeline::processor::{ProcessRequest, ProcessResponse, TextProcessor};

pub const DEFAULT_PIPELINE_URL: &str = "https://dhruva-api.bhashini.gov.in/services/inference/pipeline";
pub const DEFAULT_SERVICE_ID: &str = "ai4bharat/indictrans-v2-all-gpu--t4";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelinePayload<'a> {
    pipeline_tasks: Vec<PipelineTask<'a>>,
    input_data: InputData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineTask<'a> {
    task_type: &'static str,
    config: TaskConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskConfig<'a> {
    language: LanguagePair<'a>,
    service_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguagePair<'a> {
    source_language: &'a str,
    target_language: &'a str,
}

#[derive(Debug, Serialize)]
struct InputData<'a> {
    input: Vec<SourceItem<'a>>,
}

#[derive(Debug, Serialize)]
struct SourceItem<'a> {
    source: &'a str,
}

#[derive(Debug, Clone)]
pub struct BhashiniClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    service_id: String,
}

impl BhashiniClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        service_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            service_id: service_id.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TranslateError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TranslateError::Config("BHASHINI_API_KEY 未设置".into()))?;
        Self::new(&config.api_url, api_key, &config.service_id, config.timeout)
    }

    /// 构建请求体；输入顺序即 `texts` 顺序
    pub fn build_payload(&self, request: &ProcessRequest) -> Value {
        let payload = PipelinePayload {
            pipeline_tasks: vec![PipelineTask {
                task_type: "translation",
                config: TaskConfig {
                    language: LanguagePair {
                        source_language: &request.source_lang,
                        target_language: &request.target_lang,
                    },
                    service_id: &self.service_id,
                },
            }],
            input_data: InputData {
                input: request.texts.iter().map(|t| SourceItem { source: t }).collect(),
            },
        };
        // 仅包含字符串与数组，序列化不会失败
        serde_json::to_value(payload).unwrap_or(Value::Null)
    }
}

/// 解析流水线响应：`{"pipelineResponse": [...]}` 或直接是数组，取第一个任务的 `output`
pub fn parse_pipeline_response(body: &Value) -> Vec<TranslatedPair> {
    let pipeline = body.get("pipelineResponse").unwrap_or(body);
    let Some(output) = pipeline.get(0).and_then(|task| task.get("output")).and_then(Value::as_array) else {
        tracing::warn!("翻译响应缺少 pipelineResponse[0].output，全部保留原文");
        return Vec::new();
    };

    output
        .iter()
        .map(|item| TranslatedPair {
            source: item.get("source").and_then(Value::as_str).map(str::to_string),
            target: item.get("target").and_then(Value::as_str).map(str::to_string),
        })
        .collect()
}

impl TextProcessor for BhashiniClient {
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse, TranslateError> {
        if request.texts.is_empty() {
            return Ok(ProcessResponse::default());
        }

        let payload = self.build_payload(request);
        let start = Instant::now();
        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("翻译请求失败，状态码 {}: {}", status, detail);
            return Err(TranslateError::Remote(format!("状态码 {}", status.as_u16())));
        }

        let raw: Value = response.json().await?;
        let outputs = parse_pipeline_response(&raw);
        tracing::info!(
            "Bhashini 翻译完成: {} -> {}，{} 条输入，{} 条结果，耗时: {}ms",
            request.source_lang,
            request.target_lang,
            request.texts.len(),
            outputs.len(),
            start.elapsed().as_millis()
        );
        Ok(ProcessResponse { outputs, raw })
    }
}
