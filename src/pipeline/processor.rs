//! 外部批量文本处理服务的接口：有序字符串进，有序结果出

use std::future::Future;

use serde_json::Value;

use crate::model::correlate::TranslatedPair;
use crate::model::data_core::TranslateError;

/// 一次批量请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub texts: Vec<String>,
}

/// 一次批量响应：结构化结果 + 服务端原始响应
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessResponse {
    pub outputs: Vec<TranslatedPair>,
    pub raw: Value,
}

pub trait TextProcessor: Send + Sync {
    fn process(
        &self,
        request: &ProcessRequest,
    ) -> impl Future<Output = Result<ProcessResponse, TranslateError>> + Send;
}

impl<P: TextProcessor> TextProcessor for &P {
    fn process(
        &self,
        request: &ProcessRequest,
    ) -> impl Future<Output = Result<ProcessResponse, TranslateError>> + Send {
        (**self).process(request)
    }
}

impl<P: TextProcessor> TextProcessor for std::sync::Arc<P> {
    fn process(
        &self,
        request: &ProcessRequest,
    ) -> impl Future<Output = Result<ProcessResponse, TranslateError>> + Send {
        (**self).process(request)
    }
}
