//! Document：待翻译文档的核心状态、错误类型与 JSONPath 读写

use std::path::{Path, PathBuf};

use jsonpath_rust::{JsonPath as _, query::queryable::Queryable}; // 提供 query/query_only_path/reference_mut 等扩展
use serde_json::Value;
use thiserror::Error;

use crate::model::flatten::{flatten, FlatEntry};
use crate::model::path::JsonPath;
use crate::utils::fs::{read_json_file, write_json_file};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
    #[error("路径无法在模板中解析: {path}")]
    PathMismatch { path: JsonPath },
    #[error("HTTP请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("翻译服务返回错误: {0}")]
    Remote(String),
    #[error("配置错误: {0}")]
    Config(String),
    #[error("状态错误: {0}")]
    State(String),
}

/// 已加载的文档及其字符串叶子索引
#[derive(Debug, Default)]
pub struct Document {
    pub source_path: Option<PathBuf>,
    pub dom: Option<Value>,
    pub entries: Vec<FlatEntry>,
}

impl Document {
    pub fn from_value(dom: Value) -> Self {
        Self {
            source_path: None,
            entries: flatten(&dom),
            dom: Some(dom),
        }
    }

    /// 加载JSON文件并建立叶子索引
    pub fn load_file(&mut self, p: &Path) -> Result<(), TranslateError> {
        let dom = read_json_file(p)?;
        self.entries = flatten(&dom);
        self.source_path = Some(p.to_path_buf());
        self.dom = Some(dom);
        tracing::info!("文件加载完成: {}，字符串叶子 {} 个", p.display(), self.entries.len());
        Ok(())
    }

    pub fn dom(&self) -> Result<&Value, TranslateError> {
        self.dom
            .as_ref()
            .ok_or_else(|| TranslateError::State("DOM尚未加载".into()))
    }

    /// 替换 DOM（例如写入译文后），同时刷新叶子索引
    pub fn replace_dom(&mut self, dom: Value) {
        self.entries = flatten(&dom);
        self.dom = Some(dom);
    }

    /// 按 JSONPath 提取第一个匹配节点的 pretty 字符串
    pub fn extract_subtree_pretty(&self, json_path: &str) -> Result<String, TranslateError> {
        let dom = self.dom()?;
        let hits: Vec<&Value> = dom
            .query(json_path)
            .map_err(|e| TranslateError::JsonPath(e.to_string()))?;
        let first = hits
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::JsonPath("未匹配到任何节点".into()))?;
        Ok(serde_json::to_string_pretty(first)?)
    }

    /// 将当前DOM保存到指定路径
    pub fn save_to_file(&self, path: &Path) -> Result<(), TranslateError> {
        write_json_file(path, self.dom()?)
    }
}

/// 查询 scope 命中的全部节点，返回规范化路径；已被祖先覆盖的后代路径会被剔除
pub fn scope_paths(dom: &Value, scope: &str) -> Result<Vec<String>, TranslateError> {
    let mut paths: Vec<String> = dom
        .query_only_path(scope)
        .map_err(|e| TranslateError::JsonPath(e.to_string()))?;
    if paths.is_empty() {
        return Err(TranslateError::JsonPath(format!("未匹配到任何节点: {}", scope)));
    }

    // 祖先在前，便于剔除后代
    paths.sort_by_key(|p| p.len());
    let mut kept: Vec<String> = Vec::with_capacity(paths.len());
    for p in paths {
        let covered = kept.iter().any(|anc| {
            p == *anc
                || (p.starts_with(anc.as_str())
                    && matches!(p[anc.len()..].chars().next(), Some('[') | Some('.')))
        });
        if !covered {
            kept.push(p);
        }
    }
    Ok(kept)
}

/// 取规范化路径处节点的克隆
pub fn node_at(dom: &Value, normalized: &str) -> Result<Value, TranslateError> {
    let hits: Vec<&Value> = dom
        .query(normalized)
        .map_err(|e| TranslateError::JsonPath(e.to_string()))?;
    hits.into_iter()
        .next()
        .cloned()
        .ok_or_else(|| TranslateError::JsonPath(format!("路径不可读取: {}", normalized)))
}

/// 用 replacement 替换规范化路径处的节点
pub fn replace_at(dom: &mut Value, normalized: &str, replacement: Value) -> Result<(), TranslateError> {
    // 通过 reference_mut 按路径获取可变引用（支持 root/field/index 直接访问段）
    if let Some(slot) = dom.reference_mut(normalized) {
        *slot = replacement;
        Ok(())
    } else {
        Err(TranslateError::JsonPath(format!("路径不可更新: {}", normalized)))
    }
}
