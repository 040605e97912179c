//! 扁平化：深度优先收集所有字符串叶子及其路径
//!
//! 对象按键的迭代顺序、数组按下标顺序访问；数字/布尔/空不产出条目，
//! 它们留在模板副本中由回写阶段原样保留。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::path::JsonPath;

/// 一个字符串叶子：路径 + 原文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub path: JsonPath,
    pub text: String,
}

/// 扁平化任意 JSON 值。对所有输入都是全函数，不会失败。
pub fn flatten(root: &Value) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    fn walk(out: &mut Vec<FlatEntry>, v: &Value, path: &mut JsonPath) {
        match v {
            Value::String(s) => out.push(FlatEntry {
                path: path.clone(),
                text: s.clone(),
            }),
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    path.push(idx);
                    walk(out, child, path);
                    path.pop();
                }
            }
            Value::Object(map) => {
                for (k, child) in map {
                    path.push(k.as_str());
                    walk(out, child, path);
                    path.pop();
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }

    walk(&mut out, root, &mut JsonPath::root());
    out
}

/// 按顺序取出待发送的文本批次（不去重、不重排）
pub fn flatten_texts(entries: &[FlatEntry]) -> Vec<String> {
    entries.iter().map(|e| e.text.clone()).collect()
}

/// 轻量预览（长字符串截断），供命令行列出叶子使用
pub fn preview_of(text: &str) -> String {
    let s = text.trim();
    if s.chars().count() > 32 {
        let truncated: String = s.chars().take(32).collect();
        format!("\"{}...\"", truncated)
    } else {
        format!("\"{}\"", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_path;
    use serde_json::json;

    #[test]
    fn test_non_string_values_emit_nothing() {
        let v = json!({"a": 1, "b": true, "c": null, "d": [1, 2, 3]});
        assert!(flatten(&v).is_empty());
        assert!(flatten(&json!({})).is_empty());
        assert!(flatten(&json!([])).is_empty());
        assert!(flatten(&json!(42)).is_empty());
    }

    #[test]
    fn test_top_level_string_has_root_path() {
        let entries = flatten(&json!("नमस्ते"));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.is_root());
        assert_eq!(entries[0].text, "नमस्ते");
    }

    #[test]
    fn test_nested_paths_in_traversal_order() {
        let v = json!({
            "list": [{"name": "Bob"}, {"name": "Sue"}],
            "meta": {"count": 2}
        });
        let entries = flatten(&v);
        let paths: Vec<_> = entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![json_path!["list", 0usize, "name"], json_path!["list", 1usize, "name"]]
        );
        assert_eq!(flatten_texts(&entries), vec!["Bob", "Sue"]);
    }

    #[test]
    fn test_object_keys_follow_document_order() {
        // preserve_order：键按文档顺序，而非字典序
        let v: Value = serde_json::from_str(r#"{"zeta": "z", "alpha": "a", "mid": ["m"]}"#).unwrap();
        let texts = flatten_texts(&flatten(&v));
        assert_eq!(texts, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_text_keeps_distinct_paths() {
        let v = json!({"x": "hello", "y": "hello"});
        let entries = flatten(&v);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, json_path!["x"]);
        assert_eq!(entries[1].path, json_path!["y"]);
        assert!(entries.iter().all(|e| e.text == "hello"));
    }

    #[test]
    fn test_mixed_array_skips_scalars() {
        let v = json!(["a", 1, null, ["b", false], {"k": "c"}]);
        let entries = flatten(&v);
        let rendered: Vec<String> = entries.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(rendered, vec!["$[0]", "$[3][0]", "$[4].k"]);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let v = json!({"title": "Mediation", "steps": ["file", "meet", {"note": "sign"}]});
        assert_eq!(flatten(&v), flatten(&v));
    }

    #[test]
    fn test_preview_truncates_long_text() {
        assert_eq!(preview_of("short"), "\"short\"");
        let long = "a".repeat(40);
        let p = preview_of(&long);
        assert!(p.ends_with("...\""));
        assert_eq!(p.chars().count(), 32 + 5);
    }
}
