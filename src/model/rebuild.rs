//! 回写：在模板的深拷贝上按路径写入译文，非字符串数据原样保留

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::data_core::TranslateError;
use crate::model::path::JsonPath;

/// 一条译文记录：与扁平化条目同位置、同路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub path: JsonPath,
    pub text: String,
}

/// 宽松回写时被跳过的路径（模板结构与扁平化快照不一致）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeDrift {
    pub skipped: Vec<JsonPath>,
}

/// 严格回写。模板不会被修改；任一路径无法解析即返回 `PathMismatch`。
///
/// 路径必须落在字符串叶子上，落在容器或其他标量上同样视为不匹配，
/// 避免覆盖与译文无关的数据。
pub fn rebuild(template: &Value, records: &[TranslationRecord]) -> Result<Value, TranslateError> {
    let mut result = template.clone();
    for record in records {
        write_leaf(&mut result, record).map_err(|path| TranslateError::PathMismatch { path })?;
    }
    Ok(result)
}

/// 宽松回写：跳过无法解析的路径并报告结构漂移，从不失败
pub fn rebuild_lenient(template: &Value, records: &[TranslationRecord]) -> (Value, Option<ShapeDrift>) {
    let mut result = template.clone();
    let mut drift = ShapeDrift::default();
    for record in records {
        if let Err(path) = write_leaf(&mut result, record) {
            drift.skipped.push(path);
        }
    }

    if drift.skipped.is_empty() {
        (result, None)
    } else {
        tracing::warn!(
            "模板结构漂移：{} 条译文路径无法解析，首个: {}",
            drift.skipped.len(),
            drift.skipped[0]
        );
        (result, Some(drift))
    }
}

fn write_leaf(dom: &mut Value, record: &TranslationRecord) -> Result<(), JsonPath> {
    match record.path.resolve_mut(dom) {
        Some(slot) if slot.is_string() => {
            *slot = Value::String(record.text.clone());
            Ok(())
        }
        _ => Err(record.path.clone()),
    }
}

/// 比较两个JSON的结构是否一致（键集合、数组长度、标量类型）
pub fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(obj1), Value::Object(obj2)) => {
            obj1.len() == obj2.len()
                && obj1
                    .iter()
                    .all(|(key, v1)| obj2.get(key).is_some_and(|v2| same_shape(v1, v2)))
        }
        (Value::Array(arr1), Value::Array(arr2)) => {
            arr1.len() == arr2.len() && arr1.iter().zip(arr2).all(|(x, y)| same_shape(x, y))
        }
        // 对于基本类型，只比较类型是否相同
        (Value::String(_), Value::String(_))
        | (Value::Number(_), Value::Number(_))
        | (Value::Bool(_), Value::Bool(_))
        | (Value::Null, Value::Null) => true,
        _ => false,
    }
}
