//! 性能基准测试模块
//!
//! 用于测试大文档的解析、扁平化与回写性能

use std::time::Instant;
use serde_json::{json, Value};
use crate::model::{
    flatten::flatten,
    rebuild::{rebuild, TranslationRecord},
};

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成大型测试JSON数据
pub fn generate_large_json(depth: usize, width: usize) -> Value {
    fn create_nested_object(current_depth: usize, max_depth: usize, width: usize) -> Value {
        if current_depth >= max_depth {
            return json!("Leaf content to translate");
        }

        let mut obj = serde_json::Map::new();

        // 添加各种类型的字段
        for i in 0..width {
            let key = format!("field_{}", i);
            let value = match i % 5 {
                0 => json!(format!("Statement of the parties, clause {}", i)),
                1 => json!(i as i64),
                2 => json!(i % 2 == 0),
                3 => json!([1, 2, 3, i]),
                _ => create_nested_object(current_depth + 1, max_depth, (width / 2).max(1)),
            };
            obj.insert(key, value);
        }

        Value::Object(obj)
    }

    let mut root = serde_json::Map::new();
    root.insert("metadata".to_string(), json!({
        "generated_at": "2025-01-09T10:00:00Z",
        "depth": depth,
        "width": width,
        "description": "Synthetic mediation content for benchmarking"
    }));

    root.insert("data".to_string(), create_nested_object(0, depth, width));

    // 添加大型数组
    let large_array: Vec<Value> = (0..width * 10)
        .map(|i| json!({
            "id": i,
            "name": format!("Session {}", i),
            "value": i * 2,
            "active": i % 3 == 0
        }))
        .collect();
    root.insert("items".to_string(), json!(large_array));

    Value::Object(root)
}

/// 测试扁平化性能
pub fn benchmark_flatten(json_data: &Value) -> PerformanceResult {
    let start = Instant::now();
    let entries = flatten(json_data);
    let duration = start.elapsed();

    PerformanceResult::new(
        "扁平化",
        duration.as_millis(),
        !entries.is_empty(),
        &format!("收集了 {} 个字符串叶子", entries.len()),
    )
}

/// 测试回写性能（以大写文本模拟译文）
pub fn benchmark_rebuild(json_data: &Value) -> PerformanceResult {
    let records: Vec<TranslationRecord> = flatten(json_data)
        .into_iter()
        .map(|e| TranslationRecord { path: e.path, text: e.text.to_uppercase() })
        .collect();

    let start = Instant::now();
    let result = rebuild(json_data, &records);
    let duration = start.elapsed();

    match result {
        Ok(_) => PerformanceResult::new(
            "回写",
            duration.as_millis(),
            true,
            &format!("回写了 {} 条译文", records.len()),
        ),
        Err(e) => PerformanceResult::new("回写", duration.as_millis(), false, &format!("回写失败: {}", e)),
    }
}

/// 测试JSON解析性能
pub fn benchmark_json_parsing(json_str: &str) -> PerformanceResult {
    let start = Instant::now();
    let parse_result = serde_json::from_str::<Value>(json_str);
    let duration = start.elapsed();

    match parse_result {
        Ok(_) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            true,
            &format!("解析了 {} 字节的JSON", json_str.len())
        ),
        Err(e) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            false,
            &format!("解析失败: {}", e)
        )
    }
}

/// 运行综合性能测试
pub fn run_performance_suite(test_cases: &[(usize, usize)]) -> Vec<PerformanceResult> {
    let mut results = Vec::new();

    for &(depth, width) in test_cases {
        tracing::info!("测试规模：深度{}，宽度{}", depth, width);

        let start = Instant::now();
        let json_data = generate_large_json(depth, width);
        results.push(PerformanceResult::new(
            &format!("数据生成({}x{})", depth, width),
            start.elapsed().as_millis(),
            true,
            &format!("生成了深度{}宽度{}的JSON", depth, width)
        ));

        // 序列化测试
        let start = Instant::now();
        match serde_json::to_string(&json_data) {
            Ok(json_str) => {
                results.push(PerformanceResult::new(
                    &format!("JSON序列化({}x{})", depth, width),
                    start.elapsed().as_millis(),
                    true,
                    &format!("序列化了 {} 字节", json_str.len())
                ));
                results.push(benchmark_json_parsing(&json_str));
            }
            Err(e) => results.push(PerformanceResult::new(
                &format!("JSON序列化({}x{})", depth, width),
                start.elapsed().as_millis(),
                false,
                &format!("序列化失败: {}", e)
            )),
        }

        results.push(benchmark_flatten(&json_data));
        results.push(benchmark_rebuild(&json_data));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_large_json() {
        let json = generate_large_json(2, 3);
        assert!(json.is_object());

        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("metadata"));
        assert!(obj.contains_key("data"));
        assert!(obj.contains_key("items"));
    }

    #[test]
    fn test_performance_benchmarks() {
        let json = generate_large_json(2, 5);

        let flatten_result = benchmark_flatten(&json);
        assert!(flatten_result.success);
        assert!(flatten_result.duration_ms < 1000); // 应该在1秒内完成

        let rebuild_result = benchmark_rebuild(&json);
        assert!(rebuild_result.success, "{}", rebuild_result.details);
        assert!(rebuild_result.duration_ms < 1000);
    }

    #[test]
    fn test_performance_suite_covers_each_case() {
        let results = run_performance_suite(&[(2, 4), (3, 6)]);
        // 每个规模：生成、序列化、解析、扁平化、回写
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|r| r.success), "所有基准项都应该成功");
    }
}
