//! 位置对齐：第 N 条原文对应第 N 条结果，缺失位置回退为原文

use serde::{Deserialize, Serialize};

use crate::model::flatten::FlatEntry;
use crate::model::rebuild::TranslationRecord;

/// 翻译服务返回的结构化结果（Bhashini `output[]` 中的一项）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedPair {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// 按位置把输出写回到对应条目。
///
/// 结果少于输入时，缺失位置保留原文；多出的结果直接丢弃。从不失败。
pub fn correlate(entries: &[FlatEntry], outputs: &[String]) -> Vec<TranslationRecord> {
    log_count_mismatch(entries.len(), outputs.len());
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| TranslationRecord {
            path: entry.path.clone(),
            text: outputs.get(idx).cloned().unwrap_or_else(|| entry.text.clone()),
        })
        .collect()
}

/// 按 (source, target) 对齐。
///
/// 先按位置匹配；同位置的 source 与原文不一致时（服务端乱序），取第一条尚未使用且
/// source 相同的结果；找不到时仍采用同位置的结果（服务端可能规整了空白或 Unicode）。
/// 同位置没有结果或 target 缺失时保留原文。
pub fn correlate_pairs(entries: &[FlatEntry], pairs: &[TranslatedPair]) -> Vec<TranslationRecord> {
    correlate_pairs_counted(entries, pairs).0
}

/// 同 [`correlate_pairs`]，并返回回退为原文的条目数
pub fn correlate_pairs_counted(entries: &[FlatEntry], pairs: &[TranslatedPair]) -> (Vec<TranslationRecord>, usize) {
    log_count_mismatch(entries.len(), pairs.len());
    let mut used = vec![false; pairs.len()];

    // 第一轮：位置匹配（source 缺失时视为位置可信）
    let mut picked: Vec<Option<usize>> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let pair = pairs.get(idx)?;
            let positional = pair.source.as_deref().map_or(true, |s| s == entry.text);
            if positional {
                used[idx] = true;
                Some(idx)
            } else {
                None
            }
        })
        .collect();

    // 第二轮：乱序结果按原文查找
    let mut reordered = 0usize;
    for (idx, entry) in entries.iter().enumerate() {
        if picked[idx].is_some() {
            continue;
        }
        let found = pairs
            .iter()
            .enumerate()
            .position(|(j, p)| !used[j] && p.source.as_deref() == Some(entry.text.as_str()));
        if let Some(j) = found {
            used[j] = true;
            picked[idx] = Some(j);
            reordered += 1;
        }
    }
    if reordered > 0 {
        tracing::warn!("翻译结果顺序与输入不一致，已按原文重新对齐 {} 条", reordered);
    }

    // 第三轮：原文对不上也找不到同源结果时，信任同位置的结果
    let mut loose = 0usize;
    for (idx, pick) in picked.iter_mut().enumerate() {
        if pick.is_none() && idx < pairs.len() && !used[idx] {
            used[idx] = true;
            *pick = Some(idx);
            loose += 1;
        }
    }
    if loose > 0 {
        tracing::warn!("{} 条结果的 source 与原文不一致，按位置采用", loose);
    }

    let mut fallback = 0usize;
    let records = entries
        .iter()
        .zip(picked)
        .map(|(entry, pick)| {
            let text = match pick.and_then(|j| pairs[j].target.clone()) {
                Some(target) => target,
                None => {
                    fallback += 1;
                    entry.text.clone()
                }
            };
            TranslationRecord { path: entry.path.clone(), text }
        })
        .collect();
    (records, fallback)
}

fn log_count_mismatch(inputs: usize, outputs: usize) {
    if outputs < inputs {
        tracing::warn!("翻译结果不足：输入 {} 条，返回 {} 条，缺失部分保留原文", inputs, outputs);
    } else if outputs > inputs {
        tracing::warn!("翻译结果过多：输入 {} 条，返回 {} 条，多余部分已丢弃", inputs, outputs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::flatten::flatten;
    use crate::model::rebuild::rebuild;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn pair(source: &str, target: &str) -> TranslatedPair {
        TranslatedPair {
            source: Some(source.to_string()),
            target: Some(target.to_string()),
        }
    }

    #[test]
    fn test_partial_results_fall_back_to_original() {
        let v = json!({"a": "one", "b": "two", "c": "three"});
        let entries = flatten(&v);
        let records = correlate(&entries, &strings(&["ONE", "TWO"]));
        assert_eq!(rebuild(&v, &records).unwrap(), json!({"a": "ONE", "b": "TWO", "c": "three"}));
    }

    #[test]
    fn test_excess_results_are_discarded() {
        let v = json!(["x"]);
        let entries = flatten(&v);
        let records = correlate(&entries, &strings(&["X", "Y", "Z"]));
        assert_eq!(records.len(), 1);
        assert_eq!(rebuild(&v, &records).unwrap(), json!(["X"]));
    }

    #[test]
    fn test_empty_results_keep_everything() {
        let v = json!({"a": "one", "n": 3});
        let entries = flatten(&v);
        assert_eq!(rebuild(&v, &correlate(&entries, &[])).unwrap(), v);
    }

    #[test]
    fn test_duplicate_sources_stay_positional() {
        let v = json!({"x": "hello", "y": "hello"});
        let entries = flatten(&v);
        let records = correlate(&entries, &strings(&["A", "B"]));
        assert_eq!(rebuild(&v, &records).unwrap(), json!({"x": "A", "y": "B"}));
    }

    #[test]
    fn test_pairs_in_order() {
        let v = json!({"a": "one", "b": "two"});
        let entries = flatten(&v);
        let records = correlate_pairs(&entries, &[pair("one", "एक"), pair("two", "दो")]);
        assert_eq!(rebuild(&v, &records).unwrap(), json!({"a": "एक", "b": "दो"}));
    }

    #[test]
    fn test_pairs_out_of_order_are_realigned() {
        let v = json!({"a": "one", "b": "two", "c": "three"});
        let entries = flatten(&v);
        let records = correlate_pairs(
            &entries,
            &[pair("two", "दो"), pair("one", "एक"), pair("three", "तीन")],
        );
        assert_eq!(rebuild(&v, &records).unwrap(), json!({"a": "एक", "b": "दो", "c": "तीन"}));
    }

    #[test]
    fn test_pairs_duplicate_sources_consumed_once_each() {
        let v = json!(["hi", "bye", "hi"]);
        let entries = flatten(&v);
        let records = correlate_pairs(&entries, &[pair("bye", "B"), pair("hi", "H1"), pair("hi", "H2")]);
        let out = rebuild(&v, &records).unwrap();
        // 只有位置 2 按位置命中，其余按原文各取一条未使用的结果
        assert_eq!(out, json!(["H1", "B", "H2"]));
    }

    #[test]
    fn test_pairs_missing_target_or_source() {
        let v = json!(["one", "two", "three"]);
        let entries = flatten(&v);
        let records = correlate_pairs(
            &entries,
            &[
                TranslatedPair { source: Some("one".into()), target: None },
                TranslatedPair { source: None, target: Some("TWO".into()) },
            ],
        );
        assert_eq!(rebuild(&v, &records).unwrap(), json!(["one", "TWO", "three"]));
    }

    #[test]
    fn test_pairs_near_miss_source_stays_positional() {
        let v = json!(["Hello ", "Hello"]);
        let entries = flatten(&v);
        let (records, fallback) = correlate_pairs_counted(&entries, &[pair("Hello", "T0"), pair("Hello", "T1")]);
        assert_eq!(rebuild(&v, &records).unwrap(), json!(["T0", "T1"]));
        assert_eq!(fallback, 0);
    }

    #[test]
    fn test_pairs_normalized_echo_keeps_translation() {
        let v = json!({"a": "Welcome to Samadhan ", "b": "bye"});
        let entries = flatten(&v);
        let records = correlate_pairs(&entries, &[pair("Welcome to Samadhan", "स्वागत"), pair("bye", "अलविदा")]);
        assert_eq!(rebuild(&v, &records).unwrap(), json!({"a": "स्वागत", "b": "अलविदा"}));
    }

    #[test]
    fn test_pairs_fallback_count() {
        let v = json!(["one", "two", "three", "four"]);
        let entries = flatten(&v);
        let (records, fallback) = correlate_pairs_counted(
            &entries,
            &[
                pair("one", "1"),
                TranslatedPair { source: Some("two".into()), target: None },
                pair("three", "3"),
            ],
        );
        assert_eq!(rebuild(&v, &records).unwrap(), json!(["1", "two", "3", "four"]));
        assert_eq!(fallback, 2);
    }
}
