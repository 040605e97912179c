//! 叶子路径：对象键 / 数组下标组成的有序段序列，用于精确寻址与回写

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 路径段：对象键或数组下标
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// 从根出发的完整路径；空路径表示根节点本身
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, seg: impl Into<PathSegment>) {
        self.0.push(seg.into());
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// 在前面拼接 `prefix`，得到相对更外层文档的路径
    pub fn prefixed(&self, prefix: &JsonPath) -> JsonPath {
        prefix.0.iter().chain(&self.0).cloned().collect()
    }

    /// 只读解析：沿路径下降，任一段无法解析时返回 None
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut node = root;
        for seg in &self.0 {
            node = match seg {
                PathSegment::Key(k) => node.as_object()?.get(k)?,
                PathSegment::Index(i) => node.as_array()?.get(*i)?,
            };
        }
        Some(node)
    }

    /// 可变解析，语义同 [`JsonPath::resolve`]
    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        let mut node = root;
        for seg in &self.0 {
            node = match seg {
                PathSegment::Key(k) => node.as_object_mut()?.get_mut(k)?,
                PathSegment::Index(i) => node.as_array_mut()?.get_mut(*i)?,
            };
        }
        Some(node)
    }
}

impl FromIterator<PathSegment> for JsonPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<PathSegment>> for JsonPath {
    fn from(segs: Vec<PathSegment>) -> Self {
        Self(segs)
    }
}

/// 渲染为 RFC 9535 JSONPath（字段含特殊字符时使用 bracket-notation）
impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for seg in &self.0 {
            match seg {
                PathSegment::Index(i) => write!(f, "[{}]", i)?,
                PathSegment::Key(k) => {
                    let plain = !k.is_empty()
                        && !k.starts_with(|c: char| c.is_ascii_digit())
                        && k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                    if plain {
                        write!(f, ".{}", k)?;
                    } else {
                        write!(f, "['{}']", k.replace('\\', "\\\\").replace('\'', "\\'"))?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// 解析 RFC 9535 规范化路径（jsonpath-rust `query_only_path` 的输出），
/// 如 `$['list'][0]['name']`；同时接受 `$.name` 形式的简单字段
impl FromStr for JsonPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars().peekable();
        if chars.next() != Some('$') {
            return Err(format!("路径必须以 $ 开头: {}", s));
        }

        let mut segs = Vec::new();
        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    let mut key = String::new();
                    while let Some(&n) = chars.peek() {
                        if n == '.' || n == '[' {
                            break;
                        }
                        key.push(n);
                        chars.next();
                    }
                    if key.is_empty() {
                        return Err(format!("空字段名: {}", s));
                    }
                    segs.push(PathSegment::Key(key));
                }
                '[' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('\'') => break,
                            Some('\\') => key.push(unescape(&mut chars).ok_or_else(|| format!("转义无效: {}", s))?),
                            Some(ch) => key.push(ch),
                            None => return Err(format!("引号未闭合: {}", s)),
                        }
                    }
                    if chars.next() != Some(']') {
                        return Err(format!("缺少 ]: {}", s));
                    }
                    segs.push(PathSegment::Key(key));
                }
                '[' => {
                    let mut digits = String::new();
                    for ch in chars.by_ref() {
                        if ch == ']' {
                            break;
                        }
                        digits.push(ch);
                    }
                    let idx = digits.parse::<usize>().map_err(|_| format!("下标无效: {}", s))?;
                    segs.push(PathSegment::Index(idx));
                }
                _ => return Err(format!("无法解析的字符 {:?}: {}", c, s)),
            }
        }
        Ok(Self(segs))
    }
}

fn unescape(chars: &mut impl Iterator<Item = char>) -> Option<char> {
    Some(match chars.next()? {
        'b' => '\u{0008}',
        'f' => '\u{000C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'u' => {
            let hex: String = chars.by_ref().take(4).collect();
            char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
        }
        other => other,
    })
}

/// 便捷构造：`json_path!["list", 0usize, "name"]`
#[macro_export]
macro_rules! json_path {
    () => { $crate::model::path::JsonPath::root() };
    ($($seg:expr),+ $(,)?) => {
        $crate::model::path::JsonPath::from(vec![$($crate::model::path::PathSegment::from($seg)),+])
    };
}
