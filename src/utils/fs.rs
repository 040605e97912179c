//! IO helper: safe file read/write for JSON

use std::{fs::File, io::BufReader, io::BufWriter, io::Write, path::Path};

use serde_json::Value;
use crate::model::data_core::TranslateError;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, TranslateError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 将JSON数据保存到文件（格式化输出）
pub fn write_json_file(p: &Path, value: &Value) -> Result<(), TranslateError> {
    let f = File::create(p)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
