// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::utils::text_encoding::decode_bytes;

/// 数据集行实体
///
/// 注释比例数据集CSV中的一条记录。自由文本列（描述与备注）
/// 中可能嵌有外部文档链接。未知列被忽略，缺失值按空串处理。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetRow {
    /// 所属项目名称
    #[serde(default)]
    pub project: String,
    /// 对应的模型名称
    #[serde(default)]
    pub model: String,
    /// 描述列（CSV中无列名的大文本列）
    #[serde(rename = "", default)]
    pub description: String,
    /// 备注列
    #[serde(default)]
    pub notes: String,
    /// 是否含有外部文档引用标记
    #[serde(default)]
    pub has_external_doc_ref: String,
}

impl DatasetRow {
    /// 合并所有可能包含链接的自由文本列
    pub fn link_text(&self) -> String {
        format!("{} {}", self.description, self.notes)
    }

    /// 项目名，空值回退为 "unknown"
    pub fn project_or_unknown(&self) -> &str {
        if self.project.is_empty() {
            "unknown"
        } else {
            &self.project
        }
    }

    /// 模型名，空值回退为 "unknown"
    pub fn model_or_unknown(&self) -> &str {
        if self.model.is_empty() {
            "unknown"
        } else {
            &self.model
        }
    }
}

/// 读取数据集CSV的全部行
///
/// CSV文件可能不是合法的UTF-8（历史导出自Excel），因此先经过
/// 编码回退解码，再交给csv按表头反序列化。
pub fn read_dataset(path: &Path) -> Result<Vec<DatasetRow>> {
    let raw = std::fs::read(path)
        .with_context(|| format!("Failed to read dataset CSV: {}", path.display()))?;
    let decoded = decode_bytes(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(decoded.as_bytes());

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: DatasetRow = record.context("Malformed dataset CSV row")?;
        rows.push(row);
    }

    Ok(rows)
}
