// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 内容提取模块
///
/// 将抓取到的原始字节转换为干净的纯文本：
/// - PDF文档按页提取文本（pdf）
/// - HTML页面剥离脚本与导航后提取正文（html）
pub mod html;
pub mod pdf;

/// 内容提取错误类型
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF解析失败: {0}")]
    PdfParse(String),

    #[error("PDF中未提取到文本")]
    EmptyPdf,
}

/// 判断字节流是否为PDF文档（魔数 %PDF）
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}
