// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 分隔线：元数据头与正文之间的80个等号
pub const HEADER_SEPARATOR: &str = "================================================================================";

/// 抓取产物实体
///
/// 一个带元数据头的纯文本输出文件。头部记录来源URL、
/// 重定向后的最终URL以及（PDF流水线）项目与模型归属，
/// 之后是80个等号的分隔线和提取出的正文。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// 来源URL
    pub source_url: String,
    /// 重定向后的最终URL（链接流水线）
    pub final_url: Option<String>,
    /// 所属项目（PDF流水线）
    pub project: Option<String>,
    /// 对应模型（PDF流水线）
    pub model: Option<String>,
    /// 提取出的正文
    pub body: String,
}

impl Artifact {
    /// 创建PDF流水线产物
    pub fn for_pdf(source_url: &str, project: &str, model: &str, body: String) -> Self {
        Self {
            source_url: source_url.to_string(),
            final_url: None,
            project: Some(project.to_string()),
            model: Some(model.to_string()),
            body,
        }
    }

    /// 创建链接流水线产物
    pub fn for_link(source_url: &str, final_url: &str, body: String) -> Self {
        Self {
            source_url: source_url.to_string(),
            final_url: Some(final_url.to_string()),
            project: None,
            model: None,
            body,
        }
    }

    /// 渲染为文件内容
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Source URL: {}\n", self.source_url));
        if let Some(final_url) = &self.final_url {
            out.push_str(&format!("Final URL: {}\n", final_url));
        }
        if let Some(project) = &self.project {
            out.push_str(&format!("Project: {}\n", project));
        }
        if let Some(model) = &self.model {
            out.push_str(&format!("Model: {}\n", model));
        }
        out.push_str(HEADER_SEPARATOR);
        out.push_str("\n\n");
        out.push_str(&self.body);
        out
    }

    /// 从文件内容解析产物
    ///
    /// 容忍两种头部形态（PDF流水线与链接流水线），正文取分隔线
    /// 之后的全部内容。没有分隔线时整个内容视为正文。
    pub fn parse(content: &str) -> Self {
        let mut source_url = String::new();
        let mut final_url = None;
        let mut project = None;
        let mut model = None;

        for line in content.lines().take(10) {
            if let Some(rest) = line.strip_prefix("Source URL:") {
                source_url = rest.trim().to_string();
            } else if let Some(rest) = line.strip_prefix("Final URL:") {
                final_url = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("Project:") {
                project = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("Model:") {
                model = Some(rest.trim().to_string());
            }
        }

        let body = match content.find("==========") {
            Some(idx) => {
                let after = &content[idx..];
                match after.find('\n') {
                    Some(nl) => after[nl + 1..].trim_start_matches('\n').to_string(),
                    None => String::new(),
                }
            }
            None => content.to_string(),
        };

        Self {
            source_url,
            final_url,
            project,
            model,
            body,
        }
    }
}
